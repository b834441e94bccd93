use glam::{Mat4, Quat, Vec3};
use serde::Serialize;

use crate::resources::{GeometryHandle, MaterialHandle};

/// Scene-unique node identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
)]
pub struct NodeId(pub(crate) u64);

/// Allocates [`NodeId`]s.
#[derive(Debug, Default)]
pub struct NodeIds {
    next: u64,
}

impl NodeIds {
    /// Next unused id.
    pub fn next_id(&mut self) -> NodeId {
        self.next += 1;
        NodeId(self.next)
    }
}

/// What a node draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Pure container.
    Group,
    /// Triangle mesh.
    Mesh,
    /// Line strip.
    Line,
    /// Independent line segments.
    LineSegments,
    /// Camera-facing textured quad.
    Sprite,
    /// Camera-facing text quad, listed in its group's label list.
    Label,
}

/// Translation, rotation and non-uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation relative to the parent.
    pub translation: Vec3,
    /// Rotation relative to the parent.
    pub rotation: Quat,
    /// Scale along local axes.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, rotation or scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Pure translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Replace the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Replace the rotation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Local-to-parent matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }
}

/// Per-halo animation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// Phase offset in radians so halos do not pulse in sync.
    pub phase: f32,
}

impl Pulse {
    /// Uniform scale at `time_ms`: `1 + amplitude * sin(time * rate +
    /// phase)`.
    #[must_use]
    pub fn scale_at(&self, time_ms: f64, amplitude: f32, rate: f32) -> f32 {
        let angle = time_ms * f64::from(rate) + f64::from(self.phase);
        1.0 + amplitude * angle.sin() as f32
    }
}

/// A scene graph node. Owns its children exclusively.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    /// Local transform.
    pub transform: Transform,
    /// Hidden nodes hide their whole subtree.
    pub visible: bool,
    /// Vertex data, released by disposal.
    pub geometry: Option<GeometryHandle>,
    /// Surface, released (with its textures) by disposal.
    pub material: Option<MaterialHandle>,
    /// Halo animation state.
    pub pulse: Option<Pulse>,
    children: Vec<Node>,
}

impl Node {
    /// Empty node with identity transform.
    #[must_use]
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            transform: Transform::IDENTITY,
            visible: true,
            geometry: None,
            material: None,
            pulse: None,
            children: Vec::new(),
        }
    }

    /// Node id.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Direct children.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Mutable direct children.
    pub fn children_mut(&mut self) -> &mut [Node] {
        &mut self.children
    }

    /// Append a child, taking ownership.
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Detach and return all children.
    pub fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    /// Number of nodes below this one.
    #[must_use]
    pub fn descendant_count(&self) -> usize {
        self.children
            .iter()
            .map(|c| 1 + c.descendant_count())
            .sum()
    }

    /// Find a node in this subtree (including `self`).
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Visit this node and every descendant depth-first, mutably.
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut Node)) {
        f(self);
        for child in &mut self.children {
            child.for_each_mut(f);
        }
    }

    /// Visit every descendant depth-first with its transform relative to
    /// `self` (the node's own transform is not applied).
    pub fn visit_descendants(&self, f: &mut impl FnMut(&Node, Mat4)) {
        for child in &self.children {
            child.visit_with(Mat4::IDENTITY, f);
        }
    }

    fn visit_with(&self, parent: Mat4, f: &mut impl FnMut(&Node, Mat4)) {
        let world = parent * self.transform.matrix();
        f(self, world);
        for child in &self.children {
            child.visit_with(world, f);
        }
    }
}
