//! Retained scene graph: three ownership groups and their nodes.
//!
//! The [`Scene`] owns a molecule, a nanoparticle and an interaction
//! [`Group`]. Groups live for the whole session; their children are
//! disposed and rebuilt on every payload. A node belongs to exactly one
//! group because groups own their subtrees by value.

pub mod bounds;
pub mod draw_list;
mod node;

use glam::Mat4;
use rustc_hash::FxHashSet;
pub use node::{Node, NodeId, NodeIds, NodeKind, Pulse, Transform};
use serde::Serialize;

use self::bounds::Aabb;
use crate::resources::GpuResources;

// ---------------------------------------------------------------------------
// GroupKind
// ---------------------------------------------------------------------------

/// The three top-level ownership roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    /// Atoms, bonds and their labels.
    Molecule,
    /// Nanoparticle body, shell, glow, coating and label.
    Nanoparticle,
    /// Interaction markers, lines, halos and labels.
    Interaction,
}

impl GroupKind {
    /// All groups in draw order.
    pub const ALL: [GroupKind; 3] =
        [Self::Molecule, Self::Nanoparticle, Self::Interaction];
}

// ---------------------------------------------------------------------------
// Group
// ---------------------------------------------------------------------------

/// A named container node plus the side list of its label nodes.
#[derive(Debug)]
pub struct Group {
    kind: GroupKind,
    root: Node,
    labels: Vec<NodeId>,
}

impl Group {
    fn new(kind: GroupKind, id: NodeId) -> Self {
        Self {
            kind,
            root: Node::new(id, NodeKind::Group),
            labels: Vec::new(),
        }
    }

    /// Which group this is.
    #[must_use]
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    /// The container node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The container node, mutably.
    pub fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    /// Direct children of the container.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        self.root.children()
    }

    /// Whether the group has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.children().is_empty()
    }

    /// Number of nodes in the group (excluding the container).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.descendant_count()
    }

    /// Add a top-level child.
    pub fn add(&mut self, node: Node) {
        self.root.add_child(node);
    }

    /// Add a label node and record it in the label list.
    pub fn add_label(&mut self, node: Node) {
        self.labels.push(node.id());
        self.root.add_child(node);
    }

    /// Ids of the label nodes in this group.
    #[must_use]
    pub fn labels(&self) -> &[NodeId] {
        &self.labels
    }

    /// Whether the container is visible.
    #[must_use]
    pub fn visible(&self) -> bool {
        self.root.visible
    }

    /// Show or hide the whole group.
    pub fn set_visible(&mut self, visible: bool) {
        self.root.visible = visible;
    }

    /// Show or hide every label in the label list.
    pub fn set_labels_visible(&mut self, visible: bool) {
        if self.labels.is_empty() {
            return;
        }
        let labels: FxHashSet<NodeId> = self.labels.iter().copied().collect();
        self.root.for_each_mut(&mut |node| {
            if labels.contains(&node.id()) {
                node.visible = visible;
            }
        });
    }

    /// Detach all children and forget the label list. The caller must
    /// dispose the returned nodes.
    pub(crate) fn take_children(&mut self) -> Vec<Node> {
        self.labels.clear();
        self.root.take_children()
    }

    /// Bounding box of the group's content in the group's own frame
    /// (the container transform is not applied).
    #[must_use]
    pub fn local_bounds(&self, resources: &GpuResources) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        self.root.visit_descendants(&mut |node, m: Mat4| {
            let geometry = node.geometry.and_then(|h| resources.geometry(h));
            if let Some(geometry) = geometry {
                bounds = bounds.union(geometry.local_bounds().transformed(&m));
            }
        });
        bounds
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// The three groups and the node id allocator.
#[derive(Debug)]
pub struct Scene {
    /// Molecule group.
    pub molecule: Group,
    /// Nanoparticle group.
    pub nanoparticle: Group,
    /// Interaction group.
    pub interaction: Group,
    /// Id allocator shared by all groups.
    pub ids: NodeIds,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create the three empty groups.
    #[must_use]
    pub fn new() -> Self {
        let mut ids = NodeIds::default();
        let molecule = Group::new(GroupKind::Molecule, ids.next_id());
        let nanoparticle = Group::new(GroupKind::Nanoparticle, ids.next_id());
        let interaction = Group::new(GroupKind::Interaction, ids.next_id());
        Self {
            molecule,
            nanoparticle,
            interaction,
            ids,
        }
    }

    /// Read access to a group.
    #[must_use]
    pub fn group(&self, kind: GroupKind) -> &Group {
        match kind {
            GroupKind::Molecule => &self.molecule,
            GroupKind::Nanoparticle => &self.nanoparticle,
            GroupKind::Interaction => &self.interaction,
        }
    }

    /// Write access to a group.
    pub fn group_mut(&mut self, kind: GroupKind) -> &mut Group {
        match kind {
            GroupKind::Molecule => &mut self.molecule,
            GroupKind::Nanoparticle => &mut self.nanoparticle,
            GroupKind::Interaction => &mut self.interaction,
        }
    }

    /// Groups in draw order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        [&self.molecule, &self.nanoparticle, &self.interaction].into_iter()
    }

    /// Total nodes across all groups (excluding the containers).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.groups().map(Group::node_count).sum()
    }

    /// Total labels across all groups.
    #[must_use]
    pub fn label_count(&self) -> usize {
        self.groups().map(|g| g.labels().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::GeometryDesc;

    #[test]
    fn groups_start_empty_and_visible() {
        let scene = Scene::new();
        for group in scene.groups() {
            assert!(group.is_empty());
            assert!(group.visible());
        }
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn label_list_toggles_only_labels() {
        let mut scene = Scene::new();
        let mesh = Node::new(scene.ids.next_id(), NodeKind::Mesh);
        let label = Node::new(scene.ids.next_id(), NodeKind::Label);
        let label_id = label.id();
        let mesh_id = mesh.id();
        scene.molecule.add(mesh);
        scene.molecule.add_label(label);

        scene.molecule.set_labels_visible(false);
        let root = scene.molecule.root();
        assert!(!root.find(label_id).unwrap().visible);
        assert!(root.find(mesh_id).unwrap().visible);
        assert_eq!(scene.label_count(), 1);
    }

    #[test]
    fn many_labels_toggle_together_and_back() {
        let mut scene = Scene::new();
        let ids: Vec<NodeId> = (0..50)
            .map(|_| {
                let label = Node::new(scene.ids.next_id(), NodeKind::Label);
                let id = label.id();
                scene.molecule.add_label(label);
                id
            })
            .collect();
        let visible = |scene: &Scene| {
            ids.iter()
                .filter(|id| scene.molecule.root().find(**id).unwrap().visible)
                .count()
        };

        scene.molecule.set_labels_visible(false);
        assert_eq!(visible(&scene), 0);
        assert!(scene.molecule.visible());
        scene.molecule.set_labels_visible(true);
        assert_eq!(visible(&scene), 50);
    }

    #[test]
    fn local_bounds_follow_child_transforms() {
        let mut scene = Scene::new();
        let mut res = GpuResources::new();
        let mut node = Node::new(scene.ids.next_id(), NodeKind::Mesh);
        node.geometry = Some(res.create_geometry(GeometryDesc::Sphere {
            radius: 1.0,
            segments: 8,
        }));
        node.transform =
            Transform::from_translation(glam::Vec3::new(4.0, 0.0, 0.0));
        scene.nanoparticle.add(node);
        // The container transform must not matter.
        scene.nanoparticle.root_mut().transform =
            Transform::from_translation(glam::Vec3::splat(100.0));

        let bounds = scene.nanoparticle.local_bounds(&res);
        assert_eq!(bounds.center(), glam::Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(bounds.max.x, 5.0);
    }
}
