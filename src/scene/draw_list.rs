//! Flattening the scene into backend draw items.
//!
//! Backends that keep their own scene representation (the JavaScript
//! renderer on the web, or a test double) consume a [`DrawItem`] per
//! visible node with geometry. Hidden subtrees are skipped entirely.

use glam::Mat4;
use serde::Serialize;

use super::{GroupKind, NodeId, NodeKind, Scene};
use crate::resources::{GeometryDesc, GpuResources, MaterialDesc};

/// One drawable node with its world transform resolved.
#[derive(Debug, Clone, Serialize)]
pub struct DrawItem {
    /// Source node.
    pub node: NodeId,
    /// Owning group.
    pub group: GroupKind,
    /// Node kind.
    pub kind: NodeKind,
    /// Column-major world matrix.
    pub world: [f32; 16],
    /// Geometry to draw.
    pub geometry: GeometryDesc,
    /// Material to draw with.
    pub material: MaterialDesc,
}

/// Collect draw items for every visible node, in group order.
///
/// Nodes whose handles were already released (which would indicate a
/// disposal bug) are skipped with a warning.
#[must_use]
pub fn collect(scene: &Scene, resources: &GpuResources) -> Vec<DrawItem> {
    let mut items = Vec::new();
    for group in scene.groups() {
        if !group.visible() {
            continue;
        }
        let root = group.root();
        let base = root.transform.matrix();
        for child in root.children() {
            push_visible(child, base, group.kind(), resources, &mut items);
        }
    }
    items
}

fn push_visible(
    node: &super::Node,
    parent: Mat4,
    group: GroupKind,
    resources: &GpuResources,
    out: &mut Vec<DrawItem>,
) {
    if !node.visible {
        return;
    }
    let world = parent * node.transform.matrix();
    if let (Some(geometry), Some(material)) = (node.geometry, node.material) {
        match (resources.geometry(geometry), resources.material(material)) {
            (Some(geometry), Some(material)) => out.push(DrawItem {
                node: node.id(),
                group,
                kind: node.kind(),
                world: world.to_cols_array(),
                geometry: geometry.clone(),
                material: material.desc.clone(),
            }),
            _ => log::warn!(
                "node {:?} references released resources",
                node.id()
            ),
        }
    }
    for child in node.children() {
        push_visible(child, world, group, resources, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::GeometryDesc;
    use crate::scene::Node;
    use crate::util::color::Color;

    fn mesh(scene: &mut Scene, res: &mut GpuResources) -> Node {
        let mut node = Node::new(scene.ids.next_id(), NodeKind::Mesh);
        node.geometry = Some(res.create_geometry(GeometryDesc::Quad));
        node.material =
            Some(res.create_material(MaterialDesc::basic(Color::WHITE)));
        node
    }

    #[test]
    fn hidden_groups_and_nodes_are_skipped() {
        let mut scene = Scene::new();
        let mut res = GpuResources::new();
        let a = mesh(&mut scene, &mut res);
        let mut b = mesh(&mut scene, &mut res);
        b.visible = false;
        let c = mesh(&mut scene, &mut res);
        scene.molecule.add(a);
        scene.molecule.add(b);
        scene.nanoparticle.add(c);

        assert_eq!(collect(&scene, &res).len(), 2);
        scene.nanoparticle.set_visible(false);
        let items = collect(&scene, &res);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].group, GroupKind::Molecule);
    }

    #[test]
    fn group_transform_is_applied() {
        let mut scene = Scene::new();
        let mut res = GpuResources::new();
        let node = mesh(&mut scene, &mut res);
        scene.interaction.add(node);
        scene.interaction.root_mut().transform =
            crate::scene::Transform::from_translation(glam::Vec3::new(
                1.0, 2.0, 3.0,
            ));
        let items = collect(&scene, &res);
        // Column-major: translation lives in elements 12..15.
        assert_eq!(&items[0].world[12..15], &[1.0, 2.0, 3.0]);
    }
}
