//! Disposal walker: release every GPU resource a subtree owns.

use super::GpuResources;
use crate::scene::Node;

/// Release the resources of `node` and all its descendants.
///
/// Children are disposed first, then the node's geometry, then the
/// textures attached to its material, then the material. Handles that are
/// absent or already released are skipped, so calling this on a bare group
/// node (or twice) is a no-op. Returns the number of resources released.
///
/// The node keeps its (now dangling) handles; drop it or detach it from
/// its group right after.
pub fn dispose(node: &Node, resources: &mut GpuResources) -> usize {
    let mut released = 0;
    for child in node.children() {
        released += dispose(child, resources);
    }

    if let Some(geometry) = node.geometry {
        released += usize::from(resources.release_geometry(geometry));
    }

    if let Some(material) = node.material {
        let map = resources.material(material).and_then(|m| m.map);
        if let Some(texture) = map {
            released += usize::from(resources.release_texture(texture));
        }
        released += usize::from(resources.release_material(material));
    }
    released
}

/// Dispose and drop a list of detached nodes.
pub fn dispose_all(nodes: Vec<Node>, resources: &mut GpuResources) -> usize {
    nodes.iter().map(|n| dispose(n, resources)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{GeometryDesc, MaterialDesc, TextureDesc};
    use crate::scene::{NodeIds, NodeKind};
    use crate::util::color::Color;

    #[test]
    fn releases_whole_subtree_with_textures() {
        let mut res = GpuResources::new();
        let mut ids = NodeIds::default();

        let mut parent = Node::new(ids.next_id(), NodeKind::Group);
        let mut sprite = Node::new(ids.next_id(), NodeKind::Sprite);
        sprite.geometry = Some(res.create_geometry(GeometryDesc::Quad));
        sprite.material = Some(res.create_material(MaterialDesc::sprite(
            TextureDesc::label("O", Color::WHITE),
        )));
        let mut mesh = Node::new(ids.next_id(), NodeKind::Mesh);
        mesh.geometry = Some(res.create_geometry(GeometryDesc::Cuboid {
            side: 1.0,
        }));
        mesh.material =
            Some(res.create_material(MaterialDesc::phong(Color::WHITE)));
        mesh.add_child(sprite);
        parent.add_child(mesh);

        assert_eq!(res.live().total(), 5);
        assert_eq!(dispose(&parent, &mut res), 5);
        assert_eq!(res.live().total(), 0);
    }

    #[test]
    fn bare_and_repeated_disposal_is_a_no_op() {
        let mut res = GpuResources::new();
        let mut ids = NodeIds::default();
        let group = Node::new(ids.next_id(), NodeKind::Group);
        assert_eq!(dispose(&group, &mut res), 0);

        let mut mesh = Node::new(ids.next_id(), NodeKind::Mesh);
        mesh.geometry = Some(res.create_geometry(GeometryDesc::Quad));
        assert_eq!(dispose(&mesh, &mut res), 1);
        assert_eq!(dispose(&mesh, &mut res), 0);
    }
}
