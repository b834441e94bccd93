//! Text label sprites.

use glam::Vec3;

use super::BuildContext;
use crate::resources::{MaterialDesc, TextureDesc};
use crate::scene::{Node, NodeKind, Transform};

const LABEL_OPACITY: f32 = 0.8;

/// Build a label sprite for `text` just above `anchor`.
///
/// Returns `None` when labels are disabled at the current detail level or
/// the text is blank. Label materials are never pooled since each carries
/// its own text texture. The caller adds the node with
/// [`Group::add_label`](crate::scene::Group::add_label) so the label
/// toggle can find it.
pub fn label(
    ctx: &mut BuildContext<'_>,
    text: &str,
    anchor: Vec3,
) -> Option<Node> {
    let text = text.trim();
    if !ctx.detail.labels || text.is_empty() {
        return None;
    }

    let geo = &ctx.options.geometry;
    let offset = Vec3::new(0.0, geo.label_offset, 0.0);
    let scale = Vec3::new(geo.label_size[0], geo.label_size[1], 1.0);
    let color = ctx.options.colors.label_text;

    let quad = ctx.quad();
    let material = ctx.resources.create_material(
        MaterialDesc::sprite(TextureDesc::label(text, color))
            .with_opacity(LABEL_OPACITY),
    );
    let mut node = ctx.mesh(NodeKind::Label, quad, material);
    node.transform = Transform::from_translation(anchor + offset)
        .with_scale(scale);
    node.visible = ctx.labels_visible;
    Some(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::test_support::Fixture;
    use crate::quality::PerformanceMode;

    #[test]
    fn label_sits_above_anchor_with_its_own_texture() {
        let mut fx = Fixture::new(PerformanceMode::Normal);
        let node = label(&mut fx.ctx(), "O", Vec3::new(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(node.kind(), NodeKind::Label);
        assert_eq!(node.transform.translation, Vec3::new(1.0, 2.5, 3.0));
        assert_eq!(node.transform.scale, Vec3::new(2.0, 0.5, 1.0));

        let entry = fx.resources.material(node.material.unwrap()).unwrap();
        assert!(entry.map.is_some());
        assert_eq!(entry.desc.opacity, 0.8);
        assert_eq!(fx.materials.len(), 0);
    }

    #[test]
    fn no_labels_when_degraded_or_blank() {
        let mut fx = Fixture::new(PerformanceMode::Degraded);
        assert!(label(&mut fx.ctx(), "O", Vec3::ZERO).is_none());
        assert_eq!(fx.resources.live().total(), 0);

        let mut fx = Fixture::new(PerformanceMode::Normal);
        assert!(label(&mut fx.ctx(), "  ", Vec3::ZERO).is_none());
    }

    #[test]
    fn hidden_labels_stay_hidden() {
        let mut fx = Fixture::new(PerformanceMode::Normal);
        let mut ctx = fx.ctx();
        ctx.labels_visible = false;
        let node = label(&mut ctx, "N", Vec3::ZERO).unwrap();
        assert!(!node.visible);
    }
}
