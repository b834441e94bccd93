//! Interaction markers, connecting lines, labels and pulsing halos.

use std::f32::consts::TAU;

use rand::Rng;

use super::{finite, label, BuildContext, BuildCounts, BuildError};
use crate::payload::InteractionPoint;
use crate::resources::{GeometryDesc, MaterialDesc};
use crate::scene::{Group, NodeKind, Pulse, Transform};

const MARKER_OPACITY: f32 = 0.7;
const MARKER_EMISSIVE: f32 = 0.3;
const LINE_OPACITY: f32 = 0.5;
const HALO_OPACITY: f32 = 0.3;

/// Build every interaction point into `group`.
pub fn build_interactions(
    ctx: &mut BuildContext<'_>,
    points: &[InteractionPoint],
    group: &mut Group,
) -> BuildCounts {
    let mut counts = BuildCounts::default();
    for (i, point) in points.iter().enumerate() {
        counts.record("interaction", i, build_interaction(ctx, point, group));
    }
    counts
}

/// Marker at `position`, a line to `target_position`, a label at the
/// midpoint when the point has a type, and a pulsing halo around the
/// marker.
///
/// # Errors
///
/// Either endpoint is missing.
pub fn build_interaction(
    ctx: &mut BuildContext<'_>,
    point: &InteractionPoint,
    group: &mut Group,
) -> Result<(), BuildError> {
    let opts = ctx.options;
    let (Some(from), Some(to)) = (point.position, point.target_position)
    else {
        return Err(BuildError::MissingPosition("interaction"));
    };
    let from = finite(from.to_vec3(), "interaction position")?;
    let to = finite(to.to_vec3(), "interaction target")?;

    let colors = &opts.colors;
    let marker_radius = opts.geometry.marker_radius;
    let segments = opts.quality.small_sphere_segments;

    let point_color = colors.interaction_point;
    let geometry = ctx.sphere(marker_radius, segments);
    let material = ctx.material("interaction", || {
        MaterialDesc::phong(point_color)
            .with_opacity(MARKER_OPACITY)
            .with_emissive(point_color, MARKER_EMISSIVE)
    });
    let mut marker = ctx.mesh(NodeKind::Mesh, geometry, material);
    marker.transform = Transform::from_translation(from);
    group.add(marker);

    // Line vertices are per interaction, so the geometry is not pooled.
    let geometry = ctx.resources.create_geometry(GeometryDesc::Polyline {
        points: vec![from.to_array(), to.to_array()],
    });
    let line_color = colors.interaction_line;
    let material = ctx.material("interaction_line", || {
        MaterialDesc::line(line_color).with_opacity(LINE_OPACITY)
    });
    group.add(ctx.mesh(NodeKind::Line, geometry, material));

    if let Some(kind) = point.kind.as_deref() {
        if let Some(node) = label::label(ctx, kind, (from + to) * 0.5) {
            group.add_label(node);
        }
    }

    if ctx.detail.halos {
        let halo_color = colors.interaction_halo;
        let geometry =
            ctx.sphere(marker_radius * opts.geometry.halo_scale, segments);
        let material = ctx.material("pulse", || {
            MaterialDesc::basic(halo_color)
                .with_opacity(HALO_OPACITY)
                .with_wireframe(true)
        });
        let mut halo = ctx.mesh(NodeKind::Mesh, geometry, material);
        halo.transform = Transform::from_translation(from);
        halo.pulse = Some(Pulse {
            phase: ctx.rng.random_range(0.0..TAU),
        });
        group.add(halo);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::builders::test_support::Fixture;
    use crate::payload::Position;
    use crate::quality::PerformanceMode;
    use crate::scene::Scene;

    fn hbond() -> InteractionPoint {
        InteractionPoint {
            position: Some(Position::new(0.0, 0.0, 0.0)),
            target_position: Some(Position::new(1.0, 0.0, 0.0)),
            kind: Some("hbond".to_owned()),
        }
    }

    #[test]
    fn full_detail_builds_four_nodes() {
        let mut fx = Fixture::new(PerformanceMode::Normal);
        let mut scene = Scene::new();
        build_interaction(&mut fx.ctx(), &hbond(), &mut scene.interaction)
            .unwrap();

        let group = &scene.interaction;
        assert_eq!(group.node_count(), 4);
        assert_eq!(group.labels().len(), 1);
        let label = group.root().find(group.labels()[0]).unwrap();
        assert_eq!(label.transform.translation, Vec3::new(0.5, 0.5, 0.0));

        let halo = group.children().iter().find(|n| n.pulse.is_some());
        let phase = halo.unwrap().pulse.unwrap().phase;
        assert!((0.0..TAU).contains(&phase));
    }

    #[test]
    fn degraded_builds_marker_and_line_only() {
        let mut fx = Fixture::new(PerformanceMode::Degraded);
        let mut scene = Scene::new();
        build_interaction(&mut fx.ctx(), &hbond(), &mut scene.interaction)
            .unwrap();

        let kinds: Vec<NodeKind> = scene
            .interaction
            .children()
            .iter()
            .map(crate::scene::Node::kind)
            .collect();
        assert_eq!(kinds, vec![NodeKind::Mesh, NodeKind::Line]);
    }

    #[test]
    fn untyped_point_has_no_label() {
        let mut fx = Fixture::new(PerformanceMode::Normal);
        let mut scene = Scene::new();
        let point = InteractionPoint {
            kind: None,
            ..hbond()
        };
        build_interaction(&mut fx.ctx(), &point, &mut scene.interaction)
            .unwrap();
        assert_eq!(scene.interaction.node_count(), 3);
        assert!(scene.interaction.labels().is_empty());
    }

    #[test]
    fn points_without_target_are_skipped() {
        let mut fx = Fixture::new(PerformanceMode::Normal);
        let mut scene = Scene::new();
        let broken = InteractionPoint {
            target_position: None,
            ..hbond()
        };
        let counts = build_interactions(
            &mut fx.ctx(),
            &[broken, hbond()],
            &mut scene.interaction,
        );
        assert_eq!(counts.built, 1);
        assert_eq!(counts.skipped, 1);
        assert_eq!(scene.interaction.node_count(), 4);
    }
}
