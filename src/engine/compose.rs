//! Payload to scene: dispose the previous scene, build, lay out.

use glam::Vec3;
use serde::Serialize;

use super::Visualizer;
use crate::builders::interaction::build_interactions;
use crate::builders::molecule::{build_molecule, MoleculeCounts};
use crate::builders::nanoparticle::build_nanoparticle;
use crate::builders::{BuildContext, BuildCounts};
use crate::error::VizError;
use crate::payload::{parse_response, VisualizationPayload};
use crate::renderer::RenderBackend;
use crate::resources::dispose::dispose_all;
use crate::resources::ResourceCounts;
use crate::scene::GroupKind;

/// What one composition built, skipped and released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ComposeReport {
    /// Atom and bond tallies.
    pub molecule: MoleculeCounts,
    /// Nanoparticle tally (0 or 1 record).
    pub nanoparticle: BuildCounts,
    /// Interaction point tally.
    pub interactions: BuildCounts,
    /// Resources released while clearing the previous scene.
    pub disposed: usize,
    /// Nodes in the new scene.
    pub nodes: usize,
    /// Live resources after composition.
    pub live: ResourceCounts,
    /// Center of the molecule and nanoparticle content before layout.
    pub center: [f32; 3],
}

impl ComposeReport {
    /// Records skipped across all kinds.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.molecule.atoms.skipped
            + self.molecule.bonds.skipped
            + self.nanoparticle.skipped
            + self.interactions.skipped
    }
}

impl<B: RenderBackend> Visualizer<B> {
    /// Replace the scene with one built from `payload`.
    ///
    /// Missing sections are logged and left empty; records that fail to
    /// build are logged and skipped. Group visibility and the view filter
    /// carry over from the previous scene.
    ///
    /// # Errors
    ///
    /// [`VizError::Compose`] when the built content has no finite
    /// bounding box. The built nodes stay in the scene.
    pub fn compose(
        &mut self,
        payload: &VisualizationPayload,
    ) -> Result<ComposeReport, VizError> {
        let mut report = ComposeReport {
            disposed: self.clear(),
            ..ComposeReport::default()
        };

        let scene = &mut self.scene;
        let mut ctx = BuildContext {
            resources: &mut self.resources,
            geometries: &mut self.geometries,
            materials: &mut self.materials,
            ids: &mut scene.ids,
            options: &self.options,
            detail: self.quality.detail(),
            labels_visible: self.labels_visible,
            rng: &mut self.rng,
        };

        if let Some(molecule) = &payload.molecule {
            report.molecule =
                build_molecule(&mut ctx, molecule, &mut scene.molecule);
        } else {
            log::warn!("no molecule data for visualization");
        }

        if let Some(spec) = &payload.nanoparticle {
            let result =
                build_nanoparticle(&mut ctx, spec, &mut scene.nanoparticle);
            report.nanoparticle.record("nanoparticle", 0, result);
        } else {
            log::warn!("no nanoparticle data for visualization");
        }

        let points = &payload.interaction_points;
        if !points.is_empty() {
            report.interactions =
                build_interactions(&mut ctx, points, &mut scene.interaction);
        }
        report.interactions.skipped += points.rejected();

        let center = self.layout().inspect_err(|e| log::error!("{e}"))?;
        report.center = center.to_array();
        report.nodes = self.scene.node_count();
        report.live = self.resources.live();
        log::info!(
            "composed scene: {} nodes, {} live resources, {} skipped",
            report.nodes,
            report.live.total(),
            report.skipped()
        );
        self.last_report = Some(report);
        Ok(report)
    }

    /// Parse a payload (bare or wrapped in the response envelope) and
    /// compose it.
    ///
    /// # Errors
    ///
    /// [`VizError::Payload`] for malformed JSON, otherwise as
    /// [`compose`](Self::compose).
    pub fn compose_json(
        &mut self,
        json: &str,
    ) -> Result<ComposeReport, VizError> {
        let response = parse_response(json)
            .inspect_err(|e| log::error!("{e}"))?;
        self.compose(&response.visualization)
    }

    /// Dispose and detach every node of every group. Returns the number
    /// of resources released.
    pub fn clear(&mut self) -> usize {
        let mut released = 0;
        for kind in GroupKind::ALL {
            let nodes = self.scene.group_mut(kind).take_children();
            released += dispose_all(nodes, &mut self.resources);
        }
        self.last_report = None;
        released
    }

    /// Center the molecule and nanoparticle content on the origin, then
    /// pull the two groups apart along X. Returns the content center.
    fn layout(&mut self) -> Result<Vec3, VizError> {
        let bounds = self
            .scene
            .molecule
            .local_bounds(&self.resources)
            .union(self.scene.nanoparticle.local_bounds(&self.resources));
        let center = if bounds.is_empty() {
            Vec3::ZERO
        } else if bounds.is_finite() && bounds.center().is_finite() {
            bounds.center()
        } else {
            return Err(VizError::Compose(
                "scene bounds are not finite".to_owned(),
            ));
        };

        for kind in GroupKind::ALL {
            self.scene.group_mut(kind).root_mut().transform.translation =
                -center;
        }
        let half = self.options.geometry.group_separation / 2.0;
        self.scene.molecule.root_mut().transform.translation.x = -half;
        self.scene.nanoparticle.root_mut().transform.translation.x = half;
        Ok(center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support;
    use crate::quality::DeviceProfile;
    use crate::scene::NodeKind;
    use crate::util::color::Color;

    const OXYGEN: &str = r#"{
        "molecule": {
            "name": "O",
            "atoms": [{"position": {"x": 0, "y": 0, "z": 0}, "element": "O"}],
            "bonds": []
        }
    }"#;

    const HBOND: &str = r#"{
        "interaction_points": [{
            "position": {"x": 0, "y": 0, "z": 0},
            "target_position": {"x": 1, "y": 0, "z": 0},
            "type": "hbond"
        }]
    }"#;

    #[test]
    fn empty_payload_leaves_groups_empty() {
        let mut viz = test_support::desktop();
        let report = viz.compose_json("{}").unwrap();
        assert!(viz.scene().molecule.is_empty());
        assert!(viz.scene().nanoparticle.is_empty());
        assert_eq!(report.nodes, 0);
        assert_eq!(report.live.total(), 0);
        assert_eq!(report.center, [0.0; 3]);
    }

    #[test]
    fn single_oxygen_atom() {
        let mut viz = test_support::desktop();
        let _ = viz.compose_json(OXYGEN).unwrap();

        let group = &viz.scene().molecule;
        let spheres: Vec<_> = group
            .children()
            .iter()
            .filter(|n| n.kind() == NodeKind::Mesh)
            .collect();
        assert_eq!(spheres.len(), 1);
        let material = viz.resources().material(spheres[0].material.unwrap());
        assert_eq!(material.unwrap().desc.color, Color(0x00ff_0000));
        assert_eq!(group.labels().len(), 1);
    }

    #[test]
    fn interaction_point_node_counts() {
        let mut viz = test_support::desktop();
        let _ = viz.compose_json(HBOND).unwrap();
        assert_eq!(viz.scene().interaction.node_count(), 4);

        let device = DeviceProfile {
            webgl: false,
            ..DeviceProfile::desktop(1.0)
        };
        let mut degraded = test_support::with_device(&device);
        let _ = degraded.compose_json(HBOND).unwrap();
        assert_eq!(degraded.scene().interaction.node_count(), 2);
    }

    #[test]
    fn repeated_composition_returns_to_baseline() {
        let mut viz = test_support::desktop();
        let payload = VisualizationPayload::demo();
        let first = viz.compose(&payload).unwrap();
        let baseline = viz.resources().live();
        let templates = viz.pooled_templates();

        for _ in 0..10 {
            let report = viz.compose(&payload).unwrap();
            assert_eq!(report.nodes, first.nodes);
            assert_eq!(report.disposed, baseline.total());
        }
        assert_eq!(viz.resources().live(), baseline);
        assert_eq!(viz.pooled_templates(), templates);

        let (allocated, released) = viz.resources().lifetime();
        assert_eq!(allocated - released, baseline.total() as u64);
    }

    #[test]
    fn clear_releases_everything() {
        let mut viz = test_support::desktop();
        let _ = viz.compose(&VisualizationPayload::demo()).unwrap();
        assert!(viz.resources().live().total() > 0);
        let _ = viz.clear();
        assert_eq!(viz.resources().live().total(), 0);
        assert_eq!(viz.scene().node_count(), 0);
        assert_eq!(viz.scene().label_count(), 0);
    }

    #[test]
    fn groups_are_centered_then_separated() {
        let mut viz = test_support::desktop();
        let json = r#"{
            "molecule": {
                "atoms": [{
                    "position": {"x": 10, "y": 4, "z": -2},
                    "element": "N"
                }]
            }
        }"#;
        let report = viz.compose_json(json).unwrap();
        // The label above the atom lifts the box center slightly in Y.
        let [cx, cy, cz] = report.center;
        assert_eq!((cx, cz), (10.0, -2.0));
        assert!(cy > 4.0);

        let scene = viz.scene();
        let molecule = scene.molecule.root().transform.translation;
        let nano = scene.nanoparticle.root().transform.translation;
        let interaction = scene.interaction.root().transform.translation;
        assert_eq!(molecule, Vec3::new(-4.0, -cy, 2.0));
        assert_eq!(nano, Vec3::new(4.0, -cy, 2.0));
        assert_eq!(interaction, Vec3::new(-10.0, -cy, 2.0));

        // A second composition must not accumulate the offset.
        let _ = viz.compose_json(json).unwrap();
        let again = viz.scene().molecule.root().transform.translation;
        assert_eq!(again, molecule);
    }

    #[test]
    fn bad_records_are_skipped_not_fatal() {
        let mut viz = test_support::desktop();
        let json = r#"{
            "molecule": {
                "atoms": [
                    {"position": {"x": 0, "y": 0, "z": 0}, "element": "C"},
                    {"element": "N"},
                    {"position": {"x": 1, "y": 0, "z": 0}, "radius": -1}
                ],
                "bonds": [{"start": {"x": 0, "y": 0, "z": 0}}]
            },
            "nanoparticle": {"type": "rod", "size_nm": -3}
        }"#;
        let report = viz.compose_json(json).unwrap();
        assert_eq!(report.molecule.atoms.built, 1);
        assert_eq!(report.molecule.atoms.skipped, 2);
        assert_eq!(report.molecule.bonds.skipped, 1);
        assert_eq!(report.nanoparticle.skipped, 1);
        assert_eq!(report.skipped(), 4);
        assert!(viz.scene().nanoparticle.is_empty());
    }

    #[test]
    fn malformed_records_and_null_sections_leave_a_partial_scene() {
        let mut viz = test_support::desktop();
        let json = r#"{
            "molecule": {
                "atoms": [
                    {"position": {"x": 0, "y": 0, "z": 0}, "element": "C"},
                    {"position": {"x": "oops", "y": 0, "z": 0}}
                ],
                "bonds": [{"start": {"x": 0, "y": 0, "z": 0}}]
            },
            "interaction_points": [{"position": 3}]
        }"#;
        let report = viz.compose_json(json).unwrap();
        assert_eq!(report.molecule.atoms.built, 1);
        assert_eq!(report.molecule.atoms.skipped, 1);
        assert_eq!(report.interactions.skipped, 1);

        let json = r#"{
            "molecule": {
                "atoms": [{"position": {"x": 0, "y": 0, "z": 0}}],
                "bonds": null
            },
            "nanoparticle": "sphere",
            "interaction_points": null
        }"#;
        let report = viz.compose_json(json).unwrap();
        assert_eq!(report.molecule.atoms.built, 1);
        assert_eq!(report.skipped(), 0);
        assert!(viz.scene().nanoparticle.is_empty());
    }

    #[test]
    fn zero_size_nanoparticle_uses_the_default_size() {
        let mut viz = test_support::desktop();
        let json = r#"{"nanoparticle": {"type": "sphere", "size_nm": 0}}"#;
        let report = viz.compose_json(json).unwrap();
        assert_eq!(report.nanoparticle.built, 1);
        assert!(!viz.scene().nanoparticle.is_empty());
    }

    #[test]
    fn malformed_json_is_a_payload_error() {
        let mut viz = test_support::desktop();
        assert!(matches!(
            viz.compose_json("{not json"),
            Err(VizError::Payload(_))
        ));
        assert!(matches!(
            viz.compose_json(r#"{"visualization": null}"#),
            Err(VizError::Payload(_))
        ));
    }

    #[test]
    fn overflowing_bounds_are_a_compose_error() {
        let mut viz = test_support::desktop();
        let json = r#"{
            "molecule": {
                "atoms": [
                    {"position": {"x": 3.0e38, "y": 0, "z": 0}},
                    {"position": {"x": 3.3e38, "y": 0, "z": 0}}
                ]
            }
        }"#;
        assert!(matches!(
            viz.compose_json(json),
            Err(VizError::Compose(_))
        ));
    }

    #[test]
    fn rebuilds_reuse_pooled_templates() {
        let mut viz = test_support::desktop();
        let _ = viz.compose_json(OXYGEN).unwrap();
        let (geo, mat) = viz.pool_stats();
        let misses = geo.misses + mat.misses;
        let _ = viz.compose_json(OXYGEN).unwrap();
        let (geo, mat) = viz.pool_stats();
        assert_eq!(geo.misses + mat.misses, misses);
        assert!(geo.hits > 0 && mat.hits > 0);
    }
}
