//! Entity builders: payload records to scene nodes.
//!
//! Every builder takes a [`BuildContext`] (the resource store, the two
//! template pools, the node id allocator, options and the current detail
//! level) plus one payload record, and adds nodes to a [`Group`]. A record
//! that cannot be built returns a [`BuildError`]; the batch drivers log it
//! and move on to the next record.
//!
//! [`Group`]: crate::scene::Group

pub mod coating;
pub mod interaction;
pub mod label;
pub mod molecule;
pub mod nanoparticle;

use std::fmt;

use glam::Vec3;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::options::Options;
use crate::quality::Detail;
use crate::resources::pool::ResourcePool;
use crate::resources::{
    GeometryDesc, GeometryHandle, GpuResources, MaterialDesc, MaterialHandle,
};
use crate::scene::{Node, NodeIds, NodeKind};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a single payload record was skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// A required position is absent.
    MissingPosition(&'static str),
    /// A coordinate or scalar is NaN or infinite.
    NonFinite(&'static str),
    /// A size or radius is zero or negative.
    NonPositive {
        /// Which quantity.
        what: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A bond shorter than the minimum length.
    DegenerateBond(f32),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPosition(what) => write!(f, "{what} has no position"),
            Self::NonFinite(what) => write!(f, "{what} is not finite"),
            Self::NonPositive { what, value } => {
                write!(f, "{what} must be positive (got {value})")
            }
            Self::DegenerateBond(len) => {
                write!(f, "bond length {len:.3} is below the minimum")
            }
        }
    }
}

impl std::error::Error for BuildError {}

/// Reject NaN / infinite positions.
pub(crate) fn finite(
    v: Vec3,
    what: &'static str,
) -> Result<Vec3, BuildError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(BuildError::NonFinite(what))
    }
}

/// Reject non-positive or non-finite scalars.
pub(crate) fn positive(
    value: f32,
    what: &'static str,
) -> Result<f32, BuildError> {
    if !value.is_finite() {
        Err(BuildError::NonFinite(what))
    } else if value <= 0.0 {
        Err(BuildError::NonPositive { what, value })
    } else {
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

/// Built / skipped tally for one kind of record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BuildCounts {
    /// Records that produced nodes.
    pub built: usize,
    /// Records that were skipped.
    pub skipped: usize,
}

impl BuildCounts {
    /// Tally one record, logging the reason when it was skipped.
    pub fn record(
        &mut self,
        what: &str,
        index: usize,
        result: Result<(), BuildError>,
    ) {
        match result {
            Ok(()) => self.built += 1,
            Err(BuildError::DegenerateBond(len)) => {
                log::debug!("skipping {what} {index}: length {len:.3}");
                self.skipped += 1;
            }
            Err(e) => {
                log::warn!("skipping {what} {index}: {e}");
                self.skipped += 1;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// BuildContext
// ---------------------------------------------------------------------------

/// Everything a builder needs besides the record it builds.
pub struct BuildContext<'a> {
    /// Live resource store; every created node's handles live here.
    pub resources: &'a mut GpuResources,
    /// Geometry template pool.
    pub geometries: &'a mut ResourcePool<GeometryDesc>,
    /// Material template pool.
    pub materials: &'a mut ResourcePool<MaterialDesc>,
    /// Node id allocator.
    pub ids: &'a mut NodeIds,
    /// Sizes, colors and segment counts.
    pub options: &'a Options,
    /// What to build at the current performance mode.
    pub detail: Detail,
    /// Initial visibility of new labels.
    pub labels_visible: bool,
    /// Source for coating jitter and halo phases.
    pub rng: &'a mut StdRng,
}

impl BuildContext<'_> {
    /// Fresh empty node.
    pub fn node(&mut self, kind: NodeKind) -> Node {
        Node::new(self.ids.next_id(), kind)
    }

    /// Node drawing `geometry` with `material`.
    pub fn mesh(
        &mut self,
        kind: NodeKind,
        geometry: GeometryHandle,
        material: MaterialHandle,
    ) -> Node {
        let mut node = self.node(kind);
        node.geometry = Some(geometry);
        node.material = Some(material);
        node
    }

    /// Live clone of the pooled geometry template for `key`.
    pub fn geometry(
        &mut self,
        key: &str,
        factory: impl FnOnce() -> GeometryDesc,
    ) -> GeometryHandle {
        let desc = self.geometries.acquire(key, factory);
        self.resources.create_geometry(desc)
    }

    /// Live clone of the pooled material template for `key`.
    pub fn material(
        &mut self,
        key: &str,
        factory: impl FnOnce() -> MaterialDesc,
    ) -> MaterialHandle {
        let desc = self.materials.acquire(key, factory);
        self.resources.create_material(desc)
    }

    /// Pooled UV sphere geometry.
    pub fn sphere(&mut self, radius: f32, segments: u32) -> GeometryHandle {
        self.geometry(&format!("sphere_{radius:.3}_{segments}"), || {
            GeometryDesc::Sphere { radius, segments }
        })
    }

    /// Pooled unit quad for sprites and labels.
    pub fn quad(&mut self) -> GeometryHandle {
        self.geometry("quad", || GeometryDesc::Quad)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::Fixture;
    use super::*;
    use crate::quality::PerformanceMode;

    #[test]
    fn pooled_geometry_is_cloned_per_node() {
        let mut fx = Fixture::new(PerformanceMode::Normal);
        let mut ctx = fx.ctx();
        let a = ctx.sphere(0.5, 16);
        let b = ctx.sphere(0.5, 16);
        assert_ne!(a, b);
        assert_eq!(fx.geometries.len(), 1);
        assert_eq!(fx.resources.live().geometries, 2);
    }

    #[test]
    fn scalar_validation() {
        assert!(positive(1.0, "size").is_ok());
        assert_eq!(
            positive(-2.0, "size"),
            Err(BuildError::NonPositive {
                what: "size",
                value: -2.0
            })
        );
        assert_eq!(
            positive(f32::NAN, "size"),
            Err(BuildError::NonFinite("size"))
        );
        assert!(finite(Vec3::new(0.0, f32::INFINITY, 0.0), "atom").is_err());
    }

    #[test]
    fn counts_tally_skips() {
        let mut counts = BuildCounts::default();
        counts.record("atom", 0, Ok(()));
        counts.record("atom", 1, Err(BuildError::MissingPosition("atom")));
        counts.record("bond", 2, Err(BuildError::DegenerateBond(0.01)));
        assert_eq!(
            counts,
            BuildCounts {
                built: 1,
                skipped: 2
            }
        );
    }
}
