use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Segment count for one primitive in normal and degraded mode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct Segments {
    /// Segments in normal mode.
    pub normal: u32,
    /// Segments once degraded.
    pub degraded: u32,
}

impl Segments {
    /// Segment count for the given mode.
    #[must_use]
    pub fn pick(self, degraded: bool) -> u32 {
        if degraded {
            self.degraded
        } else {
            self.normal
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Quality", inline)]
#[serde(default)]
/// Adaptive quality thresholds and geometry detail levels.
pub struct QualityOptions {
    /// Measured FPS below which the session degrades.
    #[schemars(title = "Low FPS Threshold", range(min = 5, max = 60))]
    pub low_fps_threshold: u32,
    /// Segments for small spheres (coating particles, markers, halos).
    #[schemars(skip)]
    pub small_sphere_segments: u32,
    /// Pixel ratio cap for mobile devices or weak texture support.
    #[schemars(skip)]
    pub reduced_max_pixel_ratio: f32,
    /// Pixel ratio cap after a low-FPS degradation.
    #[schemars(skip)]
    pub degraded_max_pixel_ratio: f32,
    /// Whether missing compressed-texture extensions degrade the session
    /// (otherwise they only cap the pixel ratio).
    #[schemars(title = "Degrade Without Texture Compression")]
    pub degrade_without_compressed_textures: bool,
    /// Atom sphere segments.
    #[schemars(skip)]
    pub atom_segments: Segments,
    /// Bond cylinder segments.
    #[schemars(skip)]
    pub bond_segments: Segments,
    /// Nanoparticle core and shell sphere segments.
    #[schemars(skip)]
    pub particle_segments: Segments,
    /// Nanorod body and cap segments.
    #[schemars(skip)]
    pub rod_segments: Segments,
}

impl Default for QualityOptions {
    fn default() -> Self {
        Self {
            low_fps_threshold: 20,
            atom_segments: Segments {
                normal: 16,
                degraded: 8,
            },
            bond_segments: Segments {
                normal: 8,
                degraded: 6,
            },
            particle_segments: Segments {
                normal: 32,
                degraded: 16,
            },
            rod_segments: Segments {
                normal: 16,
                degraded: 8,
            },
            small_sphere_segments: 8,
            reduced_max_pixel_ratio: 1.5,
            degraded_max_pixel_ratio: 1.0,
            degrade_without_compressed_textures: true,
        }
    }
}
