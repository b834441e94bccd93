//! The seam between the scene and whatever draws it.
//!
//! A [`RenderBackend`] receives a [`FrameView`] per frame: the scene, the
//! live resources its handles point into, the camera uniform, the lights
//! and the current [`RendererSettings`]. The crate ships a
//! [`HeadlessRenderer`](headless::HeadlessRenderer); the `web` feature adds
//! a backend that forwards JSON frames to a JavaScript renderer.

pub mod headless;

use serde::Serialize;

use crate::camera::core::CameraUniform;
use crate::error::VizError;
use crate::options::LightingOptions;
use crate::quality::QualityController;
use crate::resources::GpuResources;
use crate::scene::draw_list::{self, DrawItem};
use crate::scene::Scene;
use crate::util::color::Color;

// ---------------------------------------------------------------------------
// Settings and lights
// ---------------------------------------------------------------------------

/// Renderer state that follows the quality controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RendererSettings {
    /// Multisample anti-aliasing.
    pub antialias: bool,
    /// Shadow maps.
    pub shadows: bool,
    /// Device pixel ratio to render at.
    pub pixel_ratio: f32,
    /// Tone-mapping exposure.
    pub exposure: f32,
    /// Clear color.
    pub background: Color,
}

impl RendererSettings {
    /// Settings for the current quality state.
    #[must_use]
    pub fn from_quality(
        quality: &QualityController,
        lighting: &LightingOptions,
    ) -> Self {
        let detail = quality.detail();
        Self {
            antialias: detail.antialias,
            shadows: detail.shadows,
            pixel_ratio: quality.pixel_ratio(),
            exposure: lighting.exposure,
            background: lighting.background,
        }
    }
}

/// Kind of light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    /// Uniform light from every direction.
    Ambient,
    /// Parallel light from a direction.
    Directional,
}

/// One scene light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Light {
    /// Light kind.
    pub kind: LightKind,
    /// Light color.
    pub color: Color,
    /// Intensity multiplier.
    pub intensity: f32,
    /// Position the light shines from (directional lights only).
    pub direction: Option<[f32; 3]>,
}

/// Ambient, key and fill lights from the lighting options.
#[must_use]
pub fn lights(opts: &LightingOptions) -> Vec<Light> {
    vec![
        Light {
            kind: LightKind::Ambient,
            color: opts.ambient_color,
            intensity: opts.ambient_intensity,
            direction: None,
        },
        Light {
            kind: LightKind::Directional,
            color: opts.key_color,
            intensity: opts.key_intensity,
            direction: Some(opts.key_dir),
        },
        Light {
            kind: LightKind::Directional,
            color: opts.fill_color,
            intensity: opts.fill_intensity,
            direction: Some(opts.fill_dir),
        },
    ]
}

// ---------------------------------------------------------------------------
// FrameView
// ---------------------------------------------------------------------------

/// Everything a backend needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    /// Scene graph to draw.
    pub scene: &'a Scene,
    /// Store the scene's handles resolve against.
    pub resources: &'a GpuResources,
    /// Camera for this frame.
    pub camera: &'a CameraUniform,
    /// Scene lights.
    pub lights: &'a [Light],
    /// Renderer settings for this frame.
    pub settings: &'a RendererSettings,
    /// Frame timestamp in milliseconds.
    pub time_ms: f64,
}

/// Serialized form of a frame, as handed to JavaScript renderers and
/// written by the CLI.
#[derive(Debug, Serialize)]
pub struct FrameRecord<'a> {
    /// Frame timestamp in milliseconds.
    pub time_ms: f64,
    /// Renderer settings.
    pub settings: &'a RendererSettings,
    /// Camera uniform.
    pub camera: &'a CameraUniform,
    /// Scene lights.
    pub lights: &'a [Light],
    /// Visible drawables.
    pub items: Vec<DrawItem>,
}

impl<'a> FrameView<'a> {
    /// Visible drawables in group order.
    #[must_use]
    pub fn draw_list(&self) -> Vec<DrawItem> {
        draw_list::collect(self.scene, self.resources)
    }

    /// Serializable snapshot of this frame.
    #[must_use]
    pub fn record(&self) -> FrameRecord<'a> {
        FrameRecord {
            time_ms: self.time_ms,
            settings: self.settings,
            camera: self.camera,
            lights: self.lights,
            items: self.draw_list(),
        }
    }

    /// The frame as JSON.
    ///
    /// # Errors
    ///
    /// [`VizError::Render`] if serialization fails.
    pub fn to_json(&self) -> Result<String, VizError> {
        serde_json::to_string(&self.record())
            .map_err(|e| VizError::Render(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// RenderBackend
// ---------------------------------------------------------------------------

/// Something that can draw frames.
pub trait RenderBackend {
    /// Apply renderer settings (called at startup and after degradation).
    fn configure(
        &mut self,
        settings: &RendererSettings,
    ) -> Result<(), VizError>;

    /// Change the device pixel ratio.
    fn set_pixel_ratio(&mut self, ratio: f32);

    /// Viewport size changed.
    fn resize(&mut self, width: u32, height: u32);

    /// Draw one frame.
    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), VizError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Options, QualityOptions};
    use crate::quality::DeviceProfile;

    #[test]
    fn settings_follow_degradation() {
        let mut quality = QualityController::from_device(
            &DeviceProfile::desktop(2.0),
            &QualityOptions::default(),
        );
        let lighting = LightingOptions::default();
        let full = RendererSettings::from_quality(&quality, &lighting);
        assert!(full.antialias && full.shadows);
        assert_eq!(full.pixel_ratio, 2.0);
        assert_eq!(full.exposure, 1.2);

        let _ = quality.observe_fps(10);
        let reduced = RendererSettings::from_quality(&quality, &lighting);
        assert!(!reduced.antialias && !reduced.shadows);
        assert_eq!(reduced.pixel_ratio, 1.0);
    }

    #[test]
    fn three_lights() {
        let all = lights(&Options::default().lighting);
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].kind, LightKind::Ambient);
        assert_eq!(all[2].color, Color(0x0000_88ff));
        assert_eq!(all[1].direction, Some([1.0, 1.0, 1.0]));
    }

    #[test]
    fn frame_serializes_to_json() {
        let scene = Scene::new();
        let resources = GpuResources::new();
        let camera = CameraUniform::default();
        let settings = RendererSettings {
            antialias: true,
            shadows: false,
            pixel_ratio: 1.0,
            exposure: 1.2,
            background: Color(0x0011_1111),
        };
        let frame = FrameView {
            scene: &scene,
            resources: &resources,
            camera: &camera,
            lights: &[],
            settings: &settings,
            time_ms: 16.0,
        };
        let json: serde_json::Value =
            serde_json::from_str(&frame.to_json().unwrap()).unwrap();
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["settings"]["background"], 0x0011_1111);
        assert_eq!(json["camera"]["fov_deg"], 60.0);
    }
}
