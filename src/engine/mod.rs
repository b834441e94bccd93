//! The visualization context.
//!
//! A [`Visualizer`] owns everything one visualization instance needs: the
//! scene groups, the live resource store and its template pools, the
//! quality controller, the orbit camera and the render backend. Nothing
//! lives in globals, so several instances can coexist and tests can drive
//! one without a rendering surface.
//!
//! The impl is split across files by concern:
//! - [`compose`]: payload to scene (dispose, build, lay out)
//! - [`render_loop`]: frame tokens and per-frame work
//! - [`command`]: UI control commands

pub mod command;
pub mod compose;
pub mod render_loop;

use rand::rngs::StdRng;
use rand::SeedableRng;

use self::command::ViewMode;
use self::compose::ComposeReport;
use crate::camera::controller::OrbitController;
use crate::error::VizError;
use crate::options::Options;
use crate::quality::{DeviceProfile, QualityController};
use crate::renderer::{self, Light, RenderBackend, RendererSettings};
use crate::resources::pool::{PoolStats, ResourcePool};
use crate::resources::{GeometryDesc, GpuResources, MaterialDesc};
use crate::scene::Scene;
use crate::util::frame_timing::FpsMeter;

/// One visualization instance.
///
/// # Lifecycle
///
/// 1. [`new`](Self::new) evaluates the device profile, configures the
///    backend and places the camera.
/// 2. [`compose`](Self::compose) disposes the previous scene and builds a
///    new one from a payload. It can be called any number of times.
/// 3. [`start`](Self::start) hands out a frame token; every
///    [`frame`](Self::frame) presented with the current token advances
///    the animation and renders.
/// 4. [`execute`](Self::execute) applies UI commands between frames.
pub struct Visualizer<B: RenderBackend> {
    options: Options,
    scene: Scene,
    resources: GpuResources,
    geometries: ResourcePool<GeometryDesc>,
    materials: ResourcePool<MaterialDesc>,
    quality: QualityController,
    camera: OrbitController,
    backend: B,
    lights: Vec<Light>,
    rng: StdRng,

    // UI state
    view: ViewMode,
    labels_visible: bool,
    rotation_speed: f32,

    // Render loop state
    spin: f32,
    fps: FpsMeter,
    generation: u64,
    running: bool,
    last_frame_ms: Option<f64>,

    last_report: Option<ComposeReport>,
}

impl<B: RenderBackend> Visualizer<B> {
    /// Create a visualizer drawing through `backend` into a `width` x
    /// `height` viewport.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if it rejects the initial settings.
    pub fn new(
        options: Options,
        device: &DeviceProfile,
        mut backend: B,
        width: u32,
        height: u32,
    ) -> Result<Self, VizError> {
        let quality = QualityController::from_device(device, &options.quality);
        let settings =
            RendererSettings::from_quality(&quality, &options.lighting);
        backend.configure(&settings)?;
        backend.resize(width, height);

        let camera = OrbitController::new(&options.camera, width, height);
        let lights = renderer::lights(&options.lighting);
        let capacity = options.pool.max_entries;
        log::info!(
            "visualizer ready: {width}x{height}, {:?} mode, pixel ratio {}",
            quality.mode(),
            quality.pixel_ratio()
        );

        Ok(Self {
            rotation_speed: options.animation.rotation_speed,
            options,
            scene: Scene::new(),
            resources: GpuResources::new(),
            geometries: ResourcePool::new(capacity),
            materials: ResourcePool::new(capacity),
            quality,
            camera,
            backend,
            lights,
            rng: StdRng::from_rng(&mut rand::rng()),
            view: ViewMode::Both,
            labels_visible: true,
            spin: 0.0,
            fps: FpsMeter::new(),
            generation: 0,
            running: false,
            last_frame_ms: None,
            last_report: None,
        })
    }

    /// Replace the random source (coating jitter, halo phases) with a
    /// seeded one.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Renderer settings for the current quality state.
    #[must_use]
    pub fn settings(&self) -> RendererSettings {
        RendererSettings::from_quality(&self.quality, &self.options.lighting)
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The scene graph.
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The live resource store.
    #[must_use]
    pub fn resources(&self) -> &GpuResources {
        &self.resources
    }

    /// Geometry and material pool counters.
    #[must_use]
    pub fn pool_stats(&self) -> (PoolStats, PoolStats) {
        (self.geometries.stats(), self.materials.stats())
    }

    /// Total templates held by both pools.
    #[must_use]
    pub fn pooled_templates(&self) -> usize {
        self.geometries.len() + self.materials.len()
    }

    /// The quality controller.
    #[must_use]
    pub fn quality(&self) -> &QualityController {
        &self.quality
    }

    /// The orbit camera.
    #[must_use]
    pub fn camera(&self) -> &OrbitController {
        &self.camera
    }

    /// Scene lights.
    #[must_use]
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// The render backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The render backend, mutably.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Current view filter.
    #[must_use]
    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Whether labels are shown.
    #[must_use]
    pub fn labels_visible(&self) -> bool {
        self.labels_visible
    }

    /// Per-frame Y rotation increment in radians.
    #[must_use]
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    /// Report of the last successful composition.
    #[must_use]
    pub fn last_report(&self) -> Option<&ComposeReport> {
        self.last_report.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Visualizer;
    use crate::options::Options;
    use crate::quality::DeviceProfile;
    use crate::renderer::headless::HeadlessRenderer;

    /// Desktop visualizer with a headless backend and a fixed seed.
    pub(crate) fn desktop() -> Visualizer<HeadlessRenderer> {
        with_device(&DeviceProfile::desktop(2.0))
    }

    /// Visualizer for `device` with a headless backend and a fixed seed.
    pub(crate) fn with_device(
        device: &DeviceProfile,
    ) -> Visualizer<HeadlessRenderer> {
        Visualizer::new(
            Options::default(),
            device,
            HeadlessRenderer::new(),
            800,
            600,
        )
        .unwrap()
        .with_seed(42)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quality::PerformanceMode;

    #[test]
    fn new_configures_the_backend() {
        let viz = test_support::desktop();
        let settings = viz.backend().settings().unwrap();
        assert!(settings.antialias);
        assert_eq!(viz.backend().pixel_ratio(), 2.0);
        assert_eq!(viz.backend().size(), (800, 600));
        assert_eq!(viz.lights().len(), 3);
        assert_eq!(viz.quality().mode(), PerformanceMode::Normal);
        assert!(viz.scene().groups().all(|g| g.is_empty()));
    }

    #[test]
    fn device_without_webgl_starts_degraded() {
        let device = DeviceProfile {
            webgl: false,
            ..DeviceProfile::desktop(1.0)
        };
        let viz = test_support::with_device(&device);
        assert!(viz.quality().is_degraded());
        assert!(!viz.settings().shadows);
        assert!(!viz.backend().settings().unwrap().antialias);
    }
}
