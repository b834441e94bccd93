//! Frame tokens and per-frame work.
//!
//! The host owns the scheduler (`requestAnimationFrame` on the web, a
//! plain loop in the CLI). [`Visualizer::start`] hands out a token stamped
//! with a new generation; frames presented with an older token are
//! rejected, so restarting the loop cancels the previous chain and at most
//! one chain is ever live.

use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use glam::{Quat, Vec3};

use super::Visualizer;
use crate::error::VizError;
use crate::renderer::{FrameView, RenderBackend};
use crate::scene::Node;

/// Generation stamp of one render-loop chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameToken(u64);

/// What [`Visualizer::frame`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was drawn.
    Rendered {
        /// This frame's FPS sample switched the session to degraded mode.
        degraded: bool,
    },
    /// The token is stale or the loop is stopped; nothing was done and the
    /// host should not schedule another frame for this chain.
    Cancelled,
}

impl<B: RenderBackend> Visualizer<B> {
    /// Start a new render loop, cancelling any previous one.
    pub fn start(&mut self) -> FrameToken {
        self.generation += 1;
        self.running = true;
        self.fps.reset();
        self.last_frame_ms = None;
        log::debug!("render loop {} started", self.generation);
        FrameToken(self.generation)
    }

    /// Stop the current render loop.
    pub fn stop(&mut self) {
        if self.running {
            log::debug!("render loop {} stopped", self.generation);
        }
        self.generation += 1;
        self.running = false;
    }

    /// Whether a render loop is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether `token` belongs to the live render loop.
    #[must_use]
    pub fn is_current(&self, token: FrameToken) -> bool {
        self.running && token.0 == self.generation
    }

    /// Last sampled frames per second.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Advance one frame at `now_ms` and draw it.
    ///
    /// In order: count the frame and, once per second, feed the FPS sample
    /// to the quality controller (lowering the backend pixel ratio if it
    /// degrades); spin the molecule and nanoparticle groups; update the
    /// orbit camera; pulse the interaction halos unless degraded; render.
    ///
    /// # Errors
    ///
    /// Propagates backend render failures.
    pub fn frame(
        &mut self,
        token: FrameToken,
        now_ms: f64,
    ) -> Result<FrameOutcome, VizError> {
        if !self.is_current(token) {
            return Ok(FrameOutcome::Cancelled);
        }

        let mut degraded = false;
        if let Some(fps) = self.fps.tick(now_ms) {
            if self.quality.observe_fps(fps) {
                degraded = true;
                self.backend.set_pixel_ratio(self.quality.pixel_ratio());
            }
        }

        self.spin = (self.spin + self.rotation_speed) % TAU;
        let rotation = Quat::from_rotation_y(self.spin);
        self.scene.molecule.root_mut().transform.rotation = rotation;
        self.scene.nanoparticle.root_mut().transform.rotation = rotation;

        let dt = self.last_frame_ms.map_or(0.0, |last| now_ms - last);
        self.last_frame_ms = Some(now_ms);
        self.camera.update(dt.max(0.0) as f32);

        if !self.quality.is_degraded() {
            let anim = &self.options.animation;
            pulse_halos(
                self.scene.interaction.root_mut(),
                now_ms,
                anim.pulse_amplitude,
                anim.pulse_rate,
            );
        }

        self.render(now_ms)?;
        Ok(FrameOutcome::Rendered { degraded })
    }

    /// Draw the scene as it is, without advancing anything.
    ///
    /// # Errors
    ///
    /// Propagates backend render failures.
    pub fn render(&mut self, now_ms: f64) -> Result<(), VizError> {
        let settings = self.settings();
        let view = FrameView {
            scene: &self.scene,
            resources: &self.resources,
            camera: &self.camera.uniform,
            lights: &self.lights,
            settings: &settings,
            time_ms: now_ms,
        };
        self.backend
            .render(&view)
            .inspect_err(|e| log::error!("{e}"))
    }

    /// The current frame serialized as JSON.
    ///
    /// # Errors
    ///
    /// [`VizError::Render`] if serialization fails.
    pub fn frame_json(&self, now_ms: f64) -> Result<String, VizError> {
        let settings = self.settings();
        FrameView {
            scene: &self.scene,
            resources: &self.resources,
            camera: &self.camera.uniform,
            lights: &self.lights,
            settings: &settings,
            time_ms: now_ms,
        }
        .to_json()
    }
}

// ── Active session ───────────────────────────────────────────────────────

/// A visualizer shared between the host's frame and event callbacks.
pub type SharedVisualizer<B> = Rc<RefCell<Visualizer<B>>>;

/// The one visualizer a page drives. Installing a new one stops the
/// previous, so re-initialization never leaves two live loops.
pub struct ActiveSession<B: RenderBackend> {
    current: RefCell<Option<SharedVisualizer<B>>>,
}

impl<B: RenderBackend> ActiveSession<B> {
    /// An empty session.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: RefCell::new(None),
        }
    }

    /// Stop and release the active visualizer, if any.
    pub fn stop(&self) {
        let previous = self.current.borrow_mut().take();
        if let Some(previous) = previous {
            log::info!("stopping the previous visualization");
            previous.borrow_mut().stop();
        }
    }

    /// Make `viz` the active visualizer, stopping the one it replaces.
    pub fn install(&self, viz: &SharedVisualizer<B>) {
        self.stop();
        *self.current.borrow_mut() = Some(Rc::clone(viz));
    }

    /// Whether `viz` is the active visualizer.
    #[must_use]
    pub fn is_active(&self, viz: &SharedVisualizer<B>) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, viz))
    }
}

impl<B: RenderBackend> Default for ActiveSession<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Set every halo's uniform scale for `time_ms`.
fn pulse_halos(node: &mut Node, time_ms: f64, amplitude: f32, rate: f32) {
    for child in node.children_mut() {
        if let Some(pulse) = child.pulse {
            let scale = pulse.scale_at(time_ms, amplitude, rate);
            child.transform.scale = Vec3::splat(scale);
        }
        pulse_halos(child, time_ms, amplitude, rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support;
    use crate::payload::VisualizationPayload;
    use crate::quality::{DegradeReason, PerformanceMode};

    const HBOND: &str = r#"{
        "interaction_points": [{
            "position": {"x": 0, "y": 0, "z": 0},
            "target_position": {"x": 1, "y": 0, "z": 0},
            "type": "hbond"
        }]
    }"#;

    fn halo_scale<B: RenderBackend>(viz: &Visualizer<B>) -> Vec3 {
        viz.scene()
            .interaction
            .children()
            .iter()
            .find(|n| n.pulse.is_some())
            .unwrap()
            .transform
            .scale
    }

    /// Present `count` frames `step_ms` apart starting at `t`.
    fn run<B: RenderBackend>(
        viz: &mut Visualizer<B>,
        token: FrameToken,
        t: &mut f64,
        count: u32,
        step_ms: f64,
    ) {
        for _ in 0..count {
            *t += step_ms;
            let outcome = viz.frame(token, *t).unwrap();
            assert!(matches!(outcome, FrameOutcome::Rendered { .. }));
        }
    }

    #[test]
    fn frames_without_start_are_cancelled() {
        let mut viz = test_support::desktop();
        let token = FrameToken(0);
        assert_eq!(viz.frame(token, 0.0).unwrap(), FrameOutcome::Cancelled);
        assert_eq!(viz.backend().frames(), 0);
    }

    #[test]
    fn restart_cancels_the_previous_chain() {
        let mut viz = test_support::desktop();
        let first = viz.start();
        let second = viz.start();
        assert!(!viz.is_current(first));
        assert_eq!(viz.frame(first, 16.0).unwrap(), FrameOutcome::Cancelled);
        assert!(matches!(
            viz.frame(second, 16.0).unwrap(),
            FrameOutcome::Rendered { degraded: false }
        ));
        assert_eq!(viz.backend().frames(), 1);

        viz.stop();
        assert!(!viz.is_running());
        let outcome = viz.frame(second, 32.0).unwrap();
        assert_eq!(outcome, FrameOutcome::Cancelled);
    }

    #[test]
    fn installing_a_visualizer_stops_the_previous_one() {
        let session = ActiveSession::new();
        let first = Rc::new(RefCell::new(test_support::desktop()));
        session.install(&first);
        let old = first.borrow_mut().start();

        let second = Rc::new(RefCell::new(test_support::desktop()));
        session.install(&second);
        let token = second.borrow_mut().start();

        assert!(!first.borrow().is_running());
        let outcome = first.borrow_mut().frame(old, 16.0).unwrap();
        assert_eq!(outcome, FrameOutcome::Cancelled);
        assert!(second.borrow().is_current(token));
        assert!(session.is_active(&second));
        assert!(!session.is_active(&first));

        session.stop();
        assert!(!second.borrow().is_running());
        assert!(!session.is_active(&second));
    }

    #[test]
    fn groups_spin_by_the_rotation_increment() {
        let mut viz = test_support::desktop();
        let _ = viz.compose(&VisualizationPayload::demo()).unwrap();
        let token = viz.start();
        let mut t = 0.0;
        run(&mut viz, token, &mut t, 10, 16.0);

        let expected = Quat::from_rotation_y(10.0 * 0.003);
        let scene = viz.scene();
        let spun = |g: &crate::scene::Group| g.root().transform.rotation;
        assert!(spun(&scene.molecule).abs_diff_eq(expected, 1e-5));
        assert!(spun(&scene.nanoparticle).abs_diff_eq(expected, 1e-5));
        assert_eq!(spun(&scene.interaction), Quat::IDENTITY);
        assert!(!viz.backend().last_items().is_empty());
    }

    #[test]
    fn halos_pulse_while_not_degraded() {
        let mut viz = test_support::desktop();
        let _ = viz.compose_json(HBOND).unwrap();
        let token = viz.start();
        let phase = viz
            .scene()
            .interaction
            .children()
            .iter()
            .find_map(|n| n.pulse)
            .unwrap()
            .phase;

        let t = 1234.0;
        let _ = viz.frame(token, t).unwrap();
        let angle = t * 0.003 + f64::from(phase);
        let expected = 1.0 + 0.3 * angle.sin() as f32;
        assert!((halo_scale(&viz).x - expected).abs() < 1e-5);
    }

    #[test]
    fn low_fps_degrades_once_and_never_recovers() {
        let mut viz = test_support::desktop();
        let _ = viz.compose_json(HBOND).unwrap();
        let token = viz.start();
        let mut t = 0.0;

        // 10 frames per second for just over one second.
        let mut degraded_frames = 0;
        for _ in 0..12 {
            t += 100.0;
            if let FrameOutcome::Rendered { degraded: true } =
                viz.frame(token, t).unwrap()
            {
                degraded_frames += 1;
            }
        }
        assert_eq!(degraded_frames, 1);
        assert_eq!(viz.quality().mode(), PerformanceMode::Degraded);
        assert!(matches!(
            viz.quality().reason(),
            Some(DegradeReason::LowFps(_))
        ));
        assert_eq!(viz.backend().pixel_ratio(), 1.0);

        // Three seconds at 60 fps do not restore normal mode.
        run(&mut viz, token, &mut t, 180, 1000.0 / 60.0);
        assert!(viz.quality().is_degraded());
        assert!(viz.fps() >= 59);

        // Halos freeze once degraded.
        let frozen = halo_scale(&viz);
        run(&mut viz, token, &mut t, 5, 16.0);
        assert_eq!(halo_scale(&viz), frozen);
    }

    #[test]
    fn frame_json_lists_visible_items() {
        let mut viz = test_support::desktop();
        let _ = viz.compose_json(HBOND).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&viz.frame_json(0.0).unwrap()).unwrap();
        assert_eq!(json["items"].as_array().unwrap().len(), 4);
        assert_eq!(json["lights"].as_array().unwrap().len(), 3);
    }
}
