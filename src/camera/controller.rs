use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, Vec3};

use crate::camera::core::{CameraUniform, PerspectiveCamera};
use crate::options::CameraOptions;
use crate::util::easing::cubic_out;

/// Pitch stays this far from the poles so `look_at` never degenerates.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Eased change of orbit distance over a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomTransition {
    from: f32,
    to: f32,
    elapsed_ms: f32,
    duration_ms: f32,
}

impl ZoomTransition {
    /// Distance at the current elapsed time.
    #[must_use]
    pub fn current(&self) -> f32 {
        let t = if self.duration_ms > 0.0 {
            self.elapsed_ms / self.duration_ms
        } else {
            1.0
        };
        self.from + (self.to - self.from) * cubic_out(t)
    }

    /// Whether the transition has reached its target.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Target distance.
    #[must_use]
    pub fn target(&self) -> f32 {
        self.to
    }
}

/// Orbit camera around a target point.
///
/// Drag input accumulates a rotation delta that is applied gradually: each
/// update applies `damping` of the pending delta and keeps the rest, so
/// the camera glides to a stop. Distance changes either immediately (wheel
/// zoom) or through a [`ZoomTransition`].
#[derive(Debug, Clone)]
pub struct OrbitController {
    yaw: f32,
    pitch: f32,
    distance: f32,
    target: Vec3,
    pending: Vec2,
    transition: Option<ZoomTransition>,
    viewport_height: f32,

    /// Camera derived from the orbit state.
    pub camera: PerspectiveCamera,
    /// Uniform mirror of `camera`, refreshed on every update.
    pub uniform: CameraUniform,

    rotate_speed: f32,
    zoom_speed: f32,
    damping: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitController {
    /// Camera at `initial_distance` on +Z looking at the origin.
    #[must_use]
    pub fn new(opts: &CameraOptions, width: u32, height: u32) -> Self {
        let camera = PerspectiveCamera {
            eye: Vec3::new(0.0, 0.0, opts.initial_distance),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: aspect(width, height),
            fov_deg: opts.fov_deg,
            near: opts.near,
            far: opts.far,
        };
        let uniform = CameraUniform::from(&camera);

        let mut controller = Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: opts.initial_distance,
            target: Vec3::ZERO,
            pending: Vec2::ZERO,
            transition: None,
            viewport_height: height.max(1) as f32,
            camera,
            uniform,
            rotate_speed: opts.rotate_speed,
            zoom_speed: opts.zoom_speed,
            damping: opts.damping.clamp(0.0, 1.0),
            min_distance: opts.min_distance,
            max_distance: opts.max_distance,
        };
        controller.update_camera_pos();
        controller
    }

    fn update_camera_pos(&mut self) {
        let dir = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        );
        self.camera.eye = self.target + dir * self.distance;
        self.camera.target = self.target;
        self.camera.up = Vec3::Y;
        self.uniform = CameraUniform::from(&self.camera);
    }

    /// Viewport size changed.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.aspect = aspect(width, height);
        self.viewport_height = height.max(1) as f32;
        self.uniform = CameraUniform::from(&self.camera);
    }

    /// Queue a drag rotation of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        let scale = TAU / self.viewport_height * self.rotate_speed;
        self.pending -= delta * scale;
    }

    /// Wheel zoom: positive `steps` move closer. Cancels any running
    /// transition.
    pub fn zoom(&mut self, steps: f32) {
        self.transition = None;
        let factor = (1.0 - steps * self.zoom_speed).max(0.01);
        self.distance = self.clamp_distance(self.distance * factor);
        self.update_camera_pos();
    }

    /// Start an eased transition to `distance` (clamped to the limits).
    pub fn zoom_to(&mut self, distance: f32, duration_ms: f32) {
        self.transition = Some(ZoomTransition {
            from: self.distance,
            to: self.clamp_distance(distance),
            elapsed_ms: 0.0,
            duration_ms: duration_ms.max(0.0),
        });
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.min_distance, self.max_distance)
    }

    /// Advance damping and any zoom transition by `dt_ms`.
    pub fn update(&mut self, dt_ms: f32) {
        if let Some(mut transition) = self.transition {
            transition.elapsed_ms += dt_ms.max(0.0);
            self.distance = transition.current();
            self.transition =
                (!transition.is_finished()).then_some(transition);
        }

        if self.pending != Vec2::ZERO {
            let step = self.pending * self.damping;
            self.yaw += step.x;
            self.pitch = (self.pitch + step.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            self.pending -= step;
            if self.pending.length_squared() < 1e-12 {
                self.pending = Vec2::ZERO;
            }
        }
        self.update_camera_pos();
    }

    /// Current orbit distance.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// The running zoom transition, if any.
    #[must_use]
    pub fn transition(&self) -> Option<&ZoomTransition> {
        self.transition.as_ref()
    }

    /// Whether damping or a transition still moves the camera.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some() || self.pending != Vec2::ZERO
    }
}

fn aspect(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}
