//! The visualizer's interactive vocabulary.
//!
//! Every user-facing operation (a DOM control change, a drag, a wheel
//! step, a container resize) is represented as a [`VizCommand`]. Hosts
//! translate their events into commands and pass them to
//! [`Visualizer::execute`].

use glam::Vec2;

use super::Visualizer;
use crate::renderer::RenderBackend;
use crate::scene::GroupKind;

/// Distances closer than this to the current one do not start a zoom
/// transition.
const ZOOM_EPSILON: f32 = 1e-4;

// ── View filter ──────────────────────────────────────────────────────────

/// Which groups the view filter shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Everything.
    #[default]
    Both,
    /// The nanoparticle alone.
    Nano,
    /// The drug molecule alone.
    Drug,
    /// Everything, with the interaction sites in focus.
    Interaction,
}

impl ViewMode {
    /// All modes in selector order.
    pub const ALL: [ViewMode; 4] =
        [Self::Both, Self::Nano, Self::Drug, Self::Interaction];

    /// Parse a selector value. Unknown values yield `None`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(value.trim()))
    }

    /// Selector value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Both => "both",
            Self::Nano => "nano",
            Self::Drug => "drug",
            Self::Interaction => "interaction",
        }
    }

    /// Whether `group` is visible in this mode.
    #[must_use]
    pub fn shows(self, group: GroupKind) -> bool {
        match (self, group) {
            (Self::Both | Self::Interaction, _)
            | (Self::Nano, GroupKind::Nanoparticle)
            | (Self::Drug, GroupKind::Molecule) => true,
            (Self::Nano | Self::Drug, _) => false,
        }
    }
}

// ── Commands ─────────────────────────────────────────────────────────────

/// A single interactive operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VizCommand {
    // ── Controls ──
    /// Apply a view filter.
    SetView(ViewMode),
    /// Rotation slider moved (0–100).
    SetRotationSpeed(f32),
    /// Zoom slider moved (0–100, higher is closer).
    SetZoom(f32),
    /// Label checkbox toggled.
    ShowLabels(bool),

    // ── Camera input ──
    /// Drag by a pixel delta.
    RotateCamera {
        /// Pointer movement in pixels.
        delta: Vec2,
    },
    /// Wheel zoom; positive steps move closer.
    Zoom {
        /// Wheel steps.
        steps: f32,
    },

    // ── Viewport ──
    /// The container was resized.
    Resize {
        /// New width in CSS pixels.
        width: u32,
        /// New height in CSS pixels.
        height: u32,
    },
}

impl<B: RenderBackend> Visualizer<B> {
    /// Apply one command.
    pub fn execute(&mut self, command: VizCommand) {
        match command {
            VizCommand::SetView(mode) => self.set_view(mode),
            VizCommand::SetRotationSpeed(value) => {
                self.set_rotation_slider(value);
            }
            VizCommand::SetZoom(value) => self.set_zoom_slider(value),
            VizCommand::ShowLabels(show) => self.set_labels_visible(show),
            VizCommand::RotateCamera { delta } => self.camera.rotate(delta),
            VizCommand::Zoom { steps } => self.camera.zoom(steps),
            VizCommand::Resize { width, height } => {
                self.camera.resize(width, height);
                self.backend.resize(width, height);
            }
        }
    }

    /// Show and hide groups per `mode`.
    pub fn set_view(&mut self, mode: ViewMode) {
        self.view = mode;
        for kind in GroupKind::ALL {
            self.scene.group_mut(kind).set_visible(mode.shows(kind));
        }
        log::debug!("view mode: {}", mode.as_str());
    }

    /// Map a 0–100 slider value linearly to the per-frame rotation
    /// increment.
    pub fn set_rotation_slider(&mut self, value: f32) {
        let t = slider_fraction(value);
        self.rotation_speed = t * self.options.animation.max_rotation_speed;
    }

    /// Map a 0–100 slider value linearly (inverted) to the orbit distance
    /// and ease there.
    pub fn set_zoom_slider(&mut self, value: f32) {
        let cam = &self.options.camera;
        let t = slider_fraction(value);
        let distance =
            cam.max_distance - t * (cam.max_distance - cam.min_distance);
        if (self.camera.distance() - distance).abs() > ZOOM_EPSILON {
            self.camera
                .zoom_to(distance, self.options.animation.zoom_transition_ms);
        }
    }

    /// Show or hide every stored label. Labels built later start with
    /// this visibility.
    pub fn set_labels_visible(&mut self, show: bool) {
        self.labels_visible = show;
        for kind in GroupKind::ALL {
            self.scene.group_mut(kind).set_labels_visible(show);
        }
    }
}

/// Slider value as a fraction in `0.0..=1.0`. Non-finite values count as
/// zero.
fn slider_fraction(value: f32) -> f32 {
    if value.is_finite() {
        (value / 100.0).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
