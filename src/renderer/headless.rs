//! A backend that draws nothing and remembers what it was asked to draw.
//!
//! Used by the CLI and by tests to observe frames without a GPU.

use super::{FrameView, RenderBackend, RendererSettings};
use crate::error::VizError;
use crate::scene::draw_list::DrawItem;

/// Counters and the last draw list seen by a [`HeadlessRenderer`].
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    frames: u64,
    settings: Option<RendererSettings>,
    pixel_ratio: f32,
    size: (u32, u32),
    last_items: Vec<DrawItem>,
    last_time_ms: f64,
}

impl HeadlessRenderer {
    /// A fresh backend at pixel ratio 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pixel_ratio: 1.0,
            ..Self::default()
        }
    }

    /// Frames rendered so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Settings from the last `configure` call.
    #[must_use]
    pub fn settings(&self) -> Option<&RendererSettings> {
        self.settings.as_ref()
    }

    /// Current pixel ratio.
    #[must_use]
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Current viewport size.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Draw list of the last rendered frame.
    #[must_use]
    pub fn last_items(&self) -> &[DrawItem] {
        &self.last_items
    }

    /// Timestamp of the last rendered frame.
    #[must_use]
    pub fn last_time_ms(&self) -> f64 {
        self.last_time_ms
    }
}

impl RenderBackend for HeadlessRenderer {
    fn configure(
        &mut self,
        settings: &RendererSettings,
    ) -> Result<(), VizError> {
        self.pixel_ratio = settings.pixel_ratio;
        self.settings = Some(*settings);
        Ok(())
    }

    fn set_pixel_ratio(&mut self, ratio: f32) {
        self.pixel_ratio = ratio;
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), VizError> {
        self.last_items = frame.draw_list();
        self.last_time_ms = frame.time_ms;
        self.frames += 1;
        Ok(())
    }
}
