//! Shared utilities: colors, easing and frame-rate measurement.

pub mod color;
pub mod easing;
pub mod frame_timing;
