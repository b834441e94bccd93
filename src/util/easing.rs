//! Easing curve for timed transitions.

/// Decelerating progress `1 - (1 - t)^3` for linear progress `t`, clamped
/// to `0..=1`. NaN counts as finished.
#[must_use]
pub fn cubic_out(t: f32) -> f32 {
    let t = if t.is_nan() { 1.0 } else { t.clamp(0.0, 1.0) };
    1.0 - (1.0 - t).powi(3)
}
