//! Frame counting for FPS sampling.

/// Window over which frames are counted before an FPS sample is taken.
const SAMPLE_WINDOW_MS: f64 = 1000.0;

/// Counts frames per wall-clock second.
///
/// Timestamps are milliseconds on any monotonic clock (the browser's
/// `requestAnimationFrame` timestamp, or `Instant` elapsed on native).
#[derive(Debug, Clone)]
pub struct FpsMeter {
    /// Frames counted since the window started.
    frame_count: u32,
    /// Start of the current window, `None` until the first frame.
    window_start: Option<f64>,
    /// Most recent full-window sample.
    fps: u32,
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsMeter {
    /// Create a meter that reports 60 FPS until the first window closes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            window_start: None,
            fps: 60,
        }
    }

    /// Record a frame at `now_ms`. Returns `Some(fps)` when a one-second
    /// window just closed.
    pub fn tick(&mut self, now_ms: f64) -> Option<u32> {
        self.frame_count += 1;
        let start = *self.window_start.get_or_insert(now_ms);
        if now_ms - start < SAMPLE_WINDOW_MS {
            return None;
        }
        self.fps = self.frame_count;
        self.frame_count = 0;
        self.window_start = Some(now_ms);
        Some(self.fps)
    }

    /// Get the last sampled FPS.
    #[must_use]
    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Drop the current window (used when a new loop starts).
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_once_per_second() {
        let mut meter = FpsMeter::new();
        let mut samples = Vec::new();
        // 30 frames per second for two seconds.
        for i in 0..=60_u32 {
            if let Some(fps) = meter.tick(f64::from(i) * (1000.0 / 30.0)) {
                samples.push(fps);
            }
        }
        assert_eq!(samples.len(), 2);
        assert!(samples.iter().all(|&fps| (30..=31).contains(&fps)));
    }

    #[test]
    fn no_sample_inside_window() {
        let mut meter = FpsMeter::new();
        assert_eq!(meter.tick(0.0), None);
        assert_eq!(meter.tick(500.0), None);
        assert_eq!(meter.fps(), 60);
    }
}
