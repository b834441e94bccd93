//! Adaptive quality: device heuristics, measured FPS and one-way
//! degradation.
//!
//! The controller starts in [`PerformanceMode::Normal`] unless the device
//! profile already looks weak. Once degraded it never returns to normal for
//! the rest of the session; builders consult [`Detail`] to decide which
//! optional nodes to emit and how many segments to use.

use crate::options::QualityOptions;

/// User-agent substrings (lowercase) that identify mobile devices.
const MOBILE_MARKERS: [&str; 8] = [
    "android",
    "webos",
    "iphone",
    "ipad",
    "ipod",
    "blackberry",
    "iemobile",
    "opera mini",
];

/// WebGL extensions whose absence marks weak texture support.
const COMPRESSED_TEXTURE_EXTENSIONS: [&str; 2] =
    ["WEBGL_compressed_texture_s3tc", "WEBGL_compressed_texture_etc"];

// ---------------------------------------------------------------------------
// Mode and reasons
// ---------------------------------------------------------------------------

/// Session-wide performance mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PerformanceMode {
    /// Full detail.
    #[default]
    Normal,
    /// Reduced detail; irreversible for the session.
    Degraded,
}

/// Why the session was degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradeReason {
    /// The device has no WebGL context.
    NoWebGl,
    /// The user agent matches a mobile device.
    MobileDevice,
    /// Neither compressed-texture extension is available.
    MissingTextureCompression,
    /// Measured frames per second fell below the threshold.
    LowFps(u32),
}

impl std::fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoWebGl => write!(f, "WebGL unavailable"),
            Self::MobileDevice => write!(f, "mobile device"),
            Self::MissingTextureCompression => {
                write!(f, "no compressed texture support")
            }
            Self::LowFps(fps) => write!(f, "low frame rate ({fps} fps)"),
        }
    }
}

// ---------------------------------------------------------------------------
// DeviceProfile
// ---------------------------------------------------------------------------

/// What the host reports about the device at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceProfile {
    /// Navigator user agent string.
    pub user_agent: String,
    /// Whether a WebGL context could be created.
    pub webgl: bool,
    /// Supported WebGL extension names.
    pub extensions: Vec<String>,
    /// `window.devicePixelRatio`.
    pub device_pixel_ratio: f32,
}

impl DeviceProfile {
    /// A capable desktop with the given pixel ratio (CLI and tests).
    #[must_use]
    pub fn desktop(device_pixel_ratio: f32) -> Self {
        Self {
            user_agent: "nanoviz-headless".to_owned(),
            webgl: true,
            extensions: COMPRESSED_TEXTURE_EXTENSIONS
                .iter()
                .map(|e| (*e).to_owned())
                .collect(),
            device_pixel_ratio,
        }
    }

    /// Whether the user agent names a mobile device (case-insensitive).
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        let ua = self.user_agent.to_lowercase();
        MOBILE_MARKERS.iter().any(|m| ua.contains(m))
    }

    /// Whether at least one compressed-texture extension is present.
    #[must_use]
    pub fn has_compressed_textures(&self) -> bool {
        self.extensions
            .iter()
            .any(|e| COMPRESSED_TEXTURE_EXTENSIONS.contains(&e.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Detail
// ---------------------------------------------------------------------------

/// Which optional parts of the scene the builders and renderer produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct Detail {
    /// Reduced segment counts and wireframe shells.
    pub degraded: bool,
    /// Text labels on atoms, nanoparticles and interactions.
    pub labels: bool,
    /// Additive glow sprite around spherical nanoparticles.
    pub glow: bool,
    /// Coating particle layer.
    pub coating: bool,
    /// White outline around cubic nanoparticles.
    pub cube_edges: bool,
    /// Pulsing interaction halos.
    pub halos: bool,
    /// Shadow maps.
    pub shadows: bool,
    /// Anti-aliasing.
    pub antialias: bool,
}

impl Detail {
    /// Detail for a performance mode.
    #[must_use]
    pub fn for_mode(mode: PerformanceMode) -> Self {
        let full = mode == PerformanceMode::Normal;
        Self {
            degraded: !full,
            labels: full,
            glow: full,
            coating: full,
            cube_edges: full,
            halos: full,
            shadows: full,
            antialias: full,
        }
    }
}

// ---------------------------------------------------------------------------
// QualityController
// ---------------------------------------------------------------------------

/// One-way degradation state machine.
#[derive(Debug, Clone)]
pub struct QualityController {
    mode: PerformanceMode,
    reason: Option<DegradeReason>,
    device_pixel_ratio: f32,
    pixel_ratio: f32,
    low_fps_threshold: u32,
    degraded_max_pixel_ratio: f32,
}

impl QualityController {
    /// Evaluate the device heuristics and pick the starting mode and pixel
    /// ratio.
    #[must_use]
    pub fn from_device(device: &DeviceProfile, opts: &QualityOptions) -> Self {
        let dpr = device.device_pixel_ratio.max(0.1);
        let mut controller = Self {
            mode: PerformanceMode::Normal,
            reason: None,
            device_pixel_ratio: dpr,
            pixel_ratio: dpr,
            low_fps_threshold: opts.low_fps_threshold,
            degraded_max_pixel_ratio: opts.degraded_max_pixel_ratio,
        };

        let weak_textures = !device.has_compressed_textures();
        if device.is_mobile() || weak_textures {
            controller.pixel_ratio = dpr.min(opts.reduced_max_pixel_ratio);
        }

        let initial = if !device.webgl {
            Some(DegradeReason::NoWebGl)
        } else if device.is_mobile() {
            Some(DegradeReason::MobileDevice)
        } else if weak_textures && opts.degrade_without_compressed_textures {
            Some(DegradeReason::MissingTextureCompression)
        } else {
            None
        };
        if let Some(reason) = initial {
            controller.mode = PerformanceMode::Degraded;
            controller.reason = Some(reason);
            log::info!("starting in degraded mode: {reason}");
        }
        controller
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> PerformanceMode {
        self.mode
    }

    /// Whether the session is degraded.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.mode == PerformanceMode::Degraded
    }

    /// What triggered degradation, if anything did.
    #[must_use]
    pub fn reason(&self) -> Option<DegradeReason> {
        self.reason
    }

    /// Pixel ratio the renderer should use.
    #[must_use]
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    /// Detail level for builders and renderer settings.
    #[must_use]
    pub fn detail(&self) -> Detail {
        Detail::for_mode(self.mode)
    }

    /// Feed a once-per-second FPS sample. Returns `true` when this sample
    /// caused the transition to degraded mode.
    pub fn observe_fps(&mut self, fps: u32) -> bool {
        if fps >= self.low_fps_threshold || self.is_degraded() {
            return false;
        }
        let _ = self.degrade(DegradeReason::LowFps(fps));
        self.pixel_ratio = self
            .device_pixel_ratio
            .min(self.degraded_max_pixel_ratio);
        true
    }

    /// Switch to degraded mode. No-op (returns `false`) when already
    /// degraded.
    pub fn degrade(&mut self, reason: DegradeReason) -> bool {
        if self.is_degraded() {
            return false;
        }
        log::warn!("switching to low-performance mode: {reason}");
        self.mode = PerformanceMode::Degraded;
        self.reason = Some(reason);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(device: &DeviceProfile) -> QualityController {
        QualityController::from_device(device, &QualityOptions::default())
    }

    #[test]
    fn desktop_starts_normal_at_full_ratio() {
        let q = controller(&DeviceProfile::desktop(2.0));
        assert_eq!(q.mode(), PerformanceMode::Normal);
        assert_eq!(q.pixel_ratio(), 2.0);
        assert!(q.detail().labels);
    }

    #[test]
    fn mobile_user_agent_degrades_and_caps_ratio() {
        let device = DeviceProfile {
            user_agent: "Mozilla/5.0 (IPHONE; CPU OS 17_0)".to_owned(),
            ..DeviceProfile::desktop(3.0)
        };
        let q = controller(&device);
        assert!(q.is_degraded());
        assert_eq!(q.reason(), Some(DegradeReason::MobileDevice));
        assert_eq!(q.pixel_ratio(), 1.5);
    }

    #[test]
    fn missing_extensions_follow_the_option() {
        let device = DeviceProfile {
            extensions: vec!["OES_texture_float".to_owned()],
            ..DeviceProfile::desktop(2.0)
        };
        assert!(controller(&device).is_degraded());

        let opts = QualityOptions {
            degrade_without_compressed_textures: false,
            ..QualityOptions::default()
        };
        let q = QualityController::from_device(&device, &opts);
        assert!(!q.is_degraded());
        assert_eq!(q.pixel_ratio(), 1.5);
    }

    #[test]
    fn low_fps_degrades_once_and_never_reverts() {
        let mut q = controller(&DeviceProfile::desktop(2.0));
        assert!(!q.observe_fps(20));
        assert!(q.observe_fps(12));
        assert_eq!(q.pixel_ratio(), 1.0);
        assert_eq!(q.reason(), Some(DegradeReason::LowFps(12)));

        assert!(!q.observe_fps(60));
        assert!(!q.observe_fps(5));
        assert!(q.is_degraded());
        assert!(!q.detail().halos);
    }

    #[test]
    fn degraded_ratio_keeps_low_density_screens() {
        let mut q = controller(&DeviceProfile::desktop(0.75));
        assert!(q.observe_fps(10));
        assert_eq!(q.pixel_ratio(), 0.75);
    }
}
