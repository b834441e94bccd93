//! Centralized visualization options with TOML preset support.
//!
//! Every constant the builders, quality controller and render loop use
//! (palette, size divisors, thresholds, separation distance, request delay)
//! lives here. Options serialize to/from TOML; partial files fill the rest
//! from defaults.

mod animation;
mod camera;
mod colors;
mod geometry;
mod lighting;
mod network;
mod quality;

use std::path::Path;

pub use animation::AnimationOptions;
pub use camera::CameraOptions;
pub use colors::ColorOptions;
pub use geometry::GeometryOptions;
pub use lighting::LightingOptions;
pub use network::{NetworkOptions, PoolOptions};
pub use quality::{QualityOptions, Segments};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::VizError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[quality]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Camera projection and orbit-control parameters.
    pub camera: CameraOptions,
    /// Lights, exposure and background.
    pub lighting: LightingOptions,
    /// Color palette.
    #[schemars(skip)]
    pub colors: ColorOptions,
    /// Builder sizes, scales and layout.
    pub geometry: GeometryOptions,
    /// Adaptive quality thresholds and detail levels.
    pub quality: QualityOptions,
    /// Per-frame animation parameters.
    pub animation: AnimationOptions,
    /// API request throttling.
    #[schemars(skip)]
    pub network: NetworkOptions,
    /// Resource pool sizing.
    #[schemars(skip)]
    pub pool: PoolOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`VizError::OptionsParse`] for invalid TOML or mistyped values.
    pub fn from_toml(content: &str) -> Result<Self, VizError> {
        toml::from_str(content)
            .map_err(|e| VizError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`VizError::Io`] if the file cannot be read, otherwise as
    /// [`from_toml`](Self::from_toml).
    pub fn load(path: &Path) -> Result<Self, VizError> {
        let content = std::fs::read_to_string(path).map_err(VizError::Io)?;
        Self::from_toml(&content)
    }

    /// Save options to a TOML file (pretty-printed), creating parent
    /// directories.
    ///
    /// # Errors
    ///
    /// [`VizError::OptionsParse`] if serialization fails, [`VizError::Io`]
    /// if writing does.
    pub fn save(&self, path: &Path) -> Result<(), VizError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VizError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(VizError::Io)?;
        }
        std::fs::write(path, content).map_err(VizError::Io)
    }

    /// Preset names (stems of the `.toml` files) in `dir`, sorted. A
    /// missing directory has no presets.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_owned))
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::color::Color;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[geometry]
group_separation = 12.0

[quality]
low_fps_threshold = 25
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.geometry.group_separation, 12.0);
        assert_eq!(opts.quality.low_fps_threshold, 25);
        // Everything else should be default
        assert_eq!(opts.geometry.min_bond_length, 0.1);
        assert_eq!(opts.network.delay_ms, 300);
        assert_eq!(opts.camera.max_distance, 30.0);
    }

    #[test]
    fn element_palette_lookup() {
        let colors = ColorOptions::default();
        assert_eq!(colors.element("O"), Some(Color(0x00ff_0000)));
        assert_eq!(colors.element("Cl"), Some(Color(0x0000_ff00)));
        assert_eq!(colors.element("Xe"), None);
        assert_eq!(colors.default_element, Color(0x00dd_dddd));
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[quality]\nlow_fps_threshold = \"x\"")
            .unwrap_err();
        assert!(matches!(err, VizError::OptionsParse(_)));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("quality"));
        assert!(props.contains_key("animation"));
        assert!(props.contains_key("geometry"));

        assert!(!props.contains_key("colors"));
        assert!(!props.contains_key("network"));
        assert!(!props.contains_key("pool"));

        let geometry = &props["geometry"]["properties"];
        assert!(geometry.get("group_separation").is_some());
        assert!(geometry.get("sphere_divisor").is_none());
    }

    #[test]
    fn saved_options_are_listed_as_presets() {
        let dir = std::env::temp_dir()
            .join(format!("nanoviz-presets-{}", std::process::id()));
        let opts = Options {
            geometry: GeometryOptions {
                group_separation: 6.0,
                ..GeometryOptions::default()
            },
            ..Options::default()
        };
        opts.save(&dir.join("compact.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "not a preset").unwrap();

        assert_eq!(Options::list_presets(&dir), ["compact"]);
        assert_eq!(Options::load(&dir.join("compact.toml")).unwrap(), opts);
        assert!(Options::list_presets(&dir.join("missing")).is_empty());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
