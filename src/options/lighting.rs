use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::color::Color;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Scene lights and tone mapping handed to the rendering backend.
pub struct LightingOptions {
    /// Ambient light color.
    #[schemars(skip)]
    pub ambient_color: Color,
    /// Ambient light intensity.
    #[schemars(title = "Ambient", range(min = 0.0, max = 1.5), extend("step" = 0.05))]
    pub ambient_intensity: f32,
    /// Key light color.
    #[schemars(skip)]
    pub key_color: Color,
    /// Key light intensity.
    #[schemars(title = "Key Light", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub key_intensity: f32,
    /// Key light direction (points from origin toward the light).
    #[schemars(skip)]
    pub key_dir: [f32; 3],
    /// Fill light color.
    #[schemars(skip)]
    pub fill_color: Color,
    /// Fill light intensity.
    #[schemars(title = "Fill Light", range(min = 0.0, max = 2.0), extend("step" = 0.05))]
    pub fill_intensity: f32,
    /// Fill light direction.
    #[schemars(skip)]
    pub fill_dir: [f32; 3],
    /// Tone-mapping exposure.
    #[schemars(title = "Exposure", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub exposure: f32,
    /// Clear color behind the scene.
    #[schemars(skip)]
    pub background: Color,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            ambient_color: Color(0x0040_4040),
            ambient_intensity: 0.7,
            key_color: Color::WHITE,
            key_intensity: 0.8,
            key_dir: [1.0, 1.0, 1.0],
            fill_color: Color(0x0000_88ff),
            fill_intensity: 0.3,
            fill_dir: [-1.0, -1.0, -1.0],
            exposure: 1.2,
            background: Color(0x0011_1111),
        }
    }
}
