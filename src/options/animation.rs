use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
/// Per-frame animation parameters.
pub struct AnimationOptions {
    /// Initial Y rotation per frame (radians) for molecule and nanoparticle.
    #[schemars(title = "Rotation Speed", range(min = 0.0, max = 0.01), extend("step" = 0.0005))]
    pub rotation_speed: f32,
    /// Rotation per frame when the rotation slider is at 100.
    #[schemars(skip)]
    pub max_rotation_speed: f32,
    /// Halo scale amplitude around 1.0.
    #[schemars(title = "Pulse Amplitude", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub pulse_amplitude: f32,
    /// Halo angular rate in radians per millisecond.
    #[schemars(skip)]
    pub pulse_rate: f32,
    /// Duration of the eased zoom transition in milliseconds.
    #[schemars(title = "Zoom Transition (ms)", range(min = 0.0, max = 2000.0), extend("step" = 50.0))]
    pub zoom_transition_ms: f32,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            rotation_speed: 0.003,
            max_rotation_speed: 0.01,
            pulse_amplitude: 0.3,
            pulse_rate: 0.003,
            zoom_transition_ms: 300.0,
        }
    }
}
