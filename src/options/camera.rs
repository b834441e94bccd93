use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and orbit-control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fov_deg: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub near: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub far: f32,
    /// Camera distance from the orbit target at startup.
    #[schemars(skip)]
    pub initial_distance: f32,
    /// Closest allowed orbit distance (zoom slider at 100).
    #[schemars(title = "Min Distance", range(min = 1.0, max = 20.0), extend("step" = 0.5))]
    pub min_distance: f32,
    /// Farthest allowed orbit distance (zoom slider at 0).
    #[schemars(title = "Max Distance", range(min = 10.0, max = 100.0), extend("step" = 1.0))]
    pub max_distance: f32,
    /// Fraction of the orbit velocity applied (and removed) per frame.
    #[schemars(title = "Damping", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub damping: f32,
    /// Orbit speed: a drag across the full viewport height turns the camera
    /// `rotate_speed` full circles.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Distance multiplier per wheel step.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fov_deg: 60.0,
            near: 0.1,
            far: 1000.0,
            initial_distance: 15.0,
            min_distance: 5.0,
            max_distance: 30.0,
            damping: 0.1,
            rotate_speed: 0.5,
            zoom_speed: 0.05,
        }
    }
}
