use glam::{Mat4, Vec3};
use serde::Serialize;

/// Right-handed perspective camera looking from `eye` at `target`.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Eye position in world space.
    pub eye: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Viewport width over height.
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl PerspectiveCamera {
    /// World to view transform.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// View to clip transform.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_deg.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    /// World to clip transform.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Unit view direction, or zero when eye and target coincide.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or_zero()
    }
}

/// Camera state as backends consume it.
///
/// `repr(C)` and `Pod`, so GPU backends can upload it with
/// `bytemuck::bytes_of`; the web backend receives it serialized inside
/// each frame.
#[repr(C)]
#[derive(
    Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize,
)]
pub struct CameraUniform {
    /// Column-major world to clip matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Eye position.
    pub eye: [f32; 3],
    /// Viewport aspect ratio.
    pub aspect: f32,
    /// Unit view direction.
    pub forward: [f32; 3],
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            eye: [0.0; 3],
            aspect: 1.0,
            forward: Vec3::NEG_Z.to_array(),
            fov_deg: 60.0,
        }
    }
}

impl From<&PerspectiveCamera> for CameraUniform {
    fn from(camera: &PerspectiveCamera) -> Self {
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            eye: camera.eye.to_array(),
            aspect: camera.aspect,
            forward: camera.forward().to_array(),
            fov_deg: camera.fov_deg,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera {
            eye: Vec3::new(0.0, 0.0, 15.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.5,
            fov_deg: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    #[test]
    fn uniform_has_no_padding() {
        assert_eq!(size_of::<CameraUniform>(), 96);
        let uniform = CameraUniform::default();
        assert_eq!(bytemuck::bytes_of(&uniform).len(), 96);
    }

    #[test]
    fn target_lands_in_the_middle_of_the_viewport() {
        let camera = camera();
        let ndc = camera.view_projection().project_point3(Vec3::ZERO);
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);

        let uniform = CameraUniform::from(&camera);
        assert_eq!(uniform.forward, [0.0, 0.0, -1.0]);
        assert_eq!(uniform.eye, [0.0, 0.0, 15.0]);
    }

    #[test]
    fn points_beyond_far_are_clipped() {
        let camera = camera();
        let ndc = camera
            .view_projection()
            .project_point3(Vec3::new(0.0, 0.0, -2000.0));
        assert!(ndc.z > 1.0);
    }
}
