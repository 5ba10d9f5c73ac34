use glam::{EulerRot, Mat4, Quat, Vec3};

/// Perspective camera with a position and an Euler (XYZ) rotation.
///
/// At zero rotation the camera looks down -Z with +Y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub rotation: Vec3,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 1.0, 0.1, 2000.0)
    }
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
        }
    }

    /// Recompute the aspect ratio from a viewport size.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn orientation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::NEG_Z
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation(), self.position)
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_looks_down_negative_z() {
        let cam = PerspectiveCamera::default();
        assert!((cam.forward() - Vec3::NEG_Z).length() < 1e-6);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn view_matrix_moves_world_opposite_to_camera() {
        let mut cam = PerspectiveCamera::new(75.0, 16.0 / 9.0, 0.1, 1000.0);
        cam.position = Vec3::new(-3.0, 0.0, 30.0);
        let p = cam.view_matrix().transform_point3(Vec3::new(-3.0, 0.0, 0.0));
        assert!((p - Vec3::new(0.0, 0.0, -30.0)).length() < 1e-4);
    }

    #[test]
    fn yaw_turns_forward_vector() {
        let mut cam = PerspectiveCamera::default();
        cam.rotation.y = std::f32::consts::FRAC_PI_2;
        // Positive yaw turns the view from -Z towards -X.
        assert!((cam.forward() - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn viewport_sets_aspect() {
        let mut cam = PerspectiveCamera::default();
        cam.set_viewport(1920, 1080);
        assert!((cam.aspect - 16.0 / 9.0).abs() < 1e-6);
        cam.set_viewport(100, 0);
        assert_eq!(cam.aspect, 100.0);
    }
}
