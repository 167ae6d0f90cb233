//! Camera for viewing the particle field.

use glam::{Mat4, Vec3};

/// Orbit camera looking at the field's center.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
}

impl Camera {
    pub const MIN_DISTANCE: f32 = 15.0;
    pub const MAX_DISTANCE: f32 = 200.0;

    /// Head-on view from 60 units away with a 75° field of view.
    pub fn new() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 60.0,
            target: Vec3::ZERO,
            fov_y: 75.0_f32.to_radians(),
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, aspect.max(1e-3), 0.1, 1000.0);
        proj * self.view_matrix()
    }

    /// Move closer (positive) or further away (negative), within limits.
    pub fn zoom(&mut self, amount: f32) {
        self.distance = (self.distance - amount).clamp(Self::MIN_DISTANCE, Self::MAX_DISTANCE);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_sits_on_positive_z() {
        let cam = Camera::new();
        assert!((cam.position() - Vec3::new(0.0, 0.0, 60.0)).length() < 1e-4);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let clip = Camera::new().view_proj(16.0 / 9.0) * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
        assert!((clip.w - 60.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = Camera::new();
        cam.zoom(1000.0);
        assert_eq!(cam.distance, Camera::MIN_DISTANCE);
        cam.zoom(-1000.0);
        assert_eq!(cam.distance, Camera::MAX_DISTANCE);
    }
}
