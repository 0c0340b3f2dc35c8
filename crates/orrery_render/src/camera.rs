//! Free-look camera
//!
//! Holds the eye, a fixed world up axis, yaw/pitch in degrees, and the
//! derived orthonormal basis. The basis is rebuilt whenever the angles change;
//! when the new look direction is degenerate the previous basis is kept so the
//! view never contains NaN.

use glam::{Mat4, Vec3};
use orrery_input::{Basis, CameraControl};

/// Camera for viewing the scene
#[derive(Clone, Debug)]
pub struct Camera {
    /// Eye position
    pub eye: Vec3,
    /// Vertical field of view, degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,

    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    basis: Basis,

    // Start state for reset
    start_eye: Vec3,
    start_yaw: f32,
    start_pitch: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 6.0), 90.0, 0.0)
    }
}

impl Camera {
    /// Create a camera at `eye` looking along yaw/pitch (degrees), +Y up
    pub fn new(eye: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            eye,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            world_up: Vec3::Y,
            yaw,
            pitch,
            basis: Basis::DEFAULT,
            start_eye: eye,
            start_yaw: yaw,
            start_pitch: pitch,
        };
        camera.rebuild_basis();
        camera
    }

    /// Builder: set the vertical field of view (degrees)
    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    /// Builder: set near/far clip planes
    pub fn with_clip(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn forward(&self) -> Vec3 {
        self.basis.forward
    }

    pub fn right(&self) -> Vec3 {
        self.basis.right
    }

    pub fn up(&self) -> Vec3 {
        self.basis.up
    }

    /// View matrix: look from the eye along the forward vector
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.eye + self.basis.forward, self.basis.up)
    }

    /// Perspective projection for the given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
        Mat4::perspective_rh(self.fov.to_radians(), aspect, self.near, self.far)
    }

    /// Projection * view
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Return to the start eye and angles
    pub fn reset(&mut self) {
        self.eye = self.start_eye;
        self.yaw = self.start_yaw;
        self.pitch = self.start_pitch;
        self.rebuild_basis();
    }

    /// Rebuild forward/right/up from the current angles
    ///
    /// Returns false (keeping the previous basis) when the look direction is
    /// parallel to the world up axis.
    fn rebuild_basis(&mut self) -> bool {
        match Basis::from_angles(self.yaw, self.pitch, self.world_up) {
            Some(basis) => {
                self.basis = basis;
                true
            }
            None => {
                log::debug!(
                    "Degenerate camera basis at yaw {} pitch {}, keeping previous",
                    self.yaw,
                    self.pitch
                );
                false
            }
        }
    }
}

impl CameraControl for Camera {
    fn angles(&self) -> (f32, f32) {
        (self.yaw, self.pitch)
    }

    fn set_angles(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
        self.rebuild_basis();
    }

    fn basis(&self) -> Basis {
        self.basis
    }

    fn translate(&mut self, offset: Vec3) {
        if offset.is_finite() {
            self.eye += offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_camera_default_state() {
        let cam = Camera::default();
        assert_eq!(cam.eye, Vec3::new(0.0, 0.0, 6.0));
        assert_eq!(cam.yaw(), 90.0);
        assert_eq!(cam.pitch(), 0.0);
        assert_eq!(cam.fov, 45.0);
        assert!(cam.forward().abs_diff_eq(Vec3::NEG_Z, EPSILON));
        assert!(cam.right().abs_diff_eq(Vec3::X, EPSILON));
        assert!(cam.up().abs_diff_eq(Vec3::Y, EPSILON));
    }

    #[test]
    fn test_view_matrix_maps_eye_to_origin() {
        let cam = Camera::default();
        let view = cam.view_matrix();
        let origin = view.transform_point3(cam.eye);
        assert!(origin.abs_diff_eq(Vec3::ZERO, EPSILON));
        // A point straight ahead lands on -Z in view space
        let ahead = view.transform_point3(cam.eye + cam.forward() * 2.0);
        assert!(ahead.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), EPSILON));
    }

    #[test]
    fn test_degenerate_pitch_keeps_previous_basis() {
        let mut cam = Camera::default();
        cam.set_angles(80.0, 10.0);
        let before = cam.basis();

        cam.set_angles(80.0, 90.0);
        assert_eq!(cam.basis(), before);
        assert!(cam.view_matrix().is_finite());
        assert!(cam.view_projection(16.0 / 9.0).is_finite());
    }

    #[test]
    fn test_translate_ignores_non_finite() {
        let mut cam = Camera::default();
        cam.translate(Vec3::new(f32::NAN, 0.0, 0.0));
        assert_eq!(cam.eye, Vec3::new(0.0, 0.0, 6.0));
        cam.translate(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cam.eye, Vec3::new(1.0, 2.0, 9.0));
    }

    #[test]
    fn test_projection_handles_zero_aspect() {
        let cam = Camera::default();
        assert!(cam.projection_matrix(0.0).is_finite());
        assert_eq!(cam.projection_matrix(0.0), cam.projection_matrix(1.0));
    }

    #[test]
    fn test_reset_restores_start() {
        let mut cam = Camera::new(Vec3::new(1.0, 2.0, 3.0), 100.0, 5.0);
        cam.translate(Vec3::X * 4.0);
        cam.set_angles(70.0, -20.0);
        cam.reset();
        assert_eq!(cam.eye, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(cam.angles(), (100.0, 5.0));
        assert!(cam.forward().abs_diff_eq(orrery_input::forward_from_angles(100.0, 5.0), EPSILON));
    }
}
