//! Orbital body parameters
//!
//! A body's placement is a pure function of elapsed time:
//! `orbit(rate * t) ∘ translate(offset) ∘ spin(rate * t) ∘ scale`.
//! Rotations are about the parent's up axis (+Y).

use glam::{Mat4, Vec3};

use crate::TextureId;

/// Surface appearance of a body
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Appearance {
    /// Flat color
    Solid(Vec3),
    /// Texture registered with the renderer
    Textured(TextureId),
}

/// A body in the orbital hierarchy
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitalBody {
    /// Display name (for logging)
    pub name: String,
    /// Uniform scale applied to the body's own mesh only
    pub scale: f32,
    /// Orbital angular rate around the parent, degrees per second
    pub orbit_rate: f32,
    /// Self-rotation rate, degrees per second
    pub spin_rate: f32,
    /// Translation from the parent's frame
    pub offset: Vec3,
    /// How the body is shaded
    pub appearance: Appearance,
}

impl OrbitalBody {
    /// Create a static white body at the parent's origin
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: 1.0,
            orbit_rate: 0.0,
            spin_rate: 0.0,
            offset: Vec3::ZERO,
            appearance: Appearance::Solid(Vec3::ONE),
        }
    }

    /// Builder: set the uniform scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Builder: set the orbital rate (degrees per second)
    pub fn with_orbit_rate(mut self, degrees_per_second: f32) -> Self {
        self.orbit_rate = degrees_per_second;
        self
    }

    /// Builder: set the spin rate (degrees per second)
    pub fn with_spin_rate(mut self, degrees_per_second: f32) -> Self {
        self.spin_rate = degrees_per_second;
        self
    }

    /// Builder: set the offset from the parent
    pub fn with_offset(mut self, offset: Vec3) -> Self {
        self.offset = offset;
        self
    }

    /// Builder: set the appearance
    pub fn with_appearance(mut self, appearance: Appearance) -> Self {
        self.appearance = appearance;
        self
    }

    /// Orbit angle at `t`, radians
    #[inline]
    pub fn orbit_angle(&self, t: f32) -> f32 {
        (self.orbit_rate * t).to_radians()
    }

    /// Spin angle at `t`, radians
    #[inline]
    pub fn spin_angle(&self, t: f32) -> f32 {
        (self.spin_rate * t).to_radians()
    }

    /// Local frame at `t`: orbit, then offset, then spin
    ///
    /// Children are placed relative to this frame. Scale is not part of it.
    pub fn local_frame(&self, t: f32) -> Mat4 {
        Mat4::from_rotation_y(self.orbit_angle(t))
            * Mat4::from_translation(self.offset)
            * Mat4::from_rotation_y(self.spin_angle(t))
    }

    /// Scale matrix for the body's mesh
    #[inline]
    pub fn scale_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.scale))
    }

    /// Texture used by this body, if any
    pub fn texture(&self) -> Option<TextureId> {
        match self.appearance {
            Appearance::Textured(id) => Some(id),
            Appearance::Solid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_rest_frame_is_offset_only() {
        let body = OrbitalBody::new("earth")
            .with_orbit_rate(30.0)
            .with_spin_rate(100.0)
            .with_offset(Vec3::new(2.3, 0.0, 0.0));
        let frame = body.local_frame(0.0);
        assert!(frame.abs_diff_eq(Mat4::from_translation(Vec3::new(2.3, 0.0, 0.0)), EPSILON));
    }

    #[test]
    fn test_orbit_angle_is_time_linear() {
        let body = OrbitalBody::new("earth").with_orbit_rate(30.0);
        assert!((body.orbit_angle(3.0) - 90f32.to_radians()).abs() < EPSILON);
        assert!((body.orbit_angle(6.0) - 2.0 * body.orbit_angle(3.0)).abs() < EPSILON);
    }

    #[test]
    fn test_quarter_orbit_moves_offset_onto_negative_z() {
        // 90 degrees about +Y takes +X to -Z
        let body = OrbitalBody::new("earth")
            .with_orbit_rate(90.0)
            .with_offset(Vec3::new(2.0, 0.0, 0.0));
        let origin = body.local_frame(1.0).transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(0.0, 0.0, -2.0), EPSILON), "got {:?}", origin);
    }

    #[test]
    fn test_spin_does_not_move_origin() {
        let body = OrbitalBody::new("earth")
            .with_spin_rate(100.0)
            .with_offset(Vec3::new(2.0, 0.0, 0.0));
        let a = body.local_frame(0.0).transform_point3(Vec3::ZERO);
        let b = body.local_frame(1.7).transform_point3(Vec3::ZERO);
        assert!(a.abs_diff_eq(b, EPSILON));
    }

    #[test]
    fn test_texture_accessor() {
        let textured = OrbitalBody::new("moon").with_appearance(Appearance::Textured(TextureId(1)));
        assert_eq!(textured.texture(), Some(TextureId(1)));
        assert_eq!(OrbitalBody::new("sun").texture(), None);
    }
}
