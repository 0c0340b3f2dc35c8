//! Free-look camera controller
//!
//! Controls:
//! - Mouse: yaw/pitch, each clamped to a closed range
//! - W/S: Forward/backward along the look direction
//! - A/D: Strafe left/right
//! - E/Q: Up/down along the camera's up vector
//!
//! Angles are in degrees. Yaw 90 looks down -Z.

use bitflags::bitflags;
use glam::{DVec2, Vec3};
use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::pointer::{PointerResync, PointerTracker};

/// Squared length below which a cross product is treated as degenerate
const DEGENERATE_EPSILON: f32 = 1e-10;

bitflags! {
    /// Held movement keys
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct MoveIntents: u8 {
        const FORWARD = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const UP = 1 << 4;
        const DOWN = 1 << 5;
    }
}

/// Look direction for the given yaw and pitch (degrees)
pub fn forward_from_angles(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        pitch.cos() * yaw.cos(),
        pitch.sin(),
        -pitch.cos() * yaw.sin(),
    )
}

/// Orthonormal camera basis
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Default for Basis {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Basis {
    /// Looking down -Z with +Y up
    pub const DEFAULT: Self = Self {
        forward: Vec3::NEG_Z,
        right: Vec3::X,
        up: Vec3::Y,
    };

    /// Build a basis from a look direction
    ///
    /// `right = normalize(forward × world_up)`, `up = normalize(right × forward)`.
    /// Returns `None` when `forward` is zero or parallel to `world_up`.
    pub fn try_new(forward: Vec3, world_up: Vec3) -> Option<Self> {
        let forward = forward.try_normalize()?;
        let right = forward.cross(world_up);
        if right.length_squared() < DEGENERATE_EPSILON {
            return None;
        }
        let right = right.normalize();
        let up = right.cross(forward).try_normalize()?;
        Some(Self { forward, right, up })
    }

    /// Build a basis from yaw and pitch (degrees)
    pub fn from_angles(yaw: f32, pitch: f32, world_up: Vec3) -> Option<Self> {
        Self::try_new(forward_from_angles(yaw, pitch), world_up)
    }
}

/// Closed angle interval, degrees
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AngleRange {
    pub min: f32,
    pub max: f32,
}

impl AngleRange {
    /// Create a range from two bounds (in any order)
    pub fn new(a: f32, b: f32) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Check if a value is inside the range (bounds inclusive)
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value, reporting whether it was out of range
    ///
    /// A value exactly on a bound is in range and is not reported.
    /// A non-finite value snaps to `min` and is reported.
    pub fn clamp(&self, value: f32) -> (f32, bool) {
        if !value.is_finite() {
            (self.min, true)
        } else if value < self.min {
            (self.min, true)
        } else if value > self.max {
            (self.max, true)
        } else {
            (value, false)
        }
    }
}

/// Yaw and pitch limits
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookLimits {
    pub yaw: AngleRange,
    pub pitch: AngleRange,
}

impl Default for LookLimits {
    fn default() -> Self {
        Self {
            yaw: AngleRange::new(60.0, 120.0),
            pitch: AngleRange::new(-25.0, 25.0),
        }
    }
}

/// Which angles hit a limit during a look update
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LookOutcome {
    pub yaw_clamped: bool,
    pub pitch_clamped: bool,
}

impl LookOutcome {
    /// Check if either angle was clamped
    #[inline]
    pub fn clamped(&self) -> bool {
        self.yaw_clamped || self.pitch_clamped
    }
}

/// Camera controller for handling input
pub struct CameraController {
    intents: MoveIntents,

    // Configuration
    pub move_speed: f32,
    /// Degrees per pointer unit per second
    pub angular_speed: f32,
    pub limits: LookLimits,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            intents: MoveIntents::empty(),
            move_speed: 1.5,
            angular_speed: 6.0,
            limits: LookLimits::default(),
        }
    }

    /// Process keyboard input
    ///
    /// Returns true if the key is a movement key.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let intent = match key {
            KeyCode::KeyW => MoveIntents::FORWARD,
            KeyCode::KeyS => MoveIntents::BACKWARD,
            KeyCode::KeyA => MoveIntents::LEFT,
            KeyCode::KeyD => MoveIntents::RIGHT,
            KeyCode::KeyE => MoveIntents::UP,
            KeyCode::KeyQ => MoveIntents::DOWN,
            _ => return false,
        };
        self.intents.set(intent, state == ElementState::Pressed);
        true
    }

    /// Currently held movement keys
    pub fn intents(&self) -> MoveIntents {
        self.intents
    }

    /// Replace the held movement keys
    pub fn set_intents(&mut self, intents: MoveIntents) {
        self.intents = intents;
    }

    /// Release all movement keys (e.g. on focus loss)
    pub fn clear_intents(&mut self) {
        self.intents = MoveIntents::empty();
    }

    /// Check if any movement keys are held
    pub fn is_moving(&self) -> bool {
        !self.intents.is_empty()
    }

    /// Run one frame of camera control
    ///
    /// Samples the pointer, applies look and movement, and returns a re-sync
    /// request when an angle was clamped so further motion past the limit
    /// does not accumulate.
    pub fn update<C: CameraControl>(
        &self,
        camera: &mut C,
        pointer: &mut PointerTracker,
        raw_pointer: DVec2,
        dt: f32,
    ) -> Option<PointerResync> {
        let delta = pointer.sample(raw_pointer);
        let outcome = self.apply_look(camera, delta, dt);
        let resync = outcome.clamped().then(|| pointer.resync(raw_pointer));
        self.apply_movement(camera, dt);
        resync
    }

    /// Apply a pointer delta to yaw and pitch, then clamp
    ///
    /// A zero (or non-finite) delta leaves the camera untouched.
    pub fn apply_look<C: CameraControl>(&self, camera: &mut C, delta: DVec2, dt: f32) -> LookOutcome {
        if delta == DVec2::ZERO || !delta.is_finite() {
            return LookOutcome::default();
        }

        let scale = f64::from(dt) * f64::from(self.angular_speed);
        let (yaw, pitch) = camera.angles();
        // Moving the pointer right turns left (yaw decreases), down looks down
        let yaw = (f64::from(yaw) - delta.x * scale) as f32;
        let pitch = (f64::from(pitch) - delta.y * scale) as f32;
        self.set_clamped(camera, yaw, pitch)
    }

    /// Clamp the camera's current angles into the limits
    pub fn enforce_limits<C: CameraControl>(&self, camera: &mut C) -> LookOutcome {
        let (yaw, pitch) = camera.angles();
        self.set_clamped(camera, yaw, pitch)
    }

    fn set_clamped<C: CameraControl>(&self, camera: &mut C, yaw: f32, pitch: f32) -> LookOutcome {
        let (yaw, yaw_clamped) = self.limits.yaw.clamp(yaw);
        let (pitch, pitch_clamped) = self.limits.pitch.clamp(pitch);
        camera.set_angles(yaw, pitch);
        LookOutcome {
            yaw_clamped,
            pitch_clamped,
        }
    }

    /// Move the eye along the camera basis for the held keys
    pub fn apply_movement<C: CameraControl>(&self, camera: &mut C, dt: f32) {
        if self.intents.is_empty() || dt <= 0.0 {
            return;
        }

        let basis = camera.basis();
        let mut direction = Vec3::ZERO;
        if self.intents.contains(MoveIntents::FORWARD) {
            direction += basis.forward;
        }
        if self.intents.contains(MoveIntents::BACKWARD) {
            direction -= basis.forward;
        }
        if self.intents.contains(MoveIntents::RIGHT) {
            direction += basis.right;
        }
        if self.intents.contains(MoveIntents::LEFT) {
            direction -= basis.right;
        }
        if self.intents.contains(MoveIntents::UP) {
            direction += basis.up;
        }
        if self.intents.contains(MoveIntents::DOWN) {
            direction -= basis.up;
        }

        camera.translate(direction * self.move_speed * dt);
    }

    /// Builder: set movement speed
    pub fn with_move_speed(mut self, speed: f32) -> Self {
        self.move_speed = speed;
        self
    }

    /// Builder: set angular speed
    pub fn with_angular_speed(mut self, speed: f32) -> Self {
        self.angular_speed = speed;
        self
    }

    /// Builder: set look limits
    pub fn with_limits(mut self, limits: LookLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// Trait for camera control
/// Allows the controller to work with different camera implementations
pub trait CameraControl {
    /// Current (yaw, pitch) in degrees
    fn angles(&self) -> (f32, f32);
    fn set_angles(&mut self, yaw: f32, pitch: f32);
    fn basis(&self) -> Basis;
    fn translate(&mut self, offset: Vec3);
}
