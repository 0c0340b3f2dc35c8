//! Core types for the orrery
//!
//! This crate holds the frame-synchronous state of the scene:
//!
//! - [`FrameClock`] - Monotonic elapsed time and per-frame delta
//! - [`OrbitalBody`] - Scale, orbit, spin and offset of a body
//! - [`BodyHierarchy`] - Tree of bodies, evaluated into world transforms from time
//! - [`StreakParticle`] - A shooting star with a bounded trail
//! - [`ParticleManager`] - Spawns, advances and culls streak particles
//! - [`DrawCommand`] - One draw submission handed to the graphics backend

mod clock;
mod body;
mod hierarchy;
mod streak;
mod particles;
mod draw;

pub use clock::{FrameClock, FrameTime, DEFAULT_MAX_DELTA};
pub use body::{Appearance, OrbitalBody};
pub use hierarchy::{BodyHierarchy, BodyKey, BodyTransform, HierarchyError};
pub use streak::{StreakParticle, TrailSample, TrailSamples, TRAIL_CAPACITY};
pub use particles::{AdvanceReport, ParticleManager, SpawnRegion, StreakConfig, DEFAULT_HEAD_GLOW};
pub use draw::{DrawCommand, MeshHandle, Primitive, Shading, TextureId};

// Re-export the math types used throughout the public API
pub use glam::{Mat4, Vec3};
