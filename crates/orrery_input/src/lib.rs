//! Camera input handling
//!
//! This crate turns raw pointer motion and held movement keys into a clamped
//! free-look camera orientation and eye movement.

mod camera_controller;
mod pointer;

pub use camera_controller::{
    forward_from_angles, AngleRange, Basis, CameraControl, CameraController, LookLimits,
    LookOutcome, MoveIntents,
};
pub use pointer::{PointerResync, PointerTracker};
