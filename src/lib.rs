//! Orrery
//!
//! An animated sun / planet / moon system with shooting stars, viewed through
//! a free-look camera with clamped yaw and pitch.

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
