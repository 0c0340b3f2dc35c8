//! Scene construction utilities

mod scene_builder;

pub use scene_builder::{Scene, SceneBuilder};
