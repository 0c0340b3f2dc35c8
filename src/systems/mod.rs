//! Application systems
//!
//! Simulation (frame orchestration), window, and render systems.

mod render;
mod simulation;
mod window;

pub use render::{RenderError, RenderSystem};
pub use simulation::{FrameInput, FrameOutput, SimulationSystem};
pub use window::{WindowError, WindowSystem};
