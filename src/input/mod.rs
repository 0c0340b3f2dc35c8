//! Input handling module
//!
//! Provides input mapping from raw events to semantic actions, and the
//! virtual pointer the camera controller samples.

mod input_mapper;
mod virtual_pointer;

pub use input_mapper::{InputMapper, InputAction};
pub use virtual_pointer::VirtualPointer;
