//! Input mapping from raw events to semantic actions
//!
//! Maps keyboard and mouse input to actions like Quit or ResetCamera.
//! Movement keys (WASD, E/Q) are NOT mapped here - they go directly to CameraController.

use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Actions triggered by special input (not movement)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// Close the application after the current frame (Escape)
    Quit,
    /// Release the grabbed cursor (Tab)
    ReleaseCursor,
    /// Grab the cursor again (left click while released)
    CaptureCursor,
    /// Reset camera to its starting pose (R key)
    ResetCamera,
    /// Toggle fullscreen mode (F key)
    ToggleFullscreen,
}

/// Maps raw input events to semantic actions
///
/// Movement keys are NOT mapped here - they go directly to the
/// CameraController. This mapper handles "special" keys only.
pub struct InputMapper;

impl InputMapper {
    /// Map keyboard input to an action
    ///
    /// Returns `Some(action)` for special keys, `None` for movement keys
    pub fn map_keyboard(
        key: KeyCode,
        state: ElementState,
        cursor_captured: bool,
    ) -> Option<InputAction> {
        // Only handle key presses, not releases
        if state != ElementState::Pressed {
            return None;
        }

        match key {
            KeyCode::Escape => Some(InputAction::Quit),
            KeyCode::Tab if cursor_captured => Some(InputAction::ReleaseCursor),
            KeyCode::KeyR => Some(InputAction::ResetCamera),
            KeyCode::KeyF => Some(InputAction::ToggleFullscreen),
            _ => None,
        }
    }

    /// Map mouse button to an action
    ///
    /// Returns `Some(CaptureCursor)` for left click when cursor not captured
    pub fn map_mouse_button(
        button: MouseButton,
        state: ElementState,
        cursor_captured: bool,
    ) -> Option<InputAction> {
        if button == MouseButton::Left && state == ElementState::Pressed && !cursor_captured {
            Some(InputAction::CaptureCursor)
        } else {
            None
        }
    }
}
