//! Window management system
//!
//! Handles window creation, cursor capture/release, pointer re-sync,
//! fullscreen toggle, and title updates.

use std::sync::Arc;
use glam::Vec3;
use orrery_input::PointerResync;
use winit::{
    dpi::PhysicalPosition,
    event_loop::ActiveEventLoop,
    window::{CursorGrabMode, Fullscreen, Window},
};
use crate::config::WindowConfig;

/// Manages the application window and cursor state
pub struct WindowSystem {
    window: Arc<Window>,
    cursor_captured: bool,
    base_title: String,
}

impl WindowSystem {
    /// Create window from config
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let mut attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.width,
                config.height,
            ));

        if config.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .map_err(|e| WindowError::CreationFailed(e.to_string()))?,
        );

        Ok(Self {
            window,
            cursor_captured: false,
            base_title: config.title.clone(),
        })
    }

    /// Get window reference (for RenderContext creation)
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Check if cursor is captured
    pub fn is_cursor_captured(&self) -> bool {
        self.cursor_captured
    }

    /// Grab and hide the cursor for free-look
    pub fn capture_cursor(&mut self) -> bool {
        let grab_result = self.window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));

        if grab_result.is_ok() {
            self.window.set_cursor_visible(false);
            self.cursor_captured = true;
            log::info!("Cursor captured - Tab to release, Escape to quit");
            true
        } else {
            log::warn!("Failed to capture cursor");
            false
        }
    }

    /// Release cursor
    pub fn release_cursor(&mut self) {
        let _ = self.window.set_cursor_grab(CursorGrabMode::None);
        self.window.set_cursor_visible(true);
        self.cursor_captured = false;
        log::info!("Cursor released - click to capture");
    }

    /// Move the OS cursor to match a pointer re-sync
    ///
    /// Locked cursors cannot be positioned on every platform; the virtual
    /// pointer is authoritative, so a refusal is only logged.
    pub fn apply_resync(&self, resync: PointerResync) {
        if self.cursor_captured {
            return;
        }
        let position = PhysicalPosition::new(resync.position.x, resync.position.y);
        if let Err(e) = self.window.set_cursor_position(position) {
            log::debug!("Cursor re-sync not applied: {}", e);
        }
    }

    /// Toggle fullscreen mode
    pub fn toggle_fullscreen(&self) {
        let new_fullscreen = if self.window.fullscreen().is_some() {
            None
        } else {
            Some(Fullscreen::Borderless(None))
        };
        self.window.set_fullscreen(new_fullscreen);
    }

    /// Update window title with camera info
    pub fn update_title(&self, eye: Vec3, yaw: f32, pitch: f32) {
        let title = format_title(&self.base_title, eye, yaw, pitch, self.cursor_captured);
        self.window.set_title(&title);
    }

    /// Request a redraw
    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn format_title(base: &str, eye: Vec3, yaw: f32, pitch: f32, captured: bool) -> String {
    let hint = if captured {
        "[Tab to release]"
    } else {
        "[Click to capture]"
    };
    format!(
        "{} - ({:.1}, {:.1}, {:.1}) yaw {:.0} pitch {:.0} {}",
        base, eye.x, eye.y, eye.z, yaw, pitch, hint
    )
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}
