//! Virtual pointer fed by raw mouse motion
//!
//! With the cursor grabbed the OS position stops changing, so raw device
//! deltas are summed into a position the camera controller can sample.

use glam::DVec2;
use orrery_input::PointerResync;

/// Accumulated pointer position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct VirtualPointer {
    position: DVec2,
}

impl VirtualPointer {
    pub fn new(position: DVec2) -> Self {
        Self { position }
    }

    /// Add a raw motion delta (ignored while not finite)
    pub fn accumulate(&mut self, dx: f64, dy: f64) {
        let delta = DVec2::new(dx, dy);
        if delta.is_finite() {
            self.position += delta;
        }
    }

    /// Current position
    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Apply a re-sync request from the controller
    pub fn apply(&mut self, resync: PointerResync) {
        self.position = resync.position;
    }
}
