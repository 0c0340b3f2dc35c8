//! Pointer sampling
//!
//! The controller works on pointer deltas between frames. The tracker keeps
//! the reference sample those deltas are measured against, and produces an
//! explicit [`PointerResync`] when the reference must be forced to a position
//! (the input source applies it; nothing here touches the OS cursor).

use glam::DVec2;

/// Request for the input source to set its pointer to `position`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerResync {
    pub position: DVec2,
}

/// Tracks the reference pointer sample
#[derive(Clone, Copy, Debug)]
pub struct PointerTracker {
    reference: DVec2,
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(DVec2::ZERO)
    }
}

impl PointerTracker {
    /// Start tracking from an initial pointer position
    pub fn new(initial: DVec2) -> Self {
        Self { reference: initial }
    }

    /// Take a raw sample, returning the delta since the previous sample
    pub fn sample(&mut self, current: DVec2) -> DVec2 {
        let delta = current - self.reference;
        self.reference = current;
        delta
    }

    /// Force the reference to `current` and ask the input source to match it
    pub fn resync(&mut self, current: DVec2) -> PointerResync {
        self.reference = current;
        PointerResync { position: current }
    }

    /// Current reference sample
    pub fn reference(&self) -> DVec2 {
        self.reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_returns_delta_and_moves_reference() {
        let mut tracker = PointerTracker::new(DVec2::new(400.0, 300.0));
        let delta = tracker.sample(DVec2::new(410.0, 295.0));
        assert_eq!(delta, DVec2::new(10.0, -5.0));
        assert_eq!(tracker.reference(), DVec2::new(410.0, 295.0));
    }

    #[test]
    fn test_unchanged_pointer_has_zero_delta() {
        let mut tracker = PointerTracker::new(DVec2::new(5.0, 5.0));
        assert_eq!(tracker.sample(DVec2::new(5.0, 5.0)), DVec2::ZERO);
    }

    #[test]
    fn test_resync_sets_reference() {
        let mut tracker = PointerTracker::default();
        let resync = tracker.resync(DVec2::new(12.0, -3.0));
        assert_eq!(resync.position, DVec2::new(12.0, -3.0));
        assert_eq!(tracker.sample(DVec2::new(12.0, -3.0)), DVec2::ZERO);
    }
}
