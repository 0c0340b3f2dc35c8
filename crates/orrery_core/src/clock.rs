//! Frame clock
//!
//! Supplies the absolute elapsed time used by the transform composer and the
//! per-frame delta used by the camera and particles.

use std::time::Instant;

/// Largest delta a single frame may report, in seconds
///
/// Caps the step after a stall (window drag, breakpoint) so particles do not
/// jump across the screen in one frame.
pub const DEFAULT_MAX_DELTA: f32 = 0.25;

/// Time sample for one frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started
    pub elapsed: f32,
    /// Seconds since the previous sample (capped)
    pub delta: f32,
}

/// Monotonic frame clock
pub struct FrameClock {
    start: Instant,
    last_elapsed: f32,
    max_delta: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Start a clock at the current instant
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            last_elapsed: 0.0,
            max_delta: DEFAULT_MAX_DELTA,
        }
    }

    /// Builder: set the per-frame delta cap
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta.max(0.0);
        self
    }

    /// Sample the wall clock
    pub fn tick(&mut self) -> FrameTime {
        let elapsed = self.start.elapsed().as_secs_f32();
        self.advance_to(elapsed)
    }

    /// Advance to an explicit elapsed time
    ///
    /// A sample earlier than the previous one yields a zero delta; elapsed
    /// time never runs backwards as far as callers are concerned.
    pub fn advance_to(&mut self, elapsed: f32) -> FrameTime {
        let elapsed = elapsed.max(self.last_elapsed);
        let delta = (elapsed - self.last_elapsed).min(self.max_delta);
        self.last_elapsed = elapsed;
        FrameTime { elapsed, delta }
    }

    /// Elapsed time at the last sample
    pub fn elapsed(&self) -> f32 {
        self.last_elapsed
    }
}
