//! Streak particles (shooting stars)
//!
//! A streak moves in a straight line at constant velocity and remembers its
//! last few positions. The trail is rendered oldest-first with brightness
//! ramping up toward the head.

use std::collections::VecDeque;

use glam::Vec3;

/// Default number of past positions kept per particle
pub const TRAIL_CAPACITY: usize = 10;

/// A single shooting star
#[derive(Clone, Debug, PartialEq)]
pub struct StreakParticle {
    position: Vec3,
    velocity: Vec3,
    life: f32,
    /// Past positions, oldest first
    trail: VecDeque<Vec3>,
    trail_capacity: usize,
}

impl StreakParticle {
    /// Create a particle with an empty trail
    pub fn new(position: Vec3, velocity: Vec3, life: f32) -> Self {
        Self {
            position,
            velocity,
            life,
            trail: VecDeque::with_capacity(TRAIL_CAPACITY + 1),
            trail_capacity: TRAIL_CAPACITY,
        }
    }

    /// Builder: set how many past positions are kept
    pub fn with_trail_capacity(mut self, capacity: usize) -> Self {
        self.trail_capacity = capacity;
        while self.trail.len() > capacity {
            self.trail.pop_front();
        }
        self
    }

    /// Advance one frame
    ///
    /// Records the current position in the trail (evicting the oldest entry
    /// on overflow), then integrates position and decays life.
    pub fn update(&mut self, dt: f32) {
        self.trail.push_back(self.position);
        while self.trail.len() > self.trail_capacity {
            self.trail.pop_front();
        }
        self.position += self.velocity * dt;
        self.life -= dt;
    }

    /// Check if the particle's life has run out
    #[inline]
    pub fn is_expired(&self) -> bool {
        self.life <= 0.0
    }

    /// Current (head) position
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Constant velocity
    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Remaining life in seconds
    #[inline]
    pub fn life(&self) -> f32 {
        self.life
    }

    /// Past positions, oldest first
    pub fn trail(&self) -> impl ExactSizeIterator<Item = Vec3> + '_ {
        self.trail.iter().copied()
    }

    /// Number of stored trail positions
    #[inline]
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }

    /// Maximum number of stored trail positions
    #[inline]
    pub fn trail_capacity(&self) -> usize {
        self.trail_capacity
    }

    /// Render samples: the trail oldest-first, then the head
    ///
    /// Trail sample `i` of `n` has brightness `i / n`; the head has
    /// brightness `1.0 + head_glow`. The sequence borrows the particle and can
    /// be recreated any number of times.
    pub fn samples(&self, head_glow: f32) -> TrailSamples<'_> {
        TrailSamples {
            particle: self,
            index: 0,
            head_glow,
            head_done: false,
        }
    }
}

/// A position to draw and how bright to draw it
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSample {
    pub position: Vec3,
    /// May exceed 1.0 for the head
    pub brightness: f32,
}

/// Lazy sequence of a particle's render samples
pub struct TrailSamples<'a> {
    particle: &'a StreakParticle,
    index: usize,
    head_glow: f32,
    head_done: bool,
}

impl Iterator for TrailSamples<'_> {
    type Item = TrailSample;

    fn next(&mut self) -> Option<TrailSample> {
        let len = self.particle.trail.len();
        if self.index < len {
            let sample = TrailSample {
                position: self.particle.trail[self.index],
                brightness: self.index as f32 / len as f32,
            };
            self.index += 1;
            Some(sample)
        } else if !self.head_done {
            self.head_done = true;
            Some(TrailSample {
                position: self.particle.position,
                brightness: 1.0 + self.head_glow,
            })
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.particle.trail.len().saturating_sub(self.index)
            + usize::from(!self.head_done);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TrailSamples<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn streak() -> StreakParticle {
        StreakParticle::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 100.0)
    }

    #[test]
    fn test_update_integrates_and_decays() {
        let mut p = StreakParticle::new(Vec3::new(0.0, 3.0, -5.0), Vec3::new(2.5, -3.0, 0.0), 2.0);
        p.update(0.5);
        assert_eq!(p.position(), Vec3::new(1.25, 1.5, -5.0));
        assert_eq!(p.life(), 1.5);
        assert_eq!(p.trail().collect::<Vec<_>>(), vec![Vec3::new(0.0, 3.0, -5.0)]);
    }

    #[test]
    fn test_trail_fills_to_capacity() {
        let mut p = streak();
        for _ in 0..TRAIL_CAPACITY {
            p.update(1.0);
        }
        assert_eq!(p.trail_len(), TRAIL_CAPACITY);
        // Nothing evicted yet: the spawn position is still the oldest entry
        assert_eq!(p.trail().next(), Some(Vec3::ZERO));
    }

    #[test]
    fn test_trail_evicts_oldest_on_overflow() {
        let mut p = streak();
        for _ in 0..=TRAIL_CAPACITY {
            p.update(1.0);
        }
        assert_eq!(p.trail_len(), TRAIL_CAPACITY);
        let trail: Vec<Vec3> = p.trail().collect();
        assert_eq!(trail[0], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(trail[TRAIL_CAPACITY - 1], Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_trail_never_exceeds_capacity() {
        let mut p = streak();
        for _ in 0..1000 {
            p.update(0.01);
            assert!(p.trail_len() <= TRAIL_CAPACITY);
        }
    }

    #[test]
    fn test_custom_trail_capacity() {
        let mut p = streak().with_trail_capacity(3);
        for _ in 0..8 {
            p.update(1.0);
        }
        assert_eq!(p.trail_len(), 3);
        assert_eq!(p.trail_capacity(), 3);
    }

    #[test]
    fn test_expiry_boundary() {
        let mut p = StreakParticle::new(Vec3::ZERO, Vec3::ZERO, 1.0);
        p.update(0.75);
        assert!(!p.is_expired());
        p.update(0.25);
        // Exactly zero counts as expired
        assert!(p.is_expired());
    }

    #[test]
    fn test_brightness_ramp_and_head_glow() {
        let mut p = streak();
        for _ in 0..4 {
            p.update(1.0);
        }
        let samples: Vec<TrailSample> = p.samples(0.5).collect();
        assert_eq!(samples.len(), 5);
        let brightness: Vec<f32> = samples.iter().map(|s| s.brightness).collect();
        assert_eq!(brightness, vec![0.0, 0.25, 0.5, 0.75, 1.5]);
        // Oldest first, head last
        assert_eq!(samples[0].position, Vec3::ZERO);
        assert_eq!(samples[4].position, p.position());
    }

    #[test]
    fn test_full_trail_brightness_is_i_over_n() {
        let mut p = streak();
        for _ in 0..25 {
            p.update(0.1);
        }
        let n = p.trail_len();
        for (i, sample) in p.samples(0.5).take(n).enumerate() {
            assert_eq!(sample.brightness, i as f32 / n as f32);
        }
        let head = p.samples(0.5).last().unwrap();
        assert!(head.brightness > 1.0);
        assert_eq!(head.brightness - 1.0, 0.5);
    }

    #[test]
    fn test_samples_restartable() {
        let mut p = streak();
        p.update(1.0);
        p.update(1.0);
        let first: Vec<TrailSample> = p.samples(0.5).collect();
        let second: Vec<TrailSample> = p.samples(0.5).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_trail_yields_only_head() {
        let p = streak();
        let samples: Vec<TrailSample> = p.samples(0.5).collect();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].brightness, 1.5);
    }

    #[test]
    fn test_exact_size() {
        let mut p = streak();
        p.update(1.0);
        p.update(1.0);
        let mut samples = p.samples(0.5);
        assert_eq!(samples.len(), 3);
        samples.next();
        assert_eq!(samples.len(), 2);
    }
}
