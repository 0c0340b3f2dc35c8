//! Streak particle manager
//!
//! Owns the active shooting stars. Each frame:
//! 1. the spawn timer accumulates `dt`; crossing the interval spawns one streak
//! 2. every streak records its trail, moves, and loses life
//! 3. expired streaks are filtered out, preserving the order of survivors

use glam::Vec3;
use rand::distr::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::streak::{StreakParticle, TrailSamples, TRAIL_CAPACITY};

/// Brightness added on top of 1.0 for a streak's head
pub const DEFAULT_HEAD_GLOW: f32 = 0.5;

/// Axis-aligned box that new streaks spawn inside
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnRegion {
    pub min: Vec3,
    pub max: Vec3,
}

impl SpawnRegion {
    /// Create a region from two corners (in any order)
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Pick a uniformly random point inside the region
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec3 {
        Vec3::new(
            sample_axis(rng, self.min.x, self.max.x),
            sample_axis(rng, self.min.y, self.max.y),
            sample_axis(rng, self.min.z, self.max.z),
        )
    }

    /// Check if a point lies inside the region (bounds inclusive)
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }
}

/// Falls back to `lo` when the axis is empty or too wide to sample.
fn sample_axis<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if !(hi > lo) {
        return lo;
    }
    match Uniform::new_inclusive(lo, hi) {
        Ok(dist) => rng.sample(dist),
        Err(_) => lo,
    }
}

/// Spawn and lifetime parameters for streaks
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreakConfig {
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Past positions kept per streak
    pub trail_capacity: usize,
    /// Velocity given to every new streak
    pub velocity: Vec3,
    /// Life given to every new streak, seconds
    pub life: f32,
    /// Where new streaks appear
    pub region: SpawnRegion,
    /// Extra head brightness above 1.0
    pub head_glow: f32,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 1.0,
            trail_capacity: TRAIL_CAPACITY,
            velocity: Vec3::new(2.5, -3.0, 0.0),
            life: 2.0,
            region: SpawnRegion::new(Vec3::new(-5.0, 3.0, -5.0), Vec3::new(5.0, 5.0, -5.0)),
            head_glow: DEFAULT_HEAD_GLOW,
        }
    }
}

/// What happened during one [`ParticleManager::advance`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdvanceReport {
    /// A streak was spawned this frame
    pub spawned: bool,
    /// Number of streaks removed this frame
    pub expired: usize,
}

/// Owns and advances the active streaks
pub struct ParticleManager<R = StdRng> {
    config: StreakConfig,
    particles: Vec<StreakParticle>,
    spawn_timer: f32,
    rng: R,
}

impl ParticleManager<StdRng> {
    /// Create a manager seeded from the OS
    pub fn new(config: StreakConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a manager with a fixed seed (reproducible spawns)
    pub fn seeded(config: StreakConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ParticleManager<R> {
    /// Create a manager with a caller-supplied RNG
    pub fn with_rng(config: StreakConfig, rng: R) -> Self {
        Self {
            config,
            particles: Vec::new(),
            spawn_timer: 0.0,
            rng,
        }
    }

    /// Run one frame: spawn check, update, cull
    pub fn advance(&mut self, dt: f32) -> AdvanceReport {
        let spawned = self.tick_spawn_timer(dt);
        self.update(dt);
        let expired = self.cull();
        AdvanceReport { spawned, expired }
    }

    /// Accumulate `dt` and spawn one streak if the interval was exceeded
    ///
    /// Returns true if a streak was spawned. The timer resets to zero on spawn.
    pub fn tick_spawn_timer(&mut self, dt: f32) -> bool {
        self.spawn_timer += dt;
        if self.spawn_timer > self.config.spawn_interval {
            self.spawn_timer = 0.0;
            self.spawn();
            true
        } else {
            false
        }
    }

    /// Spawn a streak at a random position in the spawn region
    pub fn spawn(&mut self) -> &StreakParticle {
        let position = self.config.region.sample(&mut self.rng);
        log::debug!("Spawning streak at ({:.2}, {:.2}, {:.2})", position.x, position.y, position.z);
        let particle = StreakParticle::new(position, self.config.velocity, self.config.life)
            .with_trail_capacity(self.config.trail_capacity);
        self.insert(particle)
    }

    /// Add an already constructed streak
    pub fn insert(&mut self, particle: StreakParticle) -> &StreakParticle {
        self.particles.push(particle);
        &self.particles[self.particles.len() - 1]
    }

    /// Update every active streak
    pub fn update(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.update(dt);
        }
    }

    /// Remove expired streaks, returning how many were removed
    pub fn cull(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(|p| !p.is_expired());
        let expired = before - self.particles.len();
        if expired > 0 {
            log::debug!("Culled {} expired streak(s), {} active", expired, self.particles.len());
        }
        expired
    }

    /// Render samples for every active streak
    pub fn render_samples(&self) -> impl Iterator<Item = TrailSamples<'_>> + '_ {
        let glow = self.config.head_glow;
        self.particles.iter().map(move |p| p.samples(glow))
    }

    /// Active streaks, in spawn order
    pub fn particles(&self) -> &[StreakParticle] {
        &self.particles
    }

    /// Number of active streaks
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Check if no streaks are active
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Current spawn timer value
    #[inline]
    pub fn spawn_timer(&self) -> f32 {
        self.spawn_timer
    }

    /// Spawn configuration
    pub fn config(&self) -> &StreakConfig {
        &self.config
    }

    /// Remove all streaks and reset the spawn timer
    pub fn clear(&mut self) {
        self.particles.clear();
        self.spawn_timer = 0.0;
    }
}
