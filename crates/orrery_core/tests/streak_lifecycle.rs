//! Integration tests for streak lifecycle through the particle manager
//!
//! These drive the manager the way the frame loop does (advance once per
//! frame) and check the lifecycle properties end to end.

use orrery_core::{ParticleManager, StreakConfig, StreakParticle, Vec3, TRAIL_CAPACITY};

/// Config that never spawns on its own, so tests control the population
fn quiet_config() -> StreakConfig {
    StreakConfig {
        spawn_interval: f32::MAX,
        ..StreakConfig::default()
    }
}

#[test]
fn test_streak_present_just_before_life_runs_out() {
    let life = 2.0;
    let dt = 0.125;
    let mut manager = ParticleManager::seeded(quiet_config(), 1);
    manager.insert(StreakParticle::new(Vec3::ZERO, Vec3::new(2.5, -3.0, 0.0), life));

    // 15 frames = 1.875s, still alive
    for _ in 0..15 {
        manager.advance(dt);
    }
    assert_eq!(manager.len(), 1);
    assert!(manager.particles()[0].life() > 0.0);

    // 16th frame reaches exactly 2.0s of updates: removed
    let report = manager.advance(dt);
    assert_eq!(report.expired, 1);
    assert!(manager.is_empty());
}

#[test]
fn test_streak_removed_once_past_life() {
    let mut manager = ParticleManager::seeded(quiet_config(), 1);
    manager.insert(StreakParticle::new(Vec3::ZERO, Vec3::ZERO, 1.0));

    manager.advance(0.75);
    assert_eq!(manager.len(), 1);
    manager.advance(0.5);
    assert!(manager.is_empty());

    // Nothing left to remove on later frames
    assert_eq!(manager.advance(0.5).expired, 0);
}

#[test]
fn test_trail_bounded_through_manager() {
    let mut manager = ParticleManager::seeded(quiet_config(), 3);
    manager.insert(StreakParticle::new(Vec3::ZERO, Vec3::X, 1000.0));

    for frame in 1..=50 {
        manager.advance(0.1);
        let len = manager.particles()[0].trail_len();
        assert_eq!(len, frame.min(TRAIL_CAPACITY));
    }
}

#[test]
fn test_steady_state_population() {
    // One spawn roughly every second, each living two seconds:
    // never more than two or three alive at once.
    let mut manager = ParticleManager::seeded(StreakConfig::default(), 99);
    let mut max_alive = 0;
    let mut spawned = 0;
    for _ in 0..(60 * 30) {
        let report = manager.advance(1.0 / 60.0);
        spawned += usize::from(report.spawned);
        max_alive = max_alive.max(manager.len());
    }
    assert!(spawned >= 25, "spawned {}", spawned);
    assert!(max_alive <= 3, "max alive {}", max_alive);
    assert!(max_alive >= 1);
}

#[test]
fn test_render_samples_match_brightness_contract() {
    let mut manager = ParticleManager::seeded(quiet_config(), 5);
    manager.insert(StreakParticle::new(Vec3::ZERO, Vec3::Y, 100.0));
    for _ in 0..30 {
        manager.advance(0.05);
    }

    let glow = manager.config().head_glow;
    for samples in manager.render_samples() {
        let samples: Vec<_> = samples.collect();
        let n = samples.len() - 1;
        assert_eq!(n, TRAIL_CAPACITY);
        for (i, sample) in samples[..n].iter().enumerate() {
            assert_eq!(sample.brightness, i as f32 / n as f32);
        }
        assert_eq!(samples[n].brightness, 1.0 + glow);
        // Positions increase monotonically toward the head
        for pair in samples.windows(2) {
            assert!(pair[1].position.y > pair[0].position.y);
        }
    }
}
