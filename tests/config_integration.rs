//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use orrery::config::AppConfig;
use serial_test::serial;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("orrery_config_{}_{}", std::process::id(), name));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("ORRERY_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "Test From Env");
    std::env::remove_var("ORRERY_WINDOW__TITLE");
}

#[test]
#[serial]
fn test_nested_env_override() {
    std::env::set_var("ORRERY_SCENE__EARTH__ORBIT_RATE", "45.0");
    let config = AppConfig::load().unwrap();
    assert_eq!(config.scene.earth.orbit_rate, 45.0);
    // Siblings keep their file values
    assert_eq!(config.scene.earth.spin_rate, 100.0);
    std::env::remove_var("ORRERY_SCENE__EARTH__ORBIT_RATE");
}

#[test]
#[serial]
fn test_default_file_matches_builtin_defaults() {
    let config = AppConfig::load().unwrap();
    let builtin = AppConfig::default();
    assert_eq!(config.camera.start_position, builtin.camera.start_position);
    assert_eq!(config.camera.yaw_limits, builtin.camera.yaw_limits);
    assert_eq!(config.particles.velocity, builtin.particles.velocity);
    assert_eq!(config.scene.moon.scale, builtin.scene.moon.scale);
    assert_eq!(config.rendering.point_size, builtin.rendering.point_size);
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = scratch_dir("user");
    std::fs::write(dir.join("default.toml"), "[input]\nmove_speed = 1.5\nangular_speed = 6.0\n").unwrap();
    std::fs::write(dir.join("user.toml"), "[input]\nmove_speed = 4.0\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(config.input.move_speed, 4.0);
    assert_eq!(config.input.angular_speed, 6.0);
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let config = AppConfig::load_from("does/not/exist").unwrap();
    assert_eq!(config.window.width, 800);
    assert_eq!(config.particles.spawn_interval, 1.0);
}

#[test]
#[serial]
fn test_invalid_value_is_rejected() {
    let dir = scratch_dir("invalid");
    std::fs::write(dir.join("default.toml"), "[particles]\ntrail_length = 0\n").unwrap();

    let result = AppConfig::load_from(&dir);
    std::fs::remove_dir_all(&dir).ok();

    assert!(result.is_err());
}
