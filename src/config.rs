//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`ORRERY_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use glam::Vec3;
use orrery_core::{SpawnRegion, StreakConfig};
use orrery_input::{AngleRange, LookLimits};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Input configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Shooting star configuration
    #[serde(default)]
    pub particles: ParticleConfig,
    /// Orbital bodies
    #[serde(default)]
    pub scene: SceneConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`ORRERY_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // ORRERY_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("ORRERY_").split("__"));

        let config: Self = figment.extract().map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particles.trail_length == 0 {
            return Err(ConfigError::invalid("particles.trail_length must be at least 1"));
        }
        if !(self.particles.spawn_interval > 0.0) {
            return Err(ConfigError::invalid("particles.spawn_interval must be positive"));
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(ConfigError::invalid("camera clip planes must satisfy 0 < near < far"));
        }
        let finite = [
            ("camera.yaw", self.camera.yaw),
            ("camera.pitch", self.camera.pitch),
            ("camera.fov", self.camera.fov),
            ("camera.yaw_limits", self.camera.yaw_limits[0]),
            ("camera.yaw_limits", self.camera.yaw_limits[1]),
            ("camera.pitch_limits", self.camera.pitch_limits[0]),
            ("camera.pitch_limits", self.camera.pitch_limits[1]),
            ("input.move_speed", self.input.move_speed),
            ("input.angular_speed", self.input.angular_speed),
            ("particles.life", self.particles.life),
            ("particles.head_glow", self.particles.head_glow),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::invalid(&format!("{} must be finite", name)));
        }
        for axis in 0..3 {
            let (lo, hi) = (self.particles.spawn_min[axis], self.particles.spawn_max[axis]);
            if !(lo.is_finite() && hi.is_finite() && (hi - lo).is_finite()) {
                return Err(ConfigError::invalid(
                    "particles.spawn_min/spawn_max must be finite with a finite span",
                ));
            }
        }
        if self.rendering.sphere_sectors < 3 || self.rendering.sphere_stacks < 2 {
            return Err(ConfigError::invalid("sphere needs at least 3 sectors and 2 stacks"));
        }
        Ok(())
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
    /// Grab and hide the cursor on startup
    pub capture_cursor: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Solar System with Shooting Stars".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
            vsync: true,
            capture_cursor: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting eye position [x, y, z]
    pub start_position: [f32; 3],
    /// Starting yaw in degrees (90 looks down -Z)
    pub yaw: f32,
    /// Starting pitch in degrees
    pub pitch: f32,
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Yaw limits [min, max] in degrees
    pub yaw_limits: [f32; 2],
    /// Pitch limits [min, max] in degrees
    pub pitch_limits: [f32; 2],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            start_position: [0.0, 0.0, 6.0],
            yaw: 90.0,
            pitch: 0.0,
            fov: 45.0,
            near: 0.1,
            far: 100.0,
            yaw_limits: [60.0, 120.0],
            pitch_limits: [-25.0, 25.0],
        }
    }
}

impl CameraConfig {
    pub fn start_position(&self) -> Vec3 {
        Vec3::from(self.start_position)
    }

    pub fn look_limits(&self) -> LookLimits {
        LookLimits {
            yaw: AngleRange::new(self.yaw_limits[0], self.yaw_limits[1]),
            pitch: AngleRange::new(self.pitch_limits[0], self.pitch_limits[1]),
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Movement speed (units per second)
    pub move_speed: f32,
    /// Look speed (degrees per pointer unit per second)
    pub angular_speed: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            move_speed: 1.5,
            angular_speed: 6.0,
        }
    }
}

/// Shooting star configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Seconds between spawns
    pub spawn_interval: f32,
    /// Trail history length
    pub trail_length: usize,
    /// Velocity of every streak
    pub velocity: [f32; 3],
    /// Lifetime in seconds
    pub life: f32,
    /// Spawn box corners
    pub spawn_min: [f32; 3],
    pub spawn_max: [f32; 3],
    /// Extra brightness of the head above the newest trail sample
    pub head_glow: f32,
    /// Fixed RNG seed; random from the OS when unset
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            spawn_interval: 1.0,
            trail_length: 10,
            velocity: [2.5, -3.0, 0.0],
            life: 2.0,
            spawn_min: [-5.0, 3.0, -5.0],
            spawn_max: [5.0, 5.0, -5.0],
            head_glow: 0.5,
            seed: None,
        }
    }
}

impl ParticleConfig {
    pub fn streak_config(&self) -> StreakConfig {
        StreakConfig {
            spawn_interval: self.spawn_interval,
            trail_capacity: self.trail_length,
            velocity: Vec3::from(self.velocity),
            life: self.life,
            region: SpawnRegion::new(Vec3::from(self.spawn_min), Vec3::from(self.spawn_max)),
            head_glow: self.head_glow,
        }
    }
}

/// One orbital body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Mesh scale
    pub scale: f32,
    /// Orbit around the parent, degrees per second
    pub orbit_rate: f32,
    /// Rotation about its own axis, degrees per second
    pub spin_rate: f32,
    /// Offset from the parent
    pub offset: [f32; 3],
    /// Flat color, used when there is no texture
    pub color: [f32; 3],
    /// Texture file name, relative to `scene.texture_dir`
    pub texture: Option<String>,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            orbit_rate: 0.0,
            spin_rate: 0.0,
            offset: [0.0; 3],
            color: [1.0; 3],
            texture: None,
        }
    }
}

/// Sun, planet and moon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Directory texture files are loaded from
    pub texture_dir: PathBuf,
    pub sun: BodyConfig,
    pub earth: BodyConfig,
    pub moon: BodyConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("assets"),
            sun: BodyConfig {
                scale: 1.5,
                color: [1.0, 1.0, 0.0],
                ..BodyConfig::default()
            },
            earth: BodyConfig {
                orbit_rate: 30.0,
                spin_rate: 100.0,
                offset: [2.3, 0.0, 0.0],
                texture: Some("earth.jpg".to_string()),
                ..BodyConfig::default()
            },
            moon: BodyConfig {
                scale: 0.6,
                offset: [1.0, 0.0, 0.0],
                texture: Some("moon.jpg".to_string()),
                ..BodyConfig::default()
            },
        }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Background color [r, g, b, a]
    pub background_color: [f32; 4],
    /// Streak point size in pixels
    pub point_size: f32,
    /// Sphere tessellation
    pub sphere_sectors: u32,
    pub sphere_stacks: u32,
    /// Longest frame delta fed to the simulation, seconds
    pub max_frame_delta: f32,
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0, 1.0],
            point_size: 3.0,
            sphere_sectors: 36,
            sphere_stacks: 18,
            max_frame_delta: 0.25,
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn invalid(message: &str) -> Self {
        ConfigError {
            message: message.to_string(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
