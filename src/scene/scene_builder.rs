//! SceneBuilder - orbital scene construction
//!
//! Turns body parameters into a [`BodyHierarchy`] and collects the texture
//! files the renderer must load. Texture ids are handed out in load order, so
//! the renderer loads `texture_paths` front to back and gets matching ids.

use std::path::{Path, PathBuf};

use glam::Vec3;
use orrery_core::{Appearance, BodyHierarchy, BodyKey, HierarchyError, OrbitalBody, TextureId};

use crate::config::{BodyConfig, SceneConfig};

/// Bodies plus the texture files they reference
#[derive(Debug, Clone)]
pub struct Scene {
    pub bodies: BodyHierarchy,
    /// Texture files, indexed by `TextureId`
    pub texture_paths: Vec<PathBuf>,
}

impl Scene {
    /// Build the sun / earth / moon system
    pub fn from_config(config: &SceneConfig) -> Result<Self, HierarchyError> {
        let mut builder = SceneBuilder::new(&config.texture_dir);
        builder.add_body("sun", None, &config.sun)?;
        builder.add_body("earth", Some("sun"), &config.earth)?;
        builder.add_body("moon", Some("earth"), &config.moon)?;
        Ok(builder.build())
    }
}

/// Builder for orbital scenes
///
/// # Example
/// ```ignore
/// let mut builder = SceneBuilder::new("assets");
/// builder.add_body("sun", None, &sun_config)?;
/// builder.add_body("earth", Some("sun"), &earth_config)?;
/// let scene = builder.build();
/// ```
pub struct SceneBuilder {
    bodies: BodyHierarchy,
    texture_dir: PathBuf,
    texture_paths: Vec<PathBuf>,
}

impl SceneBuilder {
    /// Create a builder resolving texture names against `texture_dir`
    pub fn new(texture_dir: impl AsRef<Path>) -> Self {
        Self {
            bodies: BodyHierarchy::new(),
            texture_dir: texture_dir.as_ref().to_path_buf(),
            texture_paths: Vec::new(),
        }
    }

    /// Add a body, orbiting the named parent when given
    pub fn add_body(
        &mut self,
        name: &str,
        parent: Option<&str>,
        config: &BodyConfig,
    ) -> Result<BodyKey, HierarchyError> {
        let appearance = match &config.texture {
            Some(file) => Appearance::Textured(self.texture(file)),
            None => Appearance::Solid(Vec3::from(config.color)),
        };
        let body = OrbitalBody::new(name)
            .with_scale(config.scale)
            .with_orbit_rate(config.orbit_rate)
            .with_spin_rate(config.spin_rate)
            .with_offset(Vec3::from(config.offset))
            .with_appearance(appearance);

        match parent {
            None => Ok(self.bodies.add_root(body)),
            Some(parent_name) => {
                let parent = self
                    .bodies
                    .find(parent_name)
                    .ok_or_else(|| HierarchyError::UnknownParent(name.to_string()))?;
                self.bodies.add_child(parent, body)
            }
        }
    }

    /// Id for a texture file, registering it on first use
    pub fn texture(&mut self, file: &str) -> TextureId {
        let path = self.texture_dir.join(file);
        match self.texture_paths.iter().position(|p| *p == path) {
            Some(index) => TextureId(index),
            None => {
                self.texture_paths.push(path);
                TextureId(self.texture_paths.len() - 1)
            }
        }
    }

    /// Build the scene
    pub fn build(self) -> Scene {
        log::info!(
            "Scene built: {} bodies, {} textures",
            self.bodies.len(),
            self.texture_paths.len()
        );
        Scene {
            bodies: self.bodies,
            texture_paths: self.texture_paths,
        }
    }
}
