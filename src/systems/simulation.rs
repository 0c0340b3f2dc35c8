//! Frame orchestration
//!
//! Runs one frame in a fixed order:
//! 1. sample the clock
//! 2. sample the pointer and run the camera controller
//! 3. rebuild the view-projection
//! 4. evaluate body transforms at the current elapsed time
//! 5. advance the shooting stars (update, then cull)
//! 6. emit draws: bodies in hierarchy order, then every trail sample and head
//!
//! Nothing here reads back from the renderer.

use glam::{DVec2, Mat4, Vec3};
use orrery_core::{
    AdvanceReport, Appearance, BodyHierarchy, DrawCommand, FrameClock, FrameTime, MeshHandle,
    ParticleManager, Shading,
};
use orrery_input::{CameraController, PointerResync, PointerTracker};
use orrery_render::{sphere_vertex_count, Camera};
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::AppConfig;
use crate::scene::Scene;

/// Per-frame input sampled by the application
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    /// Raw pointer position (virtual, accumulated from device motion)
    pub pointer: DVec2,
    /// Surface width / height
    pub aspect: f32,
    /// Whether pointer motion turns the camera (cursor captured)
    pub look_enabled: bool,
    /// Quit key pressed since the last frame
    pub quit_requested: bool,
}

impl Default for FrameInput {
    fn default() -> Self {
        Self {
            pointer: DVec2::ZERO,
            aspect: 1.0,
            look_enabled: true,
            quit_requested: false,
        }
    }
}

/// Everything one frame produced
#[derive(Clone, Debug)]
pub struct FrameOutput {
    pub time: FrameTime,
    /// Draws in submission order
    pub draws: Vec<DrawCommand>,
    /// Pointer position the input source must adopt
    pub resync: Option<PointerResync>,
    /// Stop after this frame is submitted
    pub quit: bool,
    pub particles: AdvanceReport,
}

/// Owns all per-run simulation state
pub struct SimulationSystem<R = StdRng> {
    clock: FrameClock,
    camera: Camera,
    controller: CameraController,
    pointer: PointerTracker,
    bodies: BodyHierarchy,
    particles: ParticleManager<R>,
    sphere: MeshHandle,
}

impl SimulationSystem<StdRng> {
    /// Build the simulation from config and a prepared scene
    ///
    /// The sphere mesh is expected to be the renderer's mesh 0.
    pub fn from_config(config: &AppConfig, scene: Scene) -> Self {
        let cam = &config.camera;
        let camera = Camera::new(cam.start_position(), cam.yaw, cam.pitch)
            .with_fov(cam.fov)
            .with_clip(cam.near, cam.far);

        let controller = CameraController::new()
            .with_move_speed(config.input.move_speed)
            .with_angular_speed(config.input.angular_speed)
            .with_limits(cam.look_limits());

        let streaks = config.particles.streak_config();
        let particles = match config.particles.seed {
            Some(seed) => ParticleManager::seeded(streaks, seed),
            None => ParticleManager::new(streaks),
        };

        let sphere = MeshHandle {
            id: 0,
            vertex_count: sphere_vertex_count(
                config.rendering.sphere_sectors,
                config.rendering.sphere_stacks,
            ),
        };

        let clock = FrameClock::new().with_max_delta(config.rendering.max_frame_delta);
        Self::with_parts(clock, camera, controller, scene.bodies, particles, sphere)
    }
}

impl<R: Rng> SimulationSystem<R> {
    /// Assemble from explicit parts
    ///
    /// The camera's starting angles are clamped into the controller's limits.
    pub fn with_parts(
        clock: FrameClock,
        mut camera: Camera,
        controller: CameraController,
        bodies: BodyHierarchy,
        particles: ParticleManager<R>,
        sphere: MeshHandle,
    ) -> Self {
        let outcome = controller.enforce_limits(&mut camera);
        if outcome.clamped() {
            log::warn!(
                "Starting camera angles outside limits, clamped to yaw {} pitch {}",
                camera.yaw(),
                camera.pitch()
            );
        }

        Self {
            clock,
            camera,
            controller,
            pointer: PointerTracker::default(),
            bodies,
            particles,
            sphere,
        }
    }

    /// Start measuring pointer deltas from `position`
    pub fn reset_pointer(&mut self, position: DVec2) {
        self.pointer = PointerTracker::new(position);
    }

    /// Run one frame against the wall clock
    pub fn update(&mut self, input: FrameInput) -> FrameOutput {
        let time = self.clock.tick();
        self.step(time, input)
    }

    /// Run one frame at an explicit time
    pub fn step(&mut self, time: FrameTime, input: FrameInput) -> FrameOutput {
        let dt = time.delta;

        // Camera
        let resync = if input.look_enabled {
            self.controller
                .update(&mut self.camera, &mut self.pointer, input.pointer, dt)
        } else {
            // Keep the reference current so re-capturing does not jump
            self.pointer.sample(input.pointer);
            self.controller.apply_movement(&mut self.camera, dt);
            None
        };
        if let Some(r) = resync {
            log::debug!("Pointer re-synced to ({:.1}, {:.1})", r.position.x, r.position.y);
        }

        let view_projection = self.camera.view_projection(input.aspect);

        // Bodies, then particles
        let transforms = self.bodies.world_transforms(time.elapsed);
        let report = self.particles.advance(dt);

        let mut draws = Vec::with_capacity(transforms.len() + self.particle_sample_count());
        for t in &transforms {
            let Some(body) = self.bodies.get(t.key) else {
                continue;
            };
            let shading = match body.appearance {
                Appearance::Solid(color) => Shading::Solid(color),
                Appearance::Textured(id) => Shading::Texture(id),
            };
            draws.push(DrawCommand::mesh(view_projection * t.world, self.sphere, shading));
        }

        for samples in self.particles.render_samples() {
            for sample in samples {
                draws.push(DrawCommand::point(
                    view_projection * Mat4::from_translation(sample.position),
                    Shading::Solid(Vec3::splat(sample.brightness)),
                ));
            }
        }

        FrameOutput {
            time,
            draws,
            resync,
            quit: input.quit_requested,
            particles: report,
        }
    }

    fn particle_sample_count(&self) -> usize {
        self.particles
            .particles()
            .iter()
            .map(|p| p.trail_len() + 1)
            .sum()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controller_mut(&mut self) -> &mut CameraController {
        &mut self.controller
    }

    pub fn bodies(&self) -> &BodyHierarchy {
        &self.bodies
    }

    pub fn particles(&self) -> &ParticleManager<R> {
        &self.particles
    }

    /// Put the camera back at its starting pose
    pub fn reset_camera(&mut self) {
        self.camera.reset();
        self.controller.enforce_limits(&mut self.camera);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> SimulationSystem {
        let mut config = AppConfig::default();
        config.particles.seed = Some(7);
        let scene = Scene::from_config(&config.scene).unwrap();
        SimulationSystem::from_config(&config, scene)
    }

    fn at(elapsed: f32, delta: f32) -> FrameTime {
        FrameTime { elapsed, delta }
    }

    #[test]
    fn test_first_frame_draws_bodies_only() {
        let mut sim = system();
        let out = sim.step(at(0.016, 0.016), FrameInput::default());
        assert_eq!(out.draws.len(), 3);
        assert!(out.draws.iter().all(|d| matches!(d.primitive, orrery_core::Primitive::Mesh(_))));
        assert!(!out.draws[0].is_textured());
        assert!(out.draws[1].is_textured());
        assert!(out.draws[2].is_textured());
        assert!(out.resync.is_none());
    }

    #[test]
    fn test_sphere_handle_vertex_count() {
        let mut sim = system();
        let out = sim.step(at(0.0, 0.0), FrameInput::default());
        match out.draws[0].primitive {
            orrery_core::Primitive::Mesh(handle) => assert_eq!(handle.vertex_count, 1332),
            other => panic!("expected mesh, got {:?}", other),
        }
    }

    #[test]
    fn test_look_disabled_ignores_pointer() {
        let mut sim = system();
        let input = FrameInput {
            pointer: DVec2::new(500.0, 500.0),
            look_enabled: false,
            ..FrameInput::default()
        };
        let out = sim.step(at(0.1, 0.1), input);
        assert!(out.resync.is_none());
        assert_eq!((sim.camera().yaw(), sim.camera().pitch()), (90.0, 0.0));
    }

    #[test]
    fn test_quit_passes_through() {
        let mut sim = system();
        let input = FrameInput {
            quit_requested: true,
            ..FrameInput::default()
        };
        assert!(sim.step(at(0.0, 0.0), input).quit);
    }

    #[test]
    fn test_reset_camera() {
        let mut sim = system();
        let input = FrameInput {
            pointer: DVec2::new(-40.0, 10.0),
            ..FrameInput::default()
        };
        sim.step(at(0.1, 0.1), input);
        assert_ne!(sim.camera().yaw(), 90.0);
        sim.reset_camera();
        assert_eq!((sim.camera().yaw(), sim.camera().pitch()), (90.0, 0.0));
    }
}
