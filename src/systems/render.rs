//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Scene textures and the sphere mesh
//! - Submitting a frame's draw list

use std::path::PathBuf;
use std::sync::Arc;
use winit::window::Window;
use orrery_core::DrawCommand;
use orrery_render::{
    init_render_context_blocking, uv_sphere, FrameSettings, MeshBuffer, RenderContext,
    RenderContextError, ScenePipeline, TextureError, TextureSet,
};
use crate::config::RenderingConfig;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// GPU context could not be created
    Context(RenderContextError),
    /// A scene texture failed to load
    Texture(TextureError),
    /// Surface was lost or outdated (reconfigured, frame skipped)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Context(e) => write!(f, "{}", e),
            RenderError::Texture(e) => write!(f, "{}", e),
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Context(e) => Some(e),
            RenderError::Texture(e) => Some(e),
            _ => None,
        }
    }
}

impl From<RenderContextError> for RenderError {
    fn from(e: RenderContextError) -> Self {
        RenderError::Context(e)
    }
}

impl From<TextureError> for RenderError {
    fn from(e: TextureError) -> Self {
        RenderError::Texture(e)
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    pipeline: ScenePipeline,
    textures: TextureSet,
    /// Mesh 0 is the sphere
    meshes: Vec<MeshBuffer>,
    settings: FrameSettings,
}

impl RenderSystem {
    /// Create render system from window and config
    ///
    /// Textures load in order, so `texture_paths[i]` becomes `TextureId(i)`.
    /// Any failure here is fatal for the run.
    pub fn new(
        window: Arc<Window>,
        render_config: &RenderingConfig,
        texture_paths: &[PathBuf],
        vsync: bool,
    ) -> Result<Self, RenderError> {
        let context = init_render_context_blocking(window, vsync)?;

        let mut textures = TextureSet::new(&context.device, &context.queue);
        for path in texture_paths {
            textures.load(&context.device, &context.queue, path)?;
        }

        let sphere = uv_sphere(render_config.sphere_sectors, render_config.sphere_stacks, 0.5);
        let meshes = vec![MeshBuffer::upload(&context.device, "Sphere Mesh", &sphere)];
        log::info!("Uploaded sphere mesh with {} vertices", meshes[0].vertex_count);

        let mut pipeline = ScenePipeline::new(
            &context.device,
            context.surface_format(),
            textures.bind_group_layout(),
        );

        // Ensure depth texture exists
        pipeline.ensure_depth_texture(&context.device, context.config.width, context.config.height);

        let bg = render_config.background_color;
        let settings = FrameSettings {
            clear_color: wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: bg[3] as f64,
            },
            point_size: render_config.point_size,
        };

        Ok(Self {
            context,
            pipeline,
            textures,
            meshes,
            settings,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.pipeline.ensure_depth_texture(&self.context.device, width, height);
    }

    /// Surface width / height
    pub fn aspect_ratio(&self) -> f32 {
        self.context.aspect_ratio()
    }

    /// Render a single frame from a draw list
    pub fn render_frame(&mut self, draws: &[DrawCommand]) -> Result<(), RenderError> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.pipeline.render(
            &self.context.device,
            &self.context.queue,
            &mut encoder,
            &view,
            draws,
            &self.meshes,
            &self.textures,
            &self.settings,
        );

        // Submit
        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.config.width, self.context.config.height)
    }
}
