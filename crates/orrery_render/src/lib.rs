//! Scene rendering
//!
//! wgpu-based renderer for the orrery: camera, GPU context, sphere mesh,
//! texture loading, and the scene pipeline.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::Camera`] - free-look camera with yaw/pitch and a fixed up axis
//! - [`pipeline::ScenePipeline`] - mesh and point sprite rendering
//! - [`texture::TextureSet`] - decoded textures plus a white fallback

pub mod camera;
pub mod context;
pub mod mesh;
pub mod pipeline;
pub mod texture;

pub use camera::Camera;
pub use context::{init_render_context_blocking, RenderContext, RenderContextError};
pub use mesh::{sphere_vertex_count, uv_sphere, MeshBuffer};
pub use pipeline::{FrameSettings, ScenePipeline};
pub use texture::{decode_rgba, GpuTexture, TextureError, TextureSet};

// Re-export core types for convenience
pub use orrery_core::{DrawCommand, MeshHandle, Primitive, Shading, TextureId};
