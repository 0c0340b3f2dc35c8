//! Scene rendering pipeline

pub mod scene_pipeline;
pub mod types;

pub use scene_pipeline::{pack_uniforms, uniform_stride, FrameSettings, ScenePipeline, DEPTH_FORMAT};
pub use types::{DrawUniforms, MeshVertex, MODE_SOLID, MODE_TEXTURE};
