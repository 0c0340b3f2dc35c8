//! Scene pipeline: filled meshes and point sprites
//!
//! Every draw gets its own slot in a dynamic-offset uniform buffer, so a whole
//! frame's uniforms are written with one `write_buffer` before the pass.

use std::num::NonZeroU64;

use orrery_core::{DrawCommand, Primitive, Shading};

use super::types::{DrawUniforms, MeshVertex};
use crate::mesh::MeshBuffer;
use crate::texture::TextureSet;

/// Depth buffer format
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertices emitted per point sprite (two triangles)
const POINT_VERTEX_COUNT: u32 = 6;

const UNIFORM_SIZE: u64 = std::mem::size_of::<DrawUniforms>() as u64;

/// Round the uniform size up to the device's dynamic offset alignment
pub fn uniform_stride(alignment: u32) -> u64 {
    let alignment = u64::from(alignment.max(1));
    UNIFORM_SIZE.div_ceil(alignment) * alignment
}

/// Lay out uniforms at `stride` byte intervals
pub fn pack_uniforms(uniforms: &[DrawUniforms], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; uniforms.len() * stride];
    for (slot, u) in bytes.chunks_exact_mut(stride).zip(uniforms) {
        slot[..UNIFORM_SIZE as usize].copy_from_slice(bytemuck::bytes_of(u));
    }
    bytes
}

/// Frame-wide render settings
#[derive(Clone, Copy, Debug)]
pub struct FrameSettings {
    pub clear_color: wgpu::Color,
    /// Point sprite size in pixels
    pub point_size: f32,
}

/// Render pipelines and per-draw uniform storage for the scene
pub struct ScenePipeline {
    mesh_pipeline: wgpu::RenderPipeline,
    point_pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    /// Draw slots in the uniform buffer
    capacity: usize,
    stride: u64,
    depth_texture: Option<wgpu::TextureView>,
    depth_size: (u32, u32),
}

impl ScenePipeline {
    /// Create both pipelines
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        texture_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Uniform Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout, texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/scene.wgsl").into()),
        });

        let mesh_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            "Mesh Pipeline",
            "vs_mesh",
            &[Self::vertex_buffer_layout()],
            wgpu::PrimitiveTopology::TriangleStrip,
        );
        let point_pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            surface_format,
            "Point Pipeline",
            "vs_point",
            &[],
            wgpu::PrimitiveTopology::TriangleList,
        );

        let stride = uniform_stride(device.limits().min_uniform_buffer_offset_alignment);
        let capacity = 64;
        let (uniform_buffer, uniform_bind_group) =
            Self::create_uniforms(device, &uniform_layout, capacity, stride);

        Self {
            mesh_pipeline,
            point_pipeline,
            uniform_layout,
            uniform_buffer,
            uniform_bind_group,
            capacity,
            stride,
            depth_texture: None,
            depth_size: (0, 0),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        label: &str,
        vertex_entry: &str,
        buffers: &[wgpu::VertexBufferLayout<'_>],
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(vertex_entry),
                buffers,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn create_uniforms(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: usize,
        stride: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Draw Uniform Buffer"),
            size: capacity as u64 * stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Uniform Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(UNIFORM_SIZE),
                }),
            }],
        });
        (buffer, bind_group)
    }

    /// Get the vertex buffer layout for MeshVertex
    fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<MeshVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                // color: vec3<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                // uv: vec2<f32>
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 24,
                    shader_location: 2,
                },
            ],
        }
    }

    /// Ensure depth texture exists and is the right size
    pub fn ensure_depth_texture(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.depth_texture.is_none() || self.depth_size != (width, height) {
            let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("Depth Texture"),
                size: wgpu::Extent3d {
                    width: width.max(1),
                    height: height.max(1),
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: DEPTH_FORMAT,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            });

            self.depth_texture = Some(depth_texture.create_view(&wgpu::TextureViewDescriptor::default()));
            self.depth_size = (width, height);
        }
    }

    /// Write uniforms for `draws`, growing the buffer when needed
    fn upload_uniforms(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        draws: &[DrawCommand],
        settings: &FrameSettings,
    ) {
        if draws.len() > self.capacity {
            self.capacity = draws.len().next_power_of_two();
            let (buffer, bind_group) =
                Self::create_uniforms(device, &self.uniform_layout, self.capacity, self.stride);
            self.uniform_buffer = buffer;
            self.uniform_bind_group = bind_group;
            log::debug!("Draw uniform buffer grown to {} slots", self.capacity);
        }

        let uniforms: Vec<DrawUniforms> = draws
            .iter()
            .map(|d| DrawUniforms::new(d.mvp, d.shading, settings.point_size, self.depth_size))
            .collect();
        queue.write_buffer(&self.uniform_buffer, 0, &pack_uniforms(&uniforms, self.stride));
    }

    /// Record one render pass drawing `draws` in order
    ///
    /// Call [`ensure_depth_texture`](Self::ensure_depth_texture) first.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        draws: &[DrawCommand],
        meshes: &[MeshBuffer],
        textures: &TextureSet,
        settings: &FrameSettings,
    ) {
        if !draws.is_empty() {
            self.upload_uniforms(device, queue, draws, settings);
        }

        let Some(depth_view) = self.depth_texture.as_ref() else {
            log::warn!("Depth texture missing, skipping frame");
            return;
        };

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(settings.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        for (i, draw) in draws.iter().enumerate() {
            let offset = (i as u64 * self.stride) as wgpu::DynamicOffset;
            let texture = match draw.shading {
                Shading::Texture(id) => textures.get(id),
                Shading::Solid(_) => textures.white(),
            };

            match draw.primitive {
                Primitive::Mesh(handle) => {
                    let Some(mesh) = meshes.get(handle.id) else {
                        log::warn!("Unknown mesh {}, draw skipped", handle.id);
                        continue;
                    };
                    render_pass.set_pipeline(&self.mesh_pipeline);
                    render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                    render_pass.set_bind_group(1, &texture.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, mesh.buffer.slice(..));
                    render_pass.draw(0..handle.vertex_count.min(mesh.vertex_count), 0..1);
                }
                Primitive::Point => {
                    render_pass.set_pipeline(&self.point_pipeline);
                    render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                    render_pass.set_bind_group(1, &texture.bind_group, &[]);
                    render_pass.draw(0..POINT_VERTEX_COUNT, 0..1);
                }
            }
        }
    }
}
