//! Sphere tessellation and vertex buffer upload

use std::f32::consts::PI;

use wgpu::util::DeviceExt;

use crate::pipeline::MeshVertex;

/// Number of vertices `uv_sphere` emits for the given tessellation
pub fn sphere_vertex_count(sectors: u32, stacks: u32) -> u32 {
    stacks * (sectors + 1) * 2
}

/// UV sphere as a single triangle strip
///
/// Each stack contributes `sectors + 1` vertex pairs (upper ring, lower ring),
/// running from the north pole down. Vertex color is white; `v` goes from 1 at
/// the top to 0 at the bottom, matching images flipped on load.
pub fn uv_sphere(sectors: u32, stacks: u32, radius: f32) -> Vec<MeshVertex> {
    let sectors = sectors.max(3);
    let stacks = stacks.max(2);
    let mut vertices = Vec::with_capacity(sphere_vertex_count(sectors, stacks) as usize);

    for i in 0..stacks {
        let a1 = PI / 2.0 - i as f32 * PI / stacks as f32;
        let a2 = PI / 2.0 - (i + 1) as f32 * PI / stacks as f32;
        let (y1, r1) = (radius * a1.sin(), radius * a1.cos());
        let (y2, r2) = (radius * a2.sin(), radius * a2.cos());
        let t1 = 1.0 - i as f32 / stacks as f32;
        let t2 = 1.0 - (i + 1) as f32 / stacks as f32;

        for j in 0..=sectors {
            let theta = j as f32 * 2.0 * PI / sectors as f32;
            let (sin, cos) = theta.sin_cos();
            let s = j as f32 / sectors as f32;
            vertices.push(MeshVertex::new([r1 * cos, y1, r1 * sin], [1.0; 3], [s, t1]));
            vertices.push(MeshVertex::new([r2 * cos, y2, r2 * sin], [1.0; 3], [s, t2]));
        }
    }

    vertices
}

/// Vertex buffer on the GPU
pub struct MeshBuffer {
    pub buffer: wgpu::Buffer,
    pub vertex_count: u32,
}

impl MeshBuffer {
    /// Upload vertices into a new vertex buffer
    pub fn upload(device: &wgpu::Device, label: &str, vertices: &[MeshVertex]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            vertex_count: vertices.len() as u32,
        }
    }
}
