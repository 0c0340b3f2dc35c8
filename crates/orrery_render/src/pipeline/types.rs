//! GPU-compatible data types for the scene pipeline
//!
//! These types match the layouts in `scene.wgsl` exactly.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use orrery_core::Shading;

/// Shader mode: flat color from the uniforms
pub const MODE_SOLID: u32 = 0;
/// Shader mode: sample the bound texture, tinted by the vertex color
pub const MODE_TEXTURE: u32 = 1;

/// Mesh vertex: position, color, texture coordinate
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], color: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, color, uv }
    }
}

/// Per-draw uniforms
/// Layout: 112 bytes total (must match scene.wgsl DrawUniforms)
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct DrawUniforms {
    /// Projection * view * model (64 bytes)
    pub mvp: [[f32; 4]; 4],
    /// RGB color, alpha unused (16 bytes)
    pub color: [f32; 4],
    /// One of the MODE_* constants, plus padding (16 bytes)
    pub mode: u32,
    pub _padding: [u32; 3],
    /// Point size in pixels, viewport width, viewport height, unused (16 bytes)
    pub point: [f32; 4],
}

impl Default for DrawUniforms {
    fn default() -> Self {
        Self {
            mvp: Mat4::IDENTITY.to_cols_array_2d(),
            color: [1.0; 4],
            mode: MODE_SOLID,
            _padding: [0; 3],
            point: [1.0, 1.0, 1.0, 0.0],
        }
    }
}

impl DrawUniforms {
    /// Build uniforms for one draw
    ///
    /// Colors are passed through unclamped.
    pub fn new(mvp: Mat4, shading: Shading, point_size: f32, viewport: (u32, u32)) -> Self {
        let (mode, color) = match shading {
            Shading::Solid(c) => (MODE_SOLID, [c.x, c.y, c.z, 1.0]),
            Shading::Texture(_) => (MODE_TEXTURE, [1.0; 4]),
        };
        Self {
            mvp: mvp.to_cols_array_2d(),
            color,
            mode,
            _padding: [0; 3],
            point: [
                point_size,
                viewport.0.max(1) as f32,
                viewport.1.max(1) as f32,
                0.0,
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use orrery_core::TextureId;

    #[test]
    fn test_mesh_vertex_size() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 32);
    }

    #[test]
    fn test_draw_uniforms_size() {
        assert_eq!(std::mem::size_of::<DrawUniforms>(), 112);
        // Uniform buffer bindings must be a multiple of 16
        assert_eq!(std::mem::size_of::<DrawUniforms>() % 16, 0);
    }

    #[test]
    fn test_shading_modes() {
        let solid = DrawUniforms::new(Mat4::IDENTITY, Shading::Solid(Vec3::splat(1.5)), 3.0, (800, 600));
        assert_eq!(solid.mode, MODE_SOLID);
        // Over-bright heads are not clamped
        assert_eq!(solid.color, [1.5, 1.5, 1.5, 1.0]);

        let tex = DrawUniforms::new(Mat4::IDENTITY, Shading::Texture(TextureId(2)), 3.0, (800, 600));
        assert_eq!(tex.mode, MODE_TEXTURE);

        // Zero-sized viewports are clamped so the point shader never divides by zero
        let minimized = DrawUniforms::new(Mat4::IDENTITY, Shading::Texture(TextureId(0)), 3.0, (0, 0));
        assert_eq!(minimized.point, [3.0, 1.0, 1.0, 0.0]);
    }
}
