//! Draw commands handed from the frame orchestrator to the graphics backend
//!
//! The core only decides *what* is drawn: a combined world-view-projection
//! matrix, a primitive, and an explicit shading selector.

use glam::{Mat4, Vec3};

/// Index of a texture registered with the renderer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// Opaque handle to an uploaded mesh plus its vertex count
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshHandle {
    pub id: usize,
    pub vertex_count: u32,
}

/// What kind of geometry a draw emits
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    /// Filled mesh
    Mesh(MeshHandle),
    /// A single point at the model origin
    Point,
}

/// How fragments are colored
///
/// Colors are not clamped; values above 1.0 are intentional over-bright
/// highlights (streak heads).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shading {
    /// Flat color
    Solid(Vec3),
    /// Sample a registered texture
    Texture(TextureId),
}

/// One draw submission
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    /// Projection * view * model
    pub mvp: Mat4,
    pub primitive: Primitive,
    pub shading: Shading,
}

impl DrawCommand {
    /// Draw a mesh
    pub fn mesh(mvp: Mat4, mesh: MeshHandle, shading: Shading) -> Self {
        Self {
            mvp,
            primitive: Primitive::Mesh(mesh),
            shading,
        }
    }

    /// Draw a point at the origin of `mvp`
    pub fn point(mvp: Mat4, shading: Shading) -> Self {
        Self {
            mvp,
            primitive: Primitive::Point,
            shading,
        }
    }

    /// Check if this draw samples a texture
    pub fn is_textured(&self) -> bool {
        matches!(self.shading, Shading::Texture(_))
    }
}
