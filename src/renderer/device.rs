//! Render device abstraction
//!
//! The scene core talks to the GPU through this narrow trait so concrete
//! backends and the headless test device stay interchangeable.

use glam::{Mat4, Vec3, Vec4};

use crate::renderer::mesh::Vertex;

/// Opaque handle to a linked shader program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

impl ProgramHandle {
    /// The null program; uniform lookups against it always miss
    pub const NULL: Self = Self(0);
}

/// Opaque handle to a GPU texture object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Primitive assembly mode for draw calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Independent triangle list
    #[default]
    Triangles,
    /// Triangle strip
    TriangleStrip,
}

/// Owning handle to an uploaded GPU index buffer
///
/// Dropping the handle releases the underlying buffer.
pub trait IndexBuffer: std::fmt::Debug {
    /// Backend identifier for the underlying buffer
    fn id(&self) -> u32;

    /// Number of indices uploaded
    fn len(&self) -> u32;

    /// Whether the buffer holds no indices
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Abstraction over the GPU command layer
///
/// Bind state (vertex layout, index buffer, uniform values) is global and
/// persists across calls; the last caller wins. Uniform setters are
/// best-effort: a program without the named uniform reports `false` and
/// rendering continues.
pub trait RenderDevice {
    /// Upload indices and hand back an owning buffer handle
    fn create_index_buffer(&mut self, indices: &[u32]) -> Box<dyn IndexBuffer>;

    /// Bind the position/normal/uv vertex layout and data to a program
    fn bind_vertex_layout(&mut self, program: ProgramHandle, vertices: &[Vertex]);

    /// Bind an index buffer into the global element state
    fn bind_index_buffer(&mut self, buffer: &dyn IndexBuffer);

    /// Draw `count` indices (indexed) or vertices (non-indexed)
    fn draw(&mut self, mode: DrawMode, count: u32, indexed: bool);

    /// Set a float uniform; `false` if the program lacks it
    fn set_uniform_float(&mut self, program: ProgramHandle, name: &str, value: f32) -> bool;

    /// Set a vec3 uniform; `false` if the program lacks it
    fn set_uniform_vec3(&mut self, program: ProgramHandle, name: &str, value: Vec3) -> bool;

    /// Set a vec4 uniform; `false` if the program lacks it
    fn set_uniform_vec4(&mut self, program: ProgramHandle, name: &str, value: Vec4) -> bool;

    /// Set a mat4 uniform; `false` if the program lacks it
    fn set_uniform_mat4(&mut self, program: ProgramHandle, name: &str, value: Mat4) -> bool;

    /// Bind a texture to a unit and point a sampler uniform at it
    fn set_texture(
        &mut self,
        program: ProgramHandle,
        texture: TextureHandle,
        unit: u32,
        name: &str,
    ) -> bool;

    /// Active view matrix
    fn view_matrix(&self) -> Mat4;

    /// Active projection matrix
    fn projection_matrix(&self) -> Mat4;

    /// Replace the active view matrix
    fn set_view_matrix(&mut self, view: Mat4);

    /// Replace the active projection matrix
    fn set_projection_matrix(&mut self, projection: Mat4);
}
