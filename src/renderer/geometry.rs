//! Geometry resource
//!
//! Owns CPU-side mesh data plus the uploaded GPU index buffer. Regeneration
//! always clears first, so the previous index buffer is released before a
//! new one is created and a stale handle never outlives its data.

use glam::{Vec2, Vec3};

use crate::renderer::device::{DrawMode, IndexBuffer, ProgramHandle, RenderDevice};
use crate::renderer::mesh::{self, MeshData, Vertex};

/// A renderable mesh with an optional uploaded index buffer
#[derive(Debug)]
pub struct Geometry {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    index_buffer: Option<Box<dyn IndexBuffer>>,
    draw_mode: DrawMode,
}

impl Geometry {
    /// Create an empty geometry
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
            index_buffer: None,
            draw_mode: DrawMode::Triangles,
        }
    }

    /// Drop all vertex and index data, releasing the GPU index buffer
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.index_buffer = None;
    }

    /// Rebuild as a UV sphere (triangle strip, non-indexed)
    pub fn gen_sphere(&mut self, radii: Vec3, offset: Vec3, rings: u32, segments: u32) {
        let data = mesh::sphere(radii, offset, rings, segments);
        self.replace(data, DrawMode::TriangleStrip);
    }

    /// Rebuild as an axis-aligned box, uploading its index buffer
    pub fn gen_cube(&mut self, device: &mut dyn RenderDevice, size: Vec3, offset: Vec3) {
        let data = mesh::cube(size, offset);
        self.replace_indexed(device, data, DrawMode::Triangles);
    }

    /// Rebuild as a single quad facing +Z (non-indexed)
    pub fn gen_quad(&mut self, size: Vec2, offset: Vec3) {
        let data = mesh::quad(size, offset);
        self.replace(data, DrawMode::Triangles);
    }

    /// Rebuild as a torus, uploading its index buffer
    pub fn gen_torus(
        &mut self,
        device: &mut dyn RenderDevice,
        segments: u32,
        radius: f32,
        fatness: f32,
    ) {
        let data = mesh::torus(segments, radius, fatness);
        self.replace_indexed(device, data, DrawMode::Triangles);
    }

    /// Rebuild as a trefoil knot, uploading its index buffer
    pub fn gen_knot(
        &mut self,
        device: &mut dyn RenderDevice,
        slices: u32,
        stacks: u32,
        radius: f32,
    ) {
        let data = mesh::knot(slices, stacks, radius);
        self.replace_indexed(device, data, DrawMode::Triangles);
    }

    /// Bind the vertex layout and data to a program
    pub fn bind_attribs(&self, device: &mut dyn RenderDevice, program: ProgramHandle) {
        device.bind_vertex_layout(program, &self.vertices);
    }

    /// Issue the draw for this geometry
    ///
    /// Indexed when an index buffer is present, otherwise an array draw
    /// over the vertex count. The index-buffer binding stays in place
    /// afterwards; the last drawn geometry owns the global bind state.
    pub fn draw(&self, device: &mut dyn RenderDevice) {
        match &self.index_buffer {
            Some(buffer) => {
                device.bind_index_buffer(buffer.as_ref());
                device.draw(self.draw_mode, self.indices.len() as u32, true);
            }
            None => device.draw(self.draw_mode, self.vertices.len() as u32, false),
        }
    }

    /// Vertex data in interleaved layout
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Index data (empty for non-indexed geometry)
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    /// Number of indices
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Primitive mode the data was generated for
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Whether an index buffer has been uploaded
    pub fn is_uploaded(&self) -> bool {
        self.index_buffer.is_some()
    }

    /// Whether the geometry holds no vertices
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    fn replace(&mut self, data: MeshData, draw_mode: DrawMode) {
        self.clear();
        self.vertices = data.vertices;
        self.indices = data.indices;
        self.draw_mode = draw_mode;
        log::debug!(
            "geometry rebuilt: {} vertices, {} indices",
            self.vertices.len(),
            self.indices.len()
        );
    }

    fn replace_indexed(
        &mut self,
        device: &mut dyn RenderDevice,
        data: MeshData,
        draw_mode: DrawMode,
    ) {
        self.clear();
        if !data.indices.is_empty() {
            self.index_buffer = Some(device.create_index_buffer(&data.indices));
        }
        self.vertices = data.vertices;
        self.indices = data.indices;
        self.draw_mode = draw_mode;
        log::debug!(
            "geometry rebuilt: {} vertices, {} indices",
            self.vertices.len(),
            self.indices.len()
        );
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new()
    }
}
