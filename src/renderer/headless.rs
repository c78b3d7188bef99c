//! Headless render device
//!
//! Records every draw, uniform write, and texture bind so tests and CI can
//! assert on the traffic a traversal produced without a GPU. Uniform
//! lookups succeed for any non-null program, mirroring how a GL backend
//! reports locations.

use std::cell::Cell;
use std::rc::Rc;

use glam::{Mat4, Vec3, Vec4};
use rustc_hash::FxHashMap;

use crate::renderer::device::{
    DrawMode, IndexBuffer, ProgramHandle, RenderDevice, TextureHandle,
};
use crate::renderer::mesh::Vertex;

/// One recorded draw call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub mode: DrawMode,
    pub count: u32,
    pub indexed: bool,
}

/// Index buffer handed out by [`HeadlessDevice`]
///
/// Dropping the handle releases its slot in the device's live-buffer count,
/// the same lifecycle a real backend gives its GPU buffers.
#[derive(Debug)]
pub struct HeadlessIndexBuffer {
    id: u32,
    len: u32,
    live: Rc<Cell<u32>>,
}

impl IndexBuffer for HeadlessIndexBuffer {
    fn id(&self) -> u32 {
        self.id
    }

    fn len(&self) -> u32 {
        self.len
    }
}

impl Drop for HeadlessIndexBuffer {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
        log::trace!("released index buffer {}", self.id);
    }
}

/// Recording in-memory implementation of [`RenderDevice`]
#[derive(Debug)]
pub struct HeadlessDevice {
    view: Mat4,
    projection: Mat4,
    next_buffer_id: u32,
    live_buffers: Rc<Cell<u32>>,
    bound_program: Option<ProgramHandle>,
    bound_vertex_count: usize,
    bound_index_buffer: Option<u32>,
    draw_calls: Vec<DrawCall>,
    float_uniforms: FxHashMap<String, f32>,
    vec3_uniforms: FxHashMap<String, Vec3>,
    vec4_uniforms: FxHashMap<String, Vec4>,
    mat4_uniforms: FxHashMap<String, Mat4>,
    texture_binds: Vec<(u32, TextureHandle, String)>,
}

impl HeadlessDevice {
    /// Create a device with identity view and projection
    pub fn new() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            next_buffer_id: 1,
            live_buffers: Rc::new(Cell::new(0)),
            bound_program: None,
            bound_vertex_count: 0,
            bound_index_buffer: None,
            draw_calls: Vec::new(),
            float_uniforms: FxHashMap::default(),
            vec3_uniforms: FxHashMap::default(),
            vec4_uniforms: FxHashMap::default(),
            mat4_uniforms: FxHashMap::default(),
            texture_binds: Vec::new(),
        }
    }

    /// Number of index buffers created and not yet dropped
    pub fn live_index_buffers(&self) -> u32 {
        self.live_buffers.get()
    }

    /// All draws recorded so far, in call order
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Program the vertex layout was last bound to
    pub fn bound_program(&self) -> Option<ProgramHandle> {
        self.bound_program
    }

    /// Vertex count from the last layout bind
    pub fn bound_vertex_count(&self) -> usize {
        self.bound_vertex_count
    }

    /// Id of the currently bound index buffer
    pub fn bound_index_buffer(&self) -> Option<u32> {
        self.bound_index_buffer
    }

    /// Latest value written to a float uniform
    pub fn float_uniform(&self, name: &str) -> Option<f32> {
        self.float_uniforms.get(name).copied()
    }

    /// Latest value written to a vec3 uniform
    pub fn vec3_uniform(&self, name: &str) -> Option<Vec3> {
        self.vec3_uniforms.get(name).copied()
    }

    /// Latest value written to a vec4 uniform
    pub fn vec4_uniform(&self, name: &str) -> Option<Vec4> {
        self.vec4_uniforms.get(name).copied()
    }

    /// Latest value written to a mat4 uniform
    pub fn mat4_uniform(&self, name: &str) -> Option<Mat4> {
        self.mat4_uniforms.get(name).copied()
    }

    /// Texture binds in call order as (unit, texture, uniform name)
    pub fn texture_binds(&self) -> &[(u32, TextureHandle, String)] {
        &self.texture_binds
    }

    fn visible(program: ProgramHandle) -> bool {
        program != ProgramHandle::NULL
    }
}

impl RenderDevice for HeadlessDevice {
    fn create_index_buffer(&mut self, indices: &[u32]) -> Box<dyn IndexBuffer> {
        let id = self.next_buffer_id;
        self.next_buffer_id += 1;
        self.live_buffers.set(self.live_buffers.get() + 1);
        log::trace!("created index buffer {} ({} indices)", id, indices.len());
        Box::new(HeadlessIndexBuffer {
            id,
            len: indices.len() as u32,
            live: Rc::clone(&self.live_buffers),
        })
    }

    fn bind_vertex_layout(&mut self, program: ProgramHandle, vertices: &[Vertex]) {
        self.bound_program = Some(program);
        self.bound_vertex_count = vertices.len();
    }

    fn bind_index_buffer(&mut self, buffer: &dyn IndexBuffer) {
        self.bound_index_buffer = Some(buffer.id());
    }

    fn draw(&mut self, mode: DrawMode, count: u32, indexed: bool) {
        self.draw_calls.push(DrawCall {
            mode,
            count,
            indexed,
        });
    }

    fn set_uniform_float(&mut self, program: ProgramHandle, name: &str, value: f32) -> bool {
        if !Self::visible(program) {
            return false;
        }
        self.float_uniforms.insert(name.to_string(), value);
        true
    }

    fn set_uniform_vec3(&mut self, program: ProgramHandle, name: &str, value: Vec3) -> bool {
        if !Self::visible(program) {
            return false;
        }
        self.vec3_uniforms.insert(name.to_string(), value);
        true
    }

    fn set_uniform_vec4(&mut self, program: ProgramHandle, name: &str, value: Vec4) -> bool {
        if !Self::visible(program) {
            return false;
        }
        self.vec4_uniforms.insert(name.to_string(), value);
        true
    }

    fn set_uniform_mat4(&mut self, program: ProgramHandle, name: &str, value: Mat4) -> bool {
        if !Self::visible(program) {
            return false;
        }
        self.mat4_uniforms.insert(name.to_string(), value);
        true
    }

    fn set_texture(
        &mut self,
        program: ProgramHandle,
        texture: TextureHandle,
        unit: u32,
        name: &str,
    ) -> bool {
        if !Self::visible(program) {
            return false;
        }
        self.texture_binds.push((unit, texture, name.to_string()));
        true
    }

    fn view_matrix(&self) -> Mat4 {
        self.view
    }

    fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    fn set_view_matrix(&mut self, view: Mat4) {
        self.view = view;
    }

    fn set_projection_matrix(&mut self, projection: Mat4) {
        self.projection = projection;
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_buffer_count_follows_handle_drops() {
        let mut device = HeadlessDevice::new();
        let first = device.create_index_buffer(&[0, 1, 2]);
        let second = device.create_index_buffer(&[0, 1, 2, 2, 3, 0]);
        assert_eq!(device.live_index_buffers(), 2);
        assert_eq!(first.len(), 3);
        assert_eq!(second.len(), 6);

        drop(first);
        assert_eq!(device.live_index_buffers(), 1);
        drop(second);
        assert_eq!(device.live_index_buffers(), 0);
    }

    #[test]
    fn test_buffer_ids_are_unique() {
        let mut device = HeadlessDevice::new();
        let first = device.create_index_buffer(&[0]);
        let second = device.create_index_buffer(&[0]);
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_null_program_uniforms_miss() {
        let mut device = HeadlessDevice::new();
        assert!(!device.set_uniform_float(ProgramHandle::NULL, "time", 1.0));
        assert_eq!(device.float_uniform("time"), None);

        assert!(device.set_uniform_float(ProgramHandle(3), "time", 1.0));
        assert_eq!(device.float_uniform("time"), Some(1.0));
    }

    #[test]
    fn test_draw_and_bind_recording() {
        let mut device = HeadlessDevice::new();
        let buffer = device.create_index_buffer(&[0, 1, 2]);

        device.bind_vertex_layout(ProgramHandle(1), &[]);
        device.bind_index_buffer(buffer.as_ref());
        device.draw(DrawMode::Triangles, 3, true);
        device.draw(DrawMode::TriangleStrip, 12, false);

        assert_eq!(device.bound_program(), Some(ProgramHandle(1)));
        assert_eq!(device.bound_index_buffer(), Some(buffer.id()));
        assert_eq!(
            device.draw_calls(),
            [
                DrawCall {
                    mode: DrawMode::Triangles,
                    count: 3,
                    indexed: true
                },
                DrawCall {
                    mode: DrawMode::TriangleStrip,
                    count: 12,
                    indexed: false
                }
            ]
        );
    }

    #[test]
    fn test_texture_binds_record_in_order() {
        let mut device = HeadlessDevice::new();
        assert!(device.set_texture(ProgramHandle(1), TextureHandle(7), 0, "albedo"));
        assert!(!device.set_texture(ProgramHandle::NULL, TextureHandle(8), 1, "normalMap"));
        assert_eq!(device.texture_binds().len(), 1);
        assert_eq!(device.texture_binds()[0].1, TextureHandle(7));
    }
}
