//! sceneframe: a retained-mode scenegraph over a pluggable render device
//!
//! The pieces fit together like this:
//!
//! - [`scene`]: the node hierarchy, cameras, and update/render traversals
//! - [`renderer`]: the device trait, procedural meshes, geometry, materials
//! - [`core`]: frame timing and the driver that runs a scene each frame
//!
//! Construction is explicit: build geometry against a device, share it
//! between nodes with reference-counted handles, attach nodes into a tree,
//! and let a [`core::FrameDriver`] tick the whole thing.

pub mod core;
pub mod renderer;
pub mod scene;

pub use glam;

/// Commonly used types, for glob import in demos and tests
pub mod prelude {
    pub use crate::core::{FrameDriver, Time};
    pub use crate::renderer::{
        DrawCall, DrawMode, Geometry, HeadlessDevice, IndexBuffer, Material, MeshData,
        ProgramHandle, RenderDevice, TextureHandle, Vertex,
    };
    pub use crate::scene::{Camera, Node, NodeHandle, NodeKind, SceneError};
    pub use glam::{Mat4, Vec2, Vec3, Vec4};
}
