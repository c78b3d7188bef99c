//! Rendering: device abstraction, mesh generation, geometry, and materials

mod device;
mod geometry;
mod headless;
mod material;
mod mesh;

pub use device::{DrawMode, IndexBuffer, ProgramHandle, RenderDevice, TextureHandle};
pub use geometry::Geometry;
pub use headless::{DrawCall, HeadlessDevice, HeadlessIndexBuffer};
pub use material::Material;
pub use mesh::{MeshData, Vertex, cube, evaluate_trefoil, knot, quad, sphere, torus};
