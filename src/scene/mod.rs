//! Scene hierarchy: nodes, cameras, and the traversals that drive them

mod camera;
mod node;

pub use camera::Camera;
pub use node::{Node, NodeHandle, NodeKind, SceneError};
