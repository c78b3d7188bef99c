//! Per-frame orchestration
//!
//! The driver owns the frame clock and the scene root. Each frame it ticks
//! the clock, updates the scene, publishes the active camera's matrices to
//! the device, and renders the tree.

use crate::core::time::Time;
use crate::renderer::{ProgramHandle, RenderDevice};
use crate::scene::NodeHandle;

/// Default name the driver looks up the active camera by
const DEFAULT_CAMERA: &str = "camera";

/// Drives update and render over a scene tree
#[derive(Debug)]
pub struct FrameDriver {
    time: Time,
    scene: NodeHandle,
    camera_name: String,
}

impl FrameDriver {
    /// Create a driver around a scene root
    pub fn new(scene: NodeHandle) -> Self {
        log::info!("frame driver initialized");
        Self {
            time: Time::new(),
            scene,
            camera_name: String::from(DEFAULT_CAMERA),
        }
    }

    /// Use a different node name for the active camera lookup
    #[must_use]
    pub fn with_camera(mut self, name: impl Into<String>) -> Self {
        self.camera_name = name.into();
        self
    }

    /// Scene root handle
    pub fn scene(&self) -> &NodeHandle {
        &self.scene
    }

    /// Frame clock
    pub fn time(&self) -> &Time {
        &self.time
    }

    /// Run one wall-clock frame
    pub fn frame(&mut self, device: &mut dyn RenderDevice, program: ProgramHandle) {
        self.time.update();
        let dt = self.time.delta_seconds();
        self.run_frame(device, program, dt);
    }

    /// Run one frame with an explicit delta, update before render
    pub fn run_frame(&mut self, device: &mut dyn RenderDevice, program: ProgramHandle, dt: f32) {
        self.scene.update(dt);

        if let Some(camera) = self.scene.find_node(&self.camera_name) {
            let node = camera.borrow();
            if let Some(state) = node.as_camera() {
                device.set_view_matrix(node.view_matrix());
                device.set_projection_matrix(state.projection_matrix());
            }
        } else {
            log::trace!("no camera node named '{}'", self.camera_name);
        }

        self.scene.render(device, program);
    }
}
