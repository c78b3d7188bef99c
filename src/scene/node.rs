//! Scenegraph nodes and traversals
//!
//! Nodes form an ownership tree: parents hold strong handles to their
//! children, children keep weak back-references. Update and render both
//! walk the tree depth first in insertion order, so per-frame behavior is
//! deterministic for a given topology.

use std::cell::{Ref, RefCell, RefMut};
use std::f32::consts::TAU;
use std::rc::{Rc, Weak};

use glam::{Mat4, Vec3};
use smallvec::SmallVec;

use crate::renderer::{Geometry, Material, ProgramHandle, RenderDevice};
use crate::scene::camera::Camera;

/// Errors from scene-graph structural edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// Node already has a parent
    AlreadyAttached(String),
    /// Node attached to itself
    AttachToSelf(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyAttached(name) => write!(f, "node '{name}' already has a parent"),
            Self::AttachToSelf(name) => write!(f, "cannot attach node '{name}' to itself"),
        }
    }
}

impl std::error::Error for SceneError {}

/// What a node contributes to rendering
#[derive(Debug)]
pub enum NodeKind {
    /// Pure transform; contributes nothing itself
    Group,
    /// Viewpoint carrying projection state
    Camera(Camera),
    /// Drawable geometry with an optional material
    Renderable {
        geometry: Rc<RefCell<Geometry>>,
        material: Option<Rc<Material>>,
    },
}

/// A node in the scene hierarchy
///
/// Carries the local transform, a per-tick velocity, an axis-angle spin
/// state, a bounding-radius hint, and an optional name. The world transform
/// is never cached: it is the parent chain's product, recomputed on demand.
#[derive(Debug)]
pub struct Node {
    local: Mat4,
    parent: Weak<RefCell<Node>>,
    children: SmallVec<[NodeHandle; 8]>,
    velocity: Vec3,
    rotation_axis: Vec3,
    rotation_angle: f32,
    rotation_speed: f32,
    radius: f32,
    name: String,
    kind: NodeKind,
}

impl Node {
    /// Create an unnamed group node
    pub fn new() -> Self {
        Self::with_kind(NodeKind::Group)
    }

    /// Create a named group node
    pub fn with_name(name: impl Into<String>) -> Self {
        let mut node = Self::new();
        node.name = name.into();
        node
    }

    /// Create a camera node
    pub fn camera(camera: Camera) -> Self {
        Self::with_kind(NodeKind::Camera(camera))
    }

    /// Create a renderable node sharing a geometry and optional material
    pub fn renderable(geometry: Rc<RefCell<Geometry>>, material: Option<Rc<Material>>) -> Self {
        Self::with_kind(NodeKind::Renderable { geometry, material })
    }

    fn with_kind(kind: NodeKind) -> Self {
        Self {
            local: Mat4::IDENTITY,
            parent: Weak::new(),
            children: SmallVec::new(),
            velocity: Vec3::ZERO,
            rotation_axis: Vec3::NEG_Z,
            rotation_angle: 0.0,
            rotation_speed: 0.0,
            radius: 1.0,
            name: String::new(),
            kind,
        }
    }

    /// Wrap into a shareable handle
    pub fn into_handle(self) -> NodeHandle {
        NodeHandle::new(self)
    }

    /// Node name (empty when unnamed)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the node
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Local transform matrix
    pub fn local_matrix(&self) -> Mat4 {
        self.local
    }

    /// Replace the local transform wholesale
    pub fn set_local_matrix(&mut self, local: Mat4) {
        self.local = local;
    }

    /// Position read from the local translation column
    pub fn position(&self) -> Vec3 {
        self.local.col(3).truncate()
    }

    /// Write the local translation column
    pub fn set_position(&mut self, position: Vec3) {
        self.local.w_axis = position.extend(1.0);
    }

    /// Velocity in parent space, integrated once per update tick
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Set the velocity
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Bounding-sphere radius hint
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Set the bounding-sphere radius hint
    pub fn set_radius(&mut self, radius: f32) {
        self.radius = radius;
    }

    /// Spin axis (unit length)
    pub fn rotation_axis(&self) -> Vec3 {
        self.rotation_axis
    }

    /// Current spin angle in radians
    pub fn rotation_angle(&self) -> f32 {
        self.rotation_angle
    }

    /// Spin rate in radians per second
    pub fn rotation_speed(&self) -> f32 {
        self.rotation_speed
    }

    /// Set the spin rate; the local matrix is rebuilt on the next tick
    pub fn set_rotation_speed(&mut self, speed: f32) {
        self.rotation_speed = speed;
    }

    /// Set the spin axis, rebuilding the rotation immediately
    pub fn set_rotation_axis(&mut self, axis: Vec3) {
        self.rotate_axis_angle(axis, self.rotation_angle);
    }

    /// Set the spin angle, rebuilding the rotation immediately
    pub fn set_rotation_angle(&mut self, angle: f32) {
        self.rotate_axis_angle(self.rotation_axis, angle);
    }

    /// Replace the rotation part of the local matrix, preserving position
    pub fn rotate_axis_angle(&mut self, axis: Vec3, angle: f32) {
        self.rotation_axis = axis.normalize();
        self.rotation_angle = angle;
        let position = self.position();
        self.local = Mat4::from_axis_angle(self.rotation_axis, angle);
        self.set_position(position);
    }

    /// Place the node at `from` looking toward `at` (+Y up)
    ///
    /// Also clears the spin state, so a previously configured rotation does
    /// not overwrite the aimed orientation on the next update tick.
    pub fn look_at(&mut self, from: Vec3, at: Vec3) {
        self.local = Mat4::look_at_rh(from, at, Vec3::Y).inverse();
        self.rotation_axis = Vec3::NEG_Z;
        self.rotation_angle = 0.0;
        self.rotation_speed = 0.0;
    }

    /// View matrix for this node's viewpoint (inverse world transform)
    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    /// World transform: parent world times local, recomputed on demand
    pub fn world_matrix(&self) -> Mat4 {
        match self.parent.upgrade() {
            Some(parent) => parent.borrow().world_matrix() * self.local,
            None => self.local,
        }
    }

    /// Strong handle to the parent, if attached
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent.upgrade().map(NodeHandle)
    }

    /// Child handles in insertion order
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// Node kind
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Camera state if this is a camera node
    pub fn as_camera(&self) -> Option<&Camera> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Mutable camera state if this is a camera node
    pub fn as_camera_mut(&mut self) -> Option<&mut Camera> {
        match &mut self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Shared geometry if this is a renderable node
    pub fn geometry(&self) -> Option<&Rc<RefCell<Geometry>>> {
        match &self.kind {
            NodeKind::Renderable { geometry, .. } => Some(geometry),
            _ => None,
        }
    }

    /// Shared material if this renderable carries one
    pub fn material(&self) -> Option<&Rc<Material>> {
        match &self.kind {
            NodeKind::Renderable { material, .. } => material.as_ref(),
            _ => None,
        }
    }

    /// Advance velocity and spin by one tick
    ///
    /// Position and rotation are independent: the position survives the
    /// rotation rebuild because it is read before and written after.
    fn integrate(&mut self, dt: f32) {
        let mut position = self.position();
        position += self.velocity * dt;

        if self.rotation_speed != 0.0 {
            self.local = Mat4::from_axis_angle(self.rotation_axis, self.rotation_angle);
            self.rotation_angle += self.rotation_speed * dt;
            self.rotation_angle = wrap_angle(self.rotation_angle);
        }

        self.set_position(position);
    }

    /// Emit this node's draw if it is renderable
    fn emit(&self, device: &mut dyn RenderDevice, program: ProgramHandle) {
        if let NodeKind::Renderable { geometry, material } = &self.kind {
            let geometry = geometry.borrow();
            geometry.bind_attribs(device, program);

            let world = self.world_matrix();
            device.set_uniform_mat4(program, "modelMatrix", world);
            let mvp = device.projection_matrix() * device.view_matrix() * world;
            device.set_uniform_mat4(program, "modelViewProjectionMatrix", mvp);

            if let Some(material) = material {
                material.apply(device, program);
            }

            geometry.draw(device);
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap an accumulated spin angle back into (-2pi, 2pi)
fn wrap_angle(mut angle: f32) -> f32 {
    while angle > TAU {
        angle -= TAU;
    }
    while angle < -TAU {
        angle += TAU;
    }
    angle
}

/// Shared handle to a node
///
/// Cloning the handle clones the reference, not the node. Traversals and
/// structural edits live here because they need the handle identity as well
/// as the node data.
#[derive(Debug, Clone)]
pub struct NodeHandle(Rc<RefCell<Node>>);

impl NodeHandle {
    /// Wrap a node into a shareable handle
    pub fn new(node: Node) -> Self {
        Self(Rc::new(RefCell::new(node)))
    }

    /// Borrow the node immutably
    pub fn borrow(&self) -> Ref<'_, Node> {
        self.0.borrow()
    }

    /// Borrow the node mutably
    pub fn borrow_mut(&self) -> RefMut<'_, Node> {
        self.0.borrow_mut()
    }

    /// Identity comparison: same node, not equal data
    pub fn ptr_eq(&self, other: &NodeHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Attach a child under this node
    ///
    /// The child keeps a weak back-reference for world-transform
    /// composition; reparenting an attached node is not supported.
    ///
    /// # Errors
    ///
    /// Fails if the child already has a parent or is this node itself.
    pub fn add_node(&self, child: NodeHandle) -> Result<(), SceneError> {
        if self.ptr_eq(&child) {
            return Err(SceneError::AttachToSelf(child.borrow().name.clone()));
        }
        {
            let mut node = child.borrow_mut();
            if node.parent.upgrade().is_some() {
                return Err(SceneError::AlreadyAttached(node.name.clone()));
            }
            node.parent = Rc::downgrade(&self.0);
            log::trace!("attached node '{}'", node.name);
        }
        self.0.borrow_mut().children.push(child);
        Ok(())
    }

    /// Run one update tick over this subtree, parent before children
    pub fn update(&self, dt: f32) {
        self.0.borrow_mut().integrate(dt);
        let node = self.0.borrow();
        for child in &node.children {
            child.update(dt);
        }
    }

    /// Render this subtree in pre-order
    ///
    /// Groups and cameras contribute nothing themselves; renderables draw
    /// before their children. Device bind state persists across nodes, so
    /// the last drawn geometry wins.
    pub fn render(&self, device: &mut dyn RenderDevice, program: ProgramHandle) {
        let node = self.0.borrow();
        node.emit(device, program);
        for child in &node.children {
            child.render(device, program);
        }
    }

    /// Find the first node named `name` in pre-order, starting here
    pub fn find_node(&self, name: &str) -> Option<NodeHandle> {
        if self.0.borrow().name == name {
            return Some(self.clone());
        }
        let node = self.0.borrow();
        for child in &node.children {
            if let Some(found) = child.find_node(name) {
                return Some(found);
            }
        }
        None
    }

    /// World transform of this node
    pub fn world_matrix(&self) -> Mat4 {
        self.0.borrow().world_matrix()
    }
}
