//! The scene graph: node ownership, hierarchy mutation, and the per-frame
//! animate → register → draw pipeline.

use std::sync::Arc;

use glam::{Affine3A, Mat4, Vec3, Vec4};
use slotmap::SlotMap;
use smallvec::SmallVec;

use crate::errors::{ArborError, Result};
use crate::render::backend::{RenderBackend, TransformSlot};
use crate::render::culling;
use crate::render::queue::{RenderPass, RenderQueue};
use crate::resources::cache::{self, MeshCache, MeshLoader, SharedMeshCache};
use crate::resources::primitives::{CubeMeshVariant, create_cube_mesh};
use crate::resources::{AnimatedMesh, Material, MaterialType, Mesh};
use crate::scene::NodeKey;
use crate::scene::animated::AnimatedMeshState;
use crate::scene::camera::{Camera, Frustum};
use crate::scene::light::Light;
use crate::scene::node::{
    CullingMode, DebugFlags, MeshState, NodeKind, NodeType, ROOT_ID, SceneNode,
};
use crate::scene::transform::Transform;

/// Owner of one renderable scene.
///
/// Holds the node arena rooted at a permanent, never-rendered root node, the
/// active-camera reference, the process-shared mesh cache, and the
/// render-pass buckets. [`SceneGraph::draw_all`] runs one frame.
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    root: NodeKey,

    active_camera: Option<NodeKey>,

    mesh_cache: SharedMeshCache,
    mesh_loaders: Vec<Box<dyn MeshLoader>>,

    queue: RenderQueue,
    deletion_queue: Vec<NodeKey>,

    shadow_color: Vec4,
    ambient_light: Vec4,

    current_pass: RenderPass,
    /// World position of the active camera, captured once per frame as the
    /// reference point for transparent-pass distance sorting.
    cam_world_pos: Vec3,
}

impl SceneGraph {
    /// Creates a graph with its own fresh mesh cache.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mesh_cache(MeshCache::new_shared())
    }

    /// Creates a graph sharing `mesh_cache` with other graphs in the
    /// process.
    #[must_use]
    pub fn with_mesh_cache(mesh_cache: SharedMeshCache) -> Self {
        let mut nodes = SlotMap::with_key();

        let mut root_node = SceneNode::new(NodeKind::Empty);
        root_node.id = ROOT_ID;
        root_node.name = "root".to_string();
        let root = nodes.insert(root_node);

        Self {
            nodes,
            root,
            active_camera: None,
            mesh_cache,
            mesh_loaders: Vec::new(),
            queue: RenderQueue::new(),
            deletion_queue: Vec::new(),
            shadow_color: Vec4::new(0.0, 0.0, 0.0, 150.0 / 255.0),
            ambient_light: Vec4::new(0.0, 0.0, 0.0, 0.0),
            current_pass: RenderPass::None,
            cam_world_pos: Vec3::ZERO,
        }
    }

    // ========================================================================
    // Node construction
    // ========================================================================

    fn insert_node(&mut self, mut node: SceneNode, parent: Option<NodeKey>) -> NodeKey {
        let mut parent_key = parent.unwrap_or(self.root);
        if !self.nodes.contains_key(parent_key) {
            log::error!("Parent node not found, attaching to the scene root");
            parent_key = self.root;
        }

        node.parent = Some(parent_key);
        let key = self.nodes.insert(node);
        if let Some(p) = self.nodes.get_mut(parent_key) {
            p.children.push(key);
        }
        key
    }

    /// Adds a pure grouping node.
    pub fn add_empty_node(&mut self, parent: Option<NodeKey>, id: i32) -> NodeKey {
        let mut node = SceneNode::new(NodeKind::Empty);
        node.id = id;
        self.insert_node(node, parent)
    }

    /// Adds a static mesh node. The node copies the mesh parts' materials
    /// and takes the mesh's bounding box.
    pub fn add_mesh_node(
        &mut self,
        mesh: Arc<Mesh>,
        parent: Option<NodeKey>,
        id: i32,
        transform: Transform,
    ) -> NodeKey {
        let mut node = SceneNode::new(NodeKind::Mesh(MeshState {
            mesh: Some(mesh.clone()),
            read_only_materials: false,
        }));
        node.id = id;
        node.transform = transform;
        node.bounding_box = mesh.bounding_box;
        node.materials = mesh.parts.iter().map(|p| p.material.clone()).collect();
        self.insert_node(node, parent)
    }

    /// Adds a cube primitive node built by the geometry creator.
    pub fn add_cube_node(
        &mut self,
        size: Vec3,
        variant: CubeMeshVariant,
        parent: Option<NodeKey>,
        id: i32,
        transform: Transform,
    ) -> NodeKey {
        let mesh = Arc::new(create_cube_mesh(size, variant));
        self.add_mesh_node(mesh, parent, id, transform)
    }

    /// Adds a camera node, optionally making it the active camera.
    pub fn add_camera_node(
        &mut self,
        camera: Camera,
        parent: Option<NodeKey>,
        id: i32,
        transform: Transform,
        make_active: bool,
    ) -> NodeKey {
        let mut node = SceneNode::new(NodeKind::Camera(Box::new(camera)));
        node.id = id;
        node.name = "Camera".to_string();
        node.transform = transform;
        // Cameras are positions, not volumes.
        node.culling = CullingMode::empty();
        let key = self.insert_node(node, parent);
        if make_active {
            self.active_camera = Some(key);
        }
        key
    }

    /// Adds a light node.
    pub fn add_light_node(
        &mut self,
        light: Light,
        parent: Option<NodeKey>,
        id: i32,
        transform: Transform,
    ) -> NodeKey {
        let mut node = SceneNode::new(NodeKind::Light(light));
        node.id = id;
        node.name = "Light".to_string();
        node.transform = transform;
        node.culling = CullingMode::empty();
        self.insert_node(node, parent)
    }

    /// Adds an animated mesh node. Materials are copied from the first
    /// frame's parts; the bounding box starts as the whole clip's box and
    /// tracks the resolved frame during animation.
    pub fn add_animated_mesh_node(
        &mut self,
        mesh: Arc<AnimatedMesh>,
        parent: Option<NodeKey>,
        id: i32,
        transform: Transform,
    ) -> NodeKey {
        let state = AnimatedMeshState::new(mesh.clone());
        let mut node = SceneNode::new(NodeKind::AnimatedMesh(Box::new(state)));
        node.id = id;
        node.transform = transform;
        node.bounding_box = mesh.bounding_box;
        if let Some(first) = mesh.frames.first() {
            node.materials = first.parts.iter().map(|p| p.material.clone()).collect();
        }
        self.insert_node(node, parent)
    }

    // ========================================================================
    // Hierarchy access & mutation
    // ========================================================================

    /// The permanent root node.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeKey {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    #[inline]
    #[must_use]
    pub fn get_node_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Number of nodes including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether `ancestor` lies on the parent chain of `node`.
    #[must_use]
    pub fn is_ancestor_of(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut current = self.nodes.get(node).and_then(|n| n.parent);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.nodes.get(key).and_then(|n| n.parent);
        }
        false
    }

    /// Moves `child` under `new_parent` without touching its local
    /// transform.
    ///
    /// Rejected as [`ArborError::InvalidHierarchyOperation`] when the target
    /// is the child itself or one of its descendants, or when the child is
    /// the root — silently corrupting the traversal is not an option.
    pub fn attach(&mut self, child: NodeKey, new_parent: NodeKey) -> Result<()> {
        if child == new_parent {
            return Err(ArborError::InvalidHierarchyOperation(
                "cannot attach a node to itself",
            ));
        }
        if child == self.root {
            return Err(ArborError::InvalidHierarchyOperation(
                "the root node cannot be reparented",
            ));
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(new_parent) {
            return Err(ArborError::NodeNotFound);
        }
        if self.is_ancestor_of(child, new_parent) {
            return Err(ArborError::InvalidHierarchyOperation(
                "cannot attach a node to one of its descendants",
            ));
        }

        self.detach_from_parent(child);

        if let Some(p) = self.nodes.get_mut(new_parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(new_parent);
            c.transform.mark_dirty();
        }
        Ok(())
    }

    fn detach_from_parent(&mut self, child: NodeKey) {
        let old_parent = self.nodes.get(child).and_then(|n| n.parent);
        if let Some(p) = old_parent {
            if let Some(parent) = self.nodes.get_mut(p) {
                parent.children.retain(|&k| k != child);
            }
        }
    }

    /// Removes a node and its whole subtree immediately. Never valid for
    /// the root. Prefer [`SceneGraph::queue_deletion`] while a frame is in
    /// flight.
    pub fn remove_node(&mut self, key: NodeKey) -> Result<()> {
        if key == self.root {
            return Err(ArborError::InvalidHierarchyOperation(
                "the root node cannot be removed",
            ));
        }
        if !self.nodes.contains_key(key) {
            return Err(ArborError::NodeNotFound);
        }

        self.detach_from_parent(key);

        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(node) = self.nodes.remove(k) {
                if self.active_camera == Some(k) {
                    self.active_camera = None;
                }
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    /// Queues a node for removal after the current frame's draw, so a node
    /// can be discarded from inside traversal hooks without destroying it
    /// mid-iteration. Duplicates and the root are ignored.
    pub fn queue_deletion(&mut self, key: NodeKey) {
        if key == self.root || !self.nodes.contains_key(key) {
            return;
        }
        if !self.deletion_queue.contains(&key) {
            self.deletion_queue.push(key);
        }
    }

    fn flush_deletion_queue(&mut self) {
        if self.deletion_queue.is_empty() {
            return;
        }
        let queued = std::mem::take(&mut self.deletion_queue);
        for key in queued {
            // Keys may have gone stale through an explicit remove_node.
            let _ = self.remove_node(key);
        }
    }

    /// Removes every node except the root and drops the active camera.
    pub fn clear(&mut self) {
        let children = self
            .nodes
            .get(self.root)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            let _ = self.remove_node(child);
        }
        self.active_camera = None;
        self.deletion_queue.clear();
    }

    // ========================================================================
    // Queries
    // ========================================================================

    fn dfs_find(&self, start: NodeKey, pred: impl Fn(&SceneNode) -> bool) -> Option<NodeKey> {
        let mut stack = vec![start];
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            if pred(node) {
                return Some(key);
            }
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        None
    }

    /// First node with the given id, depth-first from `start` (default:
    /// root).
    #[must_use]
    pub fn node_by_id(&self, id: i32, start: Option<NodeKey>) -> Option<NodeKey> {
        self.dfs_find(start.unwrap_or(self.root), |n| n.id == id)
    }

    /// First node with the given name, depth-first from `start`.
    #[must_use]
    pub fn node_by_name(&self, name: &str, start: Option<NodeKey>) -> Option<NodeKey> {
        self.dfs_find(start.unwrap_or(self.root), |n| n.name == name)
    }

    /// Every node of the given type under `start`, in depth-first order.
    #[must_use]
    pub fn nodes_by_type(&self, node_type: NodeType, start: Option<NodeKey>) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack = vec![start.unwrap_or(self.root)];
        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            if node.kind.node_type() == node_type {
                out.push(key);
            }
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    // ========================================================================
    // Cloning
    // ========================================================================

    fn cloned_state(node: &SceneNode) -> SceneNode {
        let mut copy = node.clone();
        copy.parent = None;
        copy.children.clear();
        copy.transform.mark_dirty();
        copy
    }

    /// Deep-copies a single node (not its children) and attaches the copy
    /// under `new_parent` (default: the source's parent). Animation
    /// end-callbacks do not transfer.
    pub fn clone_node(&mut self, src: NodeKey, new_parent: Option<NodeKey>) -> Result<NodeKey> {
        let node = self.nodes.get(src).ok_or(ArborError::NodeNotFound)?;
        let copy = Self::cloned_state(node);
        let parent = new_parent.or(node.parent);
        Ok(self.insert_node(copy, parent))
    }

    /// Clones a node together with its whole subtree.
    pub fn clone_subtree(&mut self, src: NodeKey, new_parent: Option<NodeKey>) -> Result<NodeKey> {
        let root_clone = self.clone_node(src, new_parent)?;

        let mut stack = vec![(src, root_clone)];
        while let Some((src_key, dst_key)) = stack.pop() {
            let children = match self.nodes.get(src_key) {
                Some(n) => n.children.clone(),
                None => continue,
            };
            for child in children {
                if let Ok(child_clone) = self.clone_node(child, Some(dst_key)) {
                    stack.push((child, child_clone));
                }
            }
        }
        Ok(root_clone)
    }

    /// Clones a node of this graph into `target`, attached under `parent`
    /// (default: target's root). Mesh resources stay shared between the
    /// graphs.
    pub fn clone_node_into(
        &self,
        src: NodeKey,
        target: &mut SceneGraph,
        parent: Option<NodeKey>,
    ) -> Result<NodeKey> {
        let node = self.nodes.get(src).ok_or(ArborError::NodeNotFound)?;
        let copy = Self::cloned_state(node);
        Ok(target.insert_node(copy, parent))
    }

    // ========================================================================
    // Active camera & scene state
    // ========================================================================

    /// Makes `camera` the active camera, replacing (and thereby
    /// deactivating) the previous one. `None` leaves the scene without a
    /// camera: nothing gets culled and distance sorts use the origin.
    pub fn set_active_camera(&mut self, camera: Option<NodeKey>) -> Result<()> {
        if let Some(key) = camera {
            let node = self.nodes.get(key).ok_or(ArborError::NodeNotFound)?;
            if !matches!(node.kind, NodeKind::Camera(_)) {
                return Err(ArborError::InvalidNodeKind(
                    "the active camera must be a camera node",
                ));
            }
        }
        self.active_camera = camera;
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn active_camera(&self) -> Option<NodeKey> {
        self.active_camera
    }

    fn active_frustum(&self) -> Option<Frustum> {
        let key = self.active_camera?;
        match &self.nodes.get(key)?.kind {
            NodeKind::Camera(cam) => Some(cam.frustum),
            _ => None,
        }
    }

    pub fn set_shadow_color(&mut self, color: Vec4) {
        self.shadow_color = color;
    }

    #[inline]
    #[must_use]
    pub fn shadow_color(&self) -> Vec4 {
        self.shadow_color
    }

    pub fn set_ambient_light(&mut self, color: Vec4) {
        self.ambient_light = color;
    }

    #[inline]
    #[must_use]
    pub fn ambient_light(&self) -> Vec4 {
        self.ambient_light
    }

    /// The pass currently being drawn; [`RenderPass::None`] outside of
    /// `draw_all`.
    #[inline]
    #[must_use]
    pub fn current_render_pass(&self) -> RenderPass {
        self.current_pass
    }

    /// Pass buckets registered for the frame in flight.
    #[inline]
    #[must_use]
    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    /// Drops everything registered so far without drawing it.
    pub fn clear_registered_nodes(&mut self) {
        self.queue.clear();
    }

    // ========================================================================
    // Mesh resources
    // ========================================================================

    /// The cache shared by every graph created from it.
    #[inline]
    #[must_use]
    pub fn mesh_cache(&self) -> &SharedMeshCache {
        &self.mesh_cache
    }

    /// Registers a mesh loader. Later registrations take precedence.
    pub fn add_mesh_loader(&mut self, loader: Box<dyn MeshLoader>) {
        self.mesh_loaders.push(loader);
    }

    /// Resolves a mesh by cache name or path, loading it on a cache miss.
    pub fn get_mesh(&mut self, path: &str) -> Result<Arc<AnimatedMesh>> {
        cache::resolve_mesh(&self.mesh_cache, &mut self.mesh_loaders, path)
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Offers a node to the pass scheduler.
    ///
    /// Camera and Light registrations are deduplicated; the drawable passes
    /// cull first and reject invisible nodes. `Automatic` resolves to
    /// Transparent if any material wants a transparent pass (scan stops at
    /// the first hit), Solid otherwise — one bucket per call, nodes that
    /// need both register twice. Returns whether any bucket took the node.
    pub fn register_for_rendering(
        &mut self,
        key: NodeKey,
        pass: RenderPass,
        backend: &dyn RenderBackend,
    ) -> bool {
        let frustum = self.active_frustum();
        let Some(node) = self.nodes.get(key) else {
            return false;
        };

        match pass {
            RenderPass::Camera => self.queue.push_camera(key),
            RenderPass::Light => self.queue.push_light(key),
            RenderPass::Solid => {
                if culling::is_culled(node, key, frustum.as_ref(), backend) {
                    return false;
                }
                let texture = node.material(0).and_then(Material::texture_id);
                self.queue.push_solid(key, texture);
                true
            }
            RenderPass::Shadow => {
                if culling::is_culled(node, key, frustum.as_ref(), backend) {
                    return false;
                }
                self.queue.push_shadow(key);
                true
            }
            RenderPass::Transparent => {
                if culling::is_culled(node, key, frustum.as_ref(), backend) {
                    return false;
                }
                let distance_sq = self.distance_sq_to_camera(node);
                self.queue.push_transparent(key, distance_sq);
                true
            }
            RenderPass::TransparentEffect => {
                if culling::is_culled(node, key, frustum.as_ref(), backend) {
                    return false;
                }
                let distance_sq = self.distance_sq_to_camera(node);
                self.queue.push_transparent_effect(key, distance_sq);
                true
            }
            RenderPass::Gui => {
                if culling::is_culled(node, key, frustum.as_ref(), backend) {
                    return false;
                }
                self.queue.push_gui(key);
                true
            }
            RenderPass::Automatic => {
                if culling::is_culled(node, key, frustum.as_ref(), backend) {
                    return false;
                }
                let mut transparent = false;
                for i in 0..node.material_count() {
                    if let Some(material) = node.material(i) {
                        if backend.needs_transparent_pass(material) {
                            transparent = true;
                            break;
                        }
                    }
                }
                if transparent {
                    let distance_sq = self.distance_sq_to_camera(node);
                    self.queue.push_transparent(key, distance_sq);
                } else {
                    let texture = node.material(0).and_then(Material::texture_id);
                    self.queue.push_solid(key, texture);
                }
                true
            }
            RenderPass::None => false,
        }
    }

    fn distance_sq_to_camera(&self, node: &SceneNode) -> f64 {
        f64::from((node.transform.world_position() - self.cam_world_pos).length_squared())
    }

    // ========================================================================
    // Frame pipeline
    // ========================================================================

    /// Runs one frame: animation pass, camera pre-render, registration
    /// pass, the seven draw passes in fixed order, then deferred deletions.
    ///
    /// Never fails and never panics; bad resources degrade to "renders
    /// nothing". With a [`NullBackend`](crate::render::NullBackend) only
    /// the drawing is skipped — animation and registration side effects
    /// still happen.
    pub fn draw_all(&mut self, backend: &mut dyn RenderBackend, now_ms: u64) {
        // Reset backend transform and material state.
        backend.set_material(&Material::default());
        backend.set_transform(TransformSlot::Projection, &Mat4::IDENTITY);
        backend.set_transform(TransformSlot::View, &Mat4::IDENTITY);
        backend.set_transform(TransformSlot::World, &Mat4::IDENTITY);

        // Animate: transforms top-down, frame cursors, camera matrices.
        self.animate_pass(now_ms);

        // The active camera renders first so culling and distance sorting
        // observe a consistent view.
        self.cam_world_pos = Vec3::ZERO;
        if let Some(cam_key) = self.active_camera {
            self.render_node(cam_key, backend);
            if let Some(node) = self.nodes.get(cam_key) {
                self.cam_world_pos = node.transform.world_position();
            }
        }

        // Let every visible node register itself.
        self.register_pass(backend);

        self.draw_camera_pass(backend);
        self.draw_light_pass(backend);
        self.draw_solid_pass(backend);
        self.draw_shadow_pass(backend);
        self.draw_transparent_passes(backend);
        self.draw_gui_pass(backend);

        self.flush_deletion_queue();
        self.current_pass = RenderPass::None;
    }

    /// Depth-first transform propagation plus per-kind animation hooks.
    ///
    /// Parents are processed before children, so every node composes with
    /// an up-to-date parent world matrix; after this pass
    /// `world == parent.world * local` holds for the whole tree,
    /// irrespective of visibility.
    fn animate_pass(&mut self, now_ms: u64) {
        let mut stack: Vec<(NodeKey, Affine3A, bool)> = Vec::with_capacity(64);
        stack.push((self.root, Affine3A::IDENTITY, false));

        while let Some((key, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(key) else {
                continue;
            };

            let local_changed = node.transform.update_local_matrix();
            let world_changed = local_changed || parent_changed;
            if world_changed {
                let new_world = parent_world * *node.transform.local_matrix();
                node.transform.set_world_matrix(new_world);
            }

            let world = *node.transform.world_matrix();
            match &mut node.kind {
                NodeKind::Camera(cam) => {
                    if world_changed {
                        cam.update_view_projection(&world);
                    }
                }
                NodeKind::AnimatedMesh(state) => {
                    if let Some(bbox) = state.animate(key, now_ms) {
                        node.bounding_box = bbox;
                    }
                }
                _ => {}
            }

            if let Some(node) = self.nodes.get(key) {
                for i in (0..node.children.len()).rev() {
                    stack.push((node.children[i], world, world_changed));
                }
            }
        }
    }

    /// Visible nodes offer themselves to the scheduler; invisible nodes
    /// hide their whole subtree.
    fn register_pass(&mut self, backend: &dyn RenderBackend) {
        let mut stack = vec![self.root];

        while let Some(key) = stack.pop() {
            let Some(node) = self.nodes.get(key) else {
                continue;
            };
            if !node.visible {
                continue;
            }

            let mut requests: SmallVec<[RenderPass; 2]> = SmallVec::new();
            match &node.kind {
                NodeKind::Camera(_) => {
                    if self.active_camera == Some(key) {
                        requests.push(RenderPass::Camera);
                    }
                }
                NodeKind::Light(_) => requests.push(RenderPass::Light),
                NodeKind::Mesh(state) => {
                    if state.mesh.is_some() {
                        Self::mixed_mode_requests(node, backend, &mut requests);
                    }
                }
                NodeKind::AnimatedMesh(state) => {
                    if state.mesh.is_some() {
                        Self::mixed_mode_requests(node, backend, &mut requests);
                    }
                }
                NodeKind::Empty => {}
            }

            for pass in requests {
                self.register_for_rendering(key, pass, backend);
            }

            if let Some(node) = self.nodes.get(key) {
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
    }

    /// A mesh may mix transparent and solid materials, so it is offered to
    /// each pass its materials require and filters the matching subset at
    /// draw time.
    fn mixed_mode_requests(
        node: &SceneNode,
        backend: &dyn RenderBackend,
        requests: &mut SmallVec<[RenderPass; 2]>,
    ) {
        let mut solid = false;
        let mut transparent = false;

        for i in 0..node.material_count() {
            if let Some(material) = node.material(i) {
                if backend.needs_transparent_pass(material) {
                    transparent = true;
                } else {
                    solid = true;
                }
            }
            if solid && transparent {
                break;
            }
        }

        if solid {
            requests.push(RenderPass::Solid);
        }
        if transparent {
            requests.push(RenderPass::Transparent);
        }
    }

    // ========================================================================
    // Draw passes
    // ========================================================================

    fn draw_camera_pass(&mut self, backend: &mut dyn RenderBackend) {
        self.current_pass = RenderPass::Camera;

        let mut list = std::mem::take(&mut self.queue.cameras);
        for &key in &list {
            self.render_node(key, backend);
        }
        list.clear();
        self.queue.cameras = list;
    }

    fn draw_light_pass(&mut self, backend: &mut dyn RenderBackend) {
        self.current_pass = RenderPass::Light;

        backend.set_ambient_light(self.ambient_light);

        let mut list = std::mem::take(&mut self.queue.lights);
        for &key in &list {
            self.render_node(key, backend);
        }
        list.clear();
        self.queue.lights = list;
    }

    fn draw_solid_pass(&mut self, backend: &mut dyn RenderBackend) {
        self.current_pass = RenderPass::Solid;

        self.queue.sort_solids();
        let mut list = std::mem::take(&mut self.queue.solids);
        for entry in &list {
            self.render_node(entry.node, backend);
        }
        list.clear();
        self.queue.solids = list;
    }

    fn draw_shadow_pass(&mut self, backend: &mut dyn RenderBackend) {
        self.current_pass = RenderPass::Shadow;

        let mut list = std::mem::take(&mut self.queue.shadows);
        for &key in &list {
            self.render_node(key, backend);
        }
        if !list.is_empty() {
            backend.draw_accumulated_shadow_volumes(self.shadow_color);
        }
        list.clear();
        self.queue.shadows = list;
    }

    fn draw_transparent_passes(&mut self, backend: &mut dyn RenderBackend) {
        self.queue.sort_transparents();

        self.current_pass = RenderPass::Transparent;
        let mut list = std::mem::take(&mut self.queue.transparents);
        for entry in &list {
            self.render_node(entry.node, backend);
        }
        list.clear();
        self.queue.transparents = list;

        self.current_pass = RenderPass::TransparentEffect;
        let mut list = std::mem::take(&mut self.queue.transparent_effects);
        for entry in &list {
            self.render_node(entry.node, backend);
        }
        list.clear();
        self.queue.transparent_effects = list;
    }

    fn draw_gui_pass(&mut self, backend: &mut dyn RenderBackend) {
        self.current_pass = RenderPass::Gui;

        let mut list = std::mem::take(&mut self.queue.guis);
        for &key in &list {
            self.render_node(key, backend);
        }
        list.clear();
        self.queue.guis = list;
    }

    // ========================================================================
    // Per-kind rendering
    // ========================================================================

    fn render_node(&self, key: NodeKey, backend: &mut dyn RenderBackend) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };

        match &node.kind {
            NodeKind::Empty => {}
            NodeKind::Camera(cam) => {
                backend.set_transform(TransformSlot::Projection, cam.projection_matrix());
                backend.set_transform(TransformSlot::View, cam.view_matrix());
            }
            NodeKind::Light(light) => {
                backend.submit_light(&light.sample(node.transform.world_matrix()));
            }
            NodeKind::Mesh(state) => {
                if let Some(mesh) = &state.mesh {
                    self.render_mesh_parts(node, mesh, backend);
                } else {
                    log::debug!("Mesh node '{}' has no mesh to render", node.name);
                }
            }
            NodeKind::AnimatedMesh(state) => {
                if let Some(mesh) = state.mesh_for_current_frame() {
                    self.render_mesh_parts(node, mesh, backend);
                } else {
                    log::debug!("Animated mesh node '{}' resolved no frame", node.name);
                }
            }
        }
    }

    /// Draws the sub-set of `mesh`'s parts whose materials match the pass
    /// currently being drawn, so a node registered for both Solid and
    /// Transparent contributes each part exactly once per frame.
    fn render_mesh_parts(&self, node: &SceneNode, mesh: &Mesh, backend: &mut dyn RenderBackend) {
        let is_transparent_pass = matches!(
            self.current_pass,
            RenderPass::Transparent | RenderPass::TransparentEffect
        );

        backend.set_transform(TransformSlot::World, &node.transform.world_matrix_as_mat4());

        for (i, part) in mesh.parts.iter().enumerate() {
            let Some(material) = node.material_for_part(mesh, i) else {
                continue;
            };

            if backend.needs_transparent_pass(material) != is_transparent_pass {
                continue;
            }

            if node.debug_flags.contains(DebugFlags::HALF_TRANSPARENCY) {
                let mut overridden = material.clone();
                overridden.material_type = MaterialType::TransparentAddColor;
                backend.set_material(&overridden);
            } else {
                backend.set_material(material);
            }
            backend.draw_mesh_part(part);
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
