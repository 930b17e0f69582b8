use std::sync::Arc;

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::resources::{BoundingBox, Material, Mesh};
use crate::scene::NodeKey;
use crate::scene::animated::AnimatedMeshState;
use crate::scene::camera::Camera;
use crate::scene::light::Light;
use crate::scene::transform::Transform;

/// Id carried by the root node of every scene graph. The root is never
/// rendered and never removed; ordinary nodes default to the same value but
/// are free to take any id (ids are lookup hints, not unique keys).
pub const ROOT_ID: i32 = -1;

bitflags! {
    /// Which visibility tests the culling unit runs for a node.
    ///
    /// Tests are evaluated in declaration order and short-circuit on the
    /// first one that proves the node invisible. `empty()` disables culling.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CullingMode: u32 {
        /// Backend occlusion-query result, zero visible pixels culls.
        const OCCLUSION_QUERY = 1 << 0;
        /// World-space box against the frustum's bounding box.
        const BOX             = 1 << 1;
        /// Bounding-sphere distance heuristic.
        const SPHERE          = 1 << 2;
        /// Exact test of the local box corners against the frustum planes.
        const FRUSTUM_BOX     = 1 << 3;
    }
}

impl Default for CullingMode {
    fn default() -> Self {
        CullingMode::BOX
    }
}

bitflags! {
    /// Debug visualization toggles.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct DebugFlags: u32 {
        /// Draw the node's bounding box.
        const BOUNDING_BOX      = 1 << 0;
        /// Render mesh parts with additive blending.
        const HALF_TRANSPARENCY = 1 << 1;
    }
}

/// Discriminant-only view of [`NodeKind`], used for type queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Empty,
    Mesh,
    Camera,
    Light,
    AnimatedMesh,
}

/// Kind-specific state of a node.
///
/// The built-in node kinds are a closed set, so the per-kind behavior
/// (animate, register, render, bounds, clone) dispatches by exhaustive
/// match in the scene-graph systems rather than through trait objects.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure grouping node, renders nothing.
    Empty,
    /// Static mesh instance (cube primitive nodes are mesh nodes built from
    /// the geometry creator).
    Mesh(MeshState),
    Camera(Box<Camera>),
    Light(Light),
    AnimatedMesh(Box<AnimatedMeshState>),
}

impl NodeKind {
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Empty => NodeType::Empty,
            NodeKind::Mesh(_) => NodeType::Mesh,
            NodeKind::Camera(_) => NodeType::Camera,
            NodeKind::Light(_) => NodeType::Light,
            NodeKind::AnimatedMesh(_) => NodeType::AnimatedMesh,
        }
    }
}

/// Kind-specific state of a static mesh node.
#[derive(Debug, Clone, Default)]
pub struct MeshState {
    pub mesh: Option<Arc<Mesh>>,
    /// Use the mesh parts' own materials instead of the node's copies.
    pub read_only_materials: bool,
}

/// A node of the spatial hierarchy.
///
/// Hierarchy links (`parent`, `children`) are managed by the owning
/// [`SceneGraph`](crate::scene::SceneGraph); everything else is free to
/// mutate between frames. The world transform is valid after the frame's
/// animation pass and always equals `parent.world * local` at that point.
#[derive(Debug, Clone)]
pub struct SceneNode {
    /// Lookup id, not required to be unique.
    pub id: i32,
    pub name: String,

    pub transform: Transform,

    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,

    /// Invisible nodes skip registration for themselves and their subtree.
    pub visible: bool,
    pub culling: CullingMode,
    pub debug_flags: DebugFlags,

    /// Per-node material copies; mesh kinds may bypass these via their
    /// `read_only_materials` flag.
    pub materials: SmallVec<[Material; 2]>,

    /// Local-space bounding box. The world-space box is derived on demand
    /// and never cached across frames.
    pub(crate) bounding_box: BoundingBox,

    pub kind: NodeKind,
}

impl SceneNode {
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: ROOT_ID,
            name: String::new(),
            transform: Transform::new(),
            parent: None,
            children: Vec::new(),
            visible: true,
            culling: CullingMode::default(),
            debug_flags: DebugFlags::default(),
            materials: SmallVec::new(),
            bounding_box: BoundingBox::EMPTY,
            kind,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Local-space bounding box.
    #[inline]
    #[must_use]
    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn set_bounding_box(&mut self, bbox: BoundingBox) {
        self.bounding_box = bbox;
    }

    /// Bounding box in world space, derived from the current world matrix.
    #[must_use]
    pub fn world_bounding_box(&self) -> BoundingBox {
        self.bounding_box.transform(self.transform.world_matrix())
    }

    /// The mesh resource this node renders from, if any. For animated nodes
    /// this is the base (first) frame used for material classification.
    #[must_use]
    pub fn source_mesh(&self) -> Option<&Arc<Mesh>> {
        match &self.kind {
            NodeKind::Mesh(state) => state.mesh.as_ref(),
            NodeKind::AnimatedMesh(state) => {
                state.mesh.as_ref().and_then(|m| m.frames.first())
            }
            _ => None,
        }
    }

    fn read_only_materials(&self) -> bool {
        match &self.kind {
            NodeKind::Mesh(state) => state.read_only_materials,
            NodeKind::AnimatedMesh(state) => state.read_only_materials,
            _ => false,
        }
    }

    /// Number of materials the renderer will consider for this node.
    #[must_use]
    pub fn material_count(&self) -> usize {
        if self.read_only_materials() {
            self.source_mesh().map_or(0, |m| m.parts.len())
        } else {
            self.materials.len()
        }
    }

    /// Material at `index`, resolved through the read-only flag.
    #[must_use]
    pub fn material(&self, index: usize) -> Option<&Material> {
        if self.read_only_materials() {
            self.source_mesh().and_then(|m| m.parts.get(index)).map(|p| &p.material)
        } else {
            self.materials.get(index)
        }
    }

    /// Material used to draw part `index` of `mesh`: the node's own copy
    /// when present, the part's material otherwise.
    #[must_use]
    pub(crate) fn material_for_part<'a>(
        &'a self,
        mesh: &'a Mesh,
        index: usize,
    ) -> Option<&'a Material> {
        if !self.read_only_materials() {
            if let Some(material) = self.materials.get(index) {
                return Some(material);
            }
        }
        mesh.parts.get(index).map(|p| &p.material)
    }
}
