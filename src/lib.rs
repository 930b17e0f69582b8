#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod errors;
pub mod render;
pub mod resources;
pub mod scene;
pub mod utils;

pub use errors::{ArborError, Result};
pub use render::{NullBackend, RenderBackend, RenderPass, TransformSlot};
pub use resources::primitives::*;
pub use resources::{
    AnimatedMesh, BoundingBox, Material, MaterialFlags, MaterialType, Mesh, MeshCache, MeshLoader,
    MeshPart, SharedMeshCache, Texture, Vertex,
};
pub use scene::{
    Camera, CullingMode, Light, LightKind, NodeKey, NodeKind, SceneGraph, SceneNode, Transform,
};
pub use utils::time::Timer;
