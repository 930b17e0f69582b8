//! Scene-graph system.
//!
//! Manages the spatial hierarchy and its per-frame pipeline:
//! - [`SceneNode`]: a node (transform, hierarchy links, materials, kind)
//! - [`Transform`]: TRS component with matrix caching and dirty checking
//! - [`SceneGraph`]: the owning container and frame driver
//! - [`Camera`] / [`Light`]: component state for the matching node kinds
//! - [`AnimatedMeshState`]: frame-cursor state for animated mesh nodes

pub mod animated;
pub mod camera;
pub mod graph;
pub mod light;
pub mod node;
pub mod transform;

pub use animated::{AnimatedMeshState, AnimationEndCallback};
pub use camera::{Camera, Frustum, ProjectionType};
pub use graph::SceneGraph;
pub use light::{Light, LightKind, LightSample};
pub use node::{CullingMode, DebugFlags, MeshState, NodeKind, NodeType, ROOT_ID, SceneNode};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    /// Generational handle to a node stored in a [`SceneGraph`].
    pub struct NodeKey;
}
