//! Core resource definitions.
//!
//! CPU-side data structures consumed by the scene graph and handed to the
//! render backend, with no dependency on any concrete graphics API:
//! - Mesh / MeshPart / Vertex: geometry batches
//! - AnimatedMesh: per-frame mesh resource
//! - Material / Texture: draw-state descriptors
//! - BoundingBox: axis-aligned bounds
//! - MeshCache: process-shared name → mesh map plus the loader chain

pub mod bounds;
pub mod cache;
pub mod manipulator;
pub mod material;
pub mod mesh;
pub mod primitives;

pub use bounds::BoundingBox;
pub use cache::{MeshCache, MeshLoader, SharedMeshCache};
pub use material::{Material, MaterialFlags, MaterialType, Texture};
pub use mesh::{AnimatedMesh, Mesh, MeshPart, Vertex};
