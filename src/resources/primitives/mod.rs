//! Procedural primitive generation.
//!
//! Stateless builders for the meshes used by built-in primitive nodes.

pub mod cube;

pub use cube::{CubeMeshVariant, create_cube_mesh};
