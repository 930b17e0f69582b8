//! Render scheduling.
//!
//! The pieces of the per-frame draw pipeline that are independent of any
//! concrete graphics API:
//! - [`RenderBackend`]: the drawing contract, with [`NullBackend`] for
//!   headless runs
//! - [`RenderQueue`] / [`RenderPass`]: the seven ordered pass buckets
//! - [`culling`]: per-node visibility tests

pub mod backend;
pub mod culling;
pub mod queue;

pub use backend::{NullBackend, RenderBackend, TransformSlot};
pub use culling::is_culled;
pub use queue::{RenderPass, RenderQueue};
