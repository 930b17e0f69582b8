//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`ArborError`] covers the failure modes of the
//! scene-graph core:
//! - Hierarchy mutations rejected as caller errors
//! - Mesh resources that failed to resolve
//!
//! # Usage
//!
//! Fallible public APIs return [`Result<T>`], an alias for
//! `std::result::Result<T, ArborError>`. Resource failures inside the frame
//! pipeline are recovered locally and logged; `draw_all` itself never fails.

use thiserror::Error;

/// The main error type for the Arbor engine.
#[derive(Error, Debug)]
pub enum ArborError {
    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// A hierarchy mutation that would corrupt the tree was rejected.
    #[error("Invalid hierarchy operation: {0}")]
    InvalidHierarchyOperation(&'static str),

    /// The referenced node does not exist (stale handle or already removed).
    #[error("Node not found")]
    NodeNotFound,

    /// The node exists but is not of the kind the operation requires.
    #[error("Node kind mismatch: {0}")]
    InvalidNodeKind(&'static str),

    // ========================================================================
    // Resource Errors
    // ========================================================================
    /// A mesh or texture resource failed to resolve.
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// No registered loader could produce a mesh for the given path.
    #[error("Could not load mesh '{path}': {reason}")]
    MeshLoadFailed {
        /// Path or cache name that was requested
        path: String,
        /// What went wrong
        reason: String,
    },
}

/// Alias for `Result<T, ArborError>`.
pub type Result<T> = std::result::Result<T, ArborError>;
