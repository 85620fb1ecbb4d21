//! Error Types
//!
//! Every failure in the rigging core is local and non-fatal. Construction
//! steps return [`Result`]; callers that drive whole configurations log the
//! error and carry on without the affected rig.
//!
//! # Taxonomy
//!
//! - Missing nodes: [`RigError::NodeNotFound`], [`RigError::MissingSegment`]
//! - Unusable reference geometry: [`RigError::DegenerateGeometry`]
//! - Asset fetch/parse failures: [`RigError::LoadFailure`]
//! - Graph misuse: [`RigError::InvalidHierarchy`]

use thiserror::Error;

/// The main error type for rig construction and asset loading.
#[derive(Error, Debug)]
pub enum RigError {
    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// A named node does not exist in the searched subtree.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// A chain segment could not locate its required mesh fragments.
    #[error("Chain '{chain}' segment '{segment}' is missing fragments: {missing:?}")]
    MissingSegment {
        /// Chain being built
        chain: String,
        /// Pivot name of the failing segment
        segment: String,
        /// Fragment names that could not be located
        missing: Vec<String>,
    },

    // ========================================================================
    // Geometry Errors
    // ========================================================================
    /// The reference mesh has no usable geometry or bounding box.
    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    // ========================================================================
    // Hierarchy Errors
    // ========================================================================
    /// An operation would corrupt the node tree or refers to stale handles.
    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(String),

    // ========================================================================
    // Asset Loading Errors
    // ========================================================================
    /// The asset could not be fetched or parsed.
    #[error("Failed to load asset '{path}': {reason}")]
    LoadFailure {
        /// Asset URI as requested
        path: String,
        /// Underlying cause
        reason: String,
    },

    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RigError {
    /// Wraps any error raised while loading `path` into a [`RigError::LoadFailure`].
    pub fn load_failure(path: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        RigError::LoadFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Alias for `Result<T, RigError>`.
pub type Result<T> = std::result::Result<T, RigError>;
