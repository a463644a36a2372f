//! Error types for nested-set storage engines.

use crate::node::NodeId;
use thiserror::Error;

/// Errors that can occur during storage operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// Node not found by ID, or not visible through the query scope.
    #[error("Node not found: {id}")]
    NodeNotFound {
        /// The ID of the node that was not found
        id: NodeId,
    },

    /// A node cannot be placed inside its own subtree.
    #[error("Cannot move node {id} into itself or its descendant {target}")]
    MoveIntoSelf {
        /// The node being moved
        id: NodeId,
        /// The requested anchor (parent or sibling)
        target: NodeId,
    },

    /// Structural operations cannot cross tree partitions.
    #[error("Nodes {id} and {target} belong to different scopes")]
    ScopeMismatch {
        /// The node being moved
        id: NodeId,
        /// The requested anchor (parent or sibling)
        target: NodeId,
    },

    /// Commit or rollback without a matching begin.
    #[error("No restore point to {operation}")]
    NoRestorePoint {
        /// `commit` or `rollback`
        operation: &'static str,
    },

    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl BackendError {
    /// Check if this error indicates a node was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NodeNotFound { .. })
    }

    /// Check if this error is a rejected structural operation.
    ///
    /// These leave the store untouched and are safe to report to a user.
    pub fn is_logical_error(&self) -> bool {
        matches!(
            self,
            BackendError::MoveIntoSelf { .. }
                | BackendError::ScopeMismatch { .. }
                | BackendError::NoRestorePoint { .. }
        )
    }

    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            BackendError::FileIo { .. }
                | BackendError::SerializationFailed { .. }
                | BackendError::DeserializationFailed { .. }
        )
    }

    /// Get the node ID if this error is about a specific node.
    pub fn node_id(&self) -> Option<NodeId> {
        match self {
            BackendError::NodeNotFound { id }
            | BackendError::MoveIntoSelf { id, .. }
            | BackendError::ScopeMismatch { id, .. } => Some(*id),
            _ => None,
        }
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
