//! Error types for tree page operations.

use crate::node::NodeId;
use thiserror::Error;

/// Errors raised by the tree page and the components it drives.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PageError {
    /// A node reports a depth no well-formed tree can produce.
    #[error("Tree node {id} has depth {depth}, the tree needs fixing")]
    StructuralCorruption {
        /// The corrupted node
        id: NodeId,
        /// The depth it reported
        depth: i64,
    },

    /// The record definition cannot be used with the given scope.
    #[error("Invalid tree model: {reason}")]
    InvalidModel {
        /// What is wrong with the definition
        reason: String,
    },

    /// The operation is not allowed by configuration or tree structure.
    #[error("{reason}")]
    OperationRejected {
        /// Message suitable for a notification
        reason: String,
    },
}

impl PageError {
    /// Check if this error reports a corrupted tree.
    pub fn is_structural_corruption(&self) -> bool {
        matches!(self, PageError::StructuralCorruption { .. })
    }

    /// Check if this error reports an unusable record definition.
    pub fn is_invalid_model(&self) -> bool {
        matches!(self, PageError::InvalidModel { .. })
    }

    /// Check if this error is a rejected operation.
    pub fn is_operation_rejected(&self) -> bool {
        matches!(self, PageError::OperationRejected { .. })
    }
}

impl From<PageError> for crate::Error {
    fn from(err: PageError) -> Self {
        crate::Error::Page(err)
    }
}
