//!
//! nestree: editing and repair of nested-set trees.
//!
//! A nested-set tree stores every node as an interval `(left, right)`; a node
//! is a descendant of another exactly when its interval lies strictly inside
//! the other's. This makes subtree queries cheap, but every reorder or
//! reparent rewrites the intervals of many other nodes. This library keeps
//! that bookkeeping in one place.
//!
//! ## Core Concepts
//!
//! * **Nodes (`node::TreeNode`)**: One record of a tree: identifier, parent link, interval bounds, computed depth and a free-form attribute payload.
//! * **Engines (`backend::NestedSet`)**: The storage capability with the positional primitives (`up`, `down`, `prepend_node`, `save_as_root`, ...) and the `fix_tree` repair. `backend::InMemory` is the bundled engine.
//! * **Scopes (`scope::TreeScope`)**: The query capability every operation goes through, either over a whole engine or over one scoped tree of it.
//! * **MoveItem (`move_item::MoveItem`)**: Turns a drag-and-drop move ("node N, from position F, to position T under parent P") into engine primitives.
//! * **ParentSelect (`parent_select::ParentSelect`)**: Depth-indented parent options that never offer a node's own subtree.
//! * **TreePage (`page::TreePage`)**: The handlers a tree editor calls, reporting stale parts of the view as `page::TreeEvent`s.

pub mod backend;
pub mod config;
pub mod constants;
pub mod helpers;
pub mod model;
pub mod move_item;
pub mod node;
pub mod page;
pub mod parent_select;
pub mod scope;

pub use backend::{InMemory, NestedSet, Scope};
pub use config::TreeConfig;
pub use model::TreeDefinition;
pub use move_item::{MoveItem, Movement};
pub use node::{Attributes, NodeId, TreeNode};
pub use page::TreePage;
pub use parent_select::{ParentOption, ParentSelect};
pub use scope::{PrescopedTreeScope, TreeScope, UnscopedTreeScope};

/// Result type used throughout the nestree library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the nestree library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured storage errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured tree page errors from the page module
    #[error(transparent)]
    Page(page::PageError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Backend(_) => "backend",
            Error::Page(_) => "page",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a node was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if the engine refused a structural operation.
    ///
    /// The tree is left as it was; the message is suitable for a user.
    pub fn is_logical_error(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_logical_error(),
            _ => false,
        }
    }

    /// Check if this error reports a corrupted tree.
    pub fn is_structural_corruption(&self) -> bool {
        match self {
            Error::Page(page_err) => page_err.is_structural_corruption(),
            _ => false,
        }
    }

    /// Check if this error reports an unusable record definition.
    pub fn is_invalid_model(&self) -> bool {
        match self {
            Error::Page(page_err) => page_err.is_invalid_model(),
            _ => false,
        }
    }

    /// Check if an operation was rejected by configuration or structure.
    pub fn is_operation_rejected(&self) -> bool {
        match self {
            Error::Page(page_err) => page_err.is_operation_rejected(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        match self {
            Error::Io(_) | Error::Serialize(_) => true,
            Error::Backend(backend_err) => backend_err.is_io_error(),
            _ => false,
        }
    }
}
