//! Per-viewer UI state of a tree page.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::node::NodeId;

/// Storage for whether a row is collapsed.
///
/// Rows start collapsed until a viewer expands them.
pub trait UiStateStore: Send + Sync {
    fn is_collapsed(&self, id: NodeId) -> bool;

    fn set_collapsed(&self, id: NodeId, collapsed: bool);
}

/// Process-local UI state.
#[derive(Debug, Default)]
pub struct InMemoryUiState {
    collapsed: RwLock<HashMap<NodeId, bool>>,
}

impl InMemoryUiState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UiStateStore for InMemoryUiState {
    fn is_collapsed(&self, id: NodeId) -> bool {
        self.collapsed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .copied()
            .unwrap_or(true)
    }

    fn set_collapsed(&self, id: NodeId, collapsed: bool) {
        self.collapsed
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, collapsed);
    }
}
