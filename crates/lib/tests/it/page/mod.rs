use std::sync::Arc;

use nestree::page::InMemoryUiState;
use nestree::{TreeConfig, TreeDefinition, TreePage, TreeScope};

mod forms;
mod moves;

/// Builds a page over `scope` with the default record definition.
pub fn page<S: TreeScope + 'static>(scope: S, config: TreeConfig) -> TreePage {
    TreePage::new(
        Arc::new(scope),
        TreeDefinition::default(),
        config,
        Arc::new(InMemoryUiState::new()),
    )
    .expect("Failed to create tree page")
}
