//! Store loading and tree page construction.

use std::sync::Arc;

use nestree::{
    InMemory, NestedSet, PrescopedTreeScope, Scope, TreeConfig, TreeDefinition, TreePage,
    TreeScope, UnscopedTreeScope, page::InMemoryUiState,
};

use crate::cli::StoreArgs;

/// Load the store file, or start an empty store partitioned by the
/// configured scope attributes.
pub fn open_store(args: &StoreArgs) -> Result<Arc<InMemory>, Box<dyn std::error::Error>> {
    if !args.file.exists() {
        tracing::info!(
            "Starting with a fresh store at {} (scope attributes: {:?})",
            args.file.display(),
            args.scope_attributes
        );
        return Ok(Arc::new(InMemory::with_scope_attributes(
            args.scope_attributes.iter().cloned(),
        )));
    }

    let store = InMemory::load_from_file(&args.file)?;
    tracing::debug!("Loaded {} nodes from {}", store.len(), args.file.display());
    Ok(Arc::new(store))
}

/// Persist the store back to its file.
pub fn save_store(store: &InMemory, args: &StoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    store.save_to_file(&args.file)?;
    tracing::debug!("Saved {} nodes to {}", store.len(), args.file.display());
    Ok(())
}

/// Build the tree page the command works on.
pub fn build_page(
    store: Arc<InMemory>,
    args: &StoreArgs,
) -> Result<TreePage, Box<dyn std::error::Error>> {
    let backend: Arc<dyn NestedSet> = store;
    let scope: Arc<dyn TreeScope> = if args.scope.is_empty() {
        Arc::new(UnscopedTreeScope::new(backend))
    } else {
        let scope = args
            .scope
            .iter()
            .fold(Scope::all(), |scope, (name, value)| {
                scope.with(name.clone(), value.clone())
            });
        Arc::new(PrescopedTreeScope::new(backend, scope))
    };

    let mut definition = TreeDefinition::new(args.label_attribute.clone());
    if let Some(caption) = &args.caption_attribute {
        definition = definition.with_caption(caption.clone());
    }
    if let Some(label) = &args.model_label {
        definition = definition.with_model_label(label.clone());
    }

    let config = match &args.config {
        Some(path) => TreeConfig::from_file(path)?,
        None => TreeConfig::default(),
    };

    Ok(TreePage::new(
        scope,
        definition,
        config,
        Arc::new(InMemoryUiState::new()),
    )?)
}
