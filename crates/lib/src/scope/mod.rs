//! Tree scopes
//!
//! A [`TreeScope`] is the query capability every tree operation goes
//! through. It pairs a nested-set engine with a [`Scope`] filter, so callers
//! never have to care whether they were handed a whole table or a pre-filtered
//! slice of it:
//!
//! * [`UnscopedTreeScope`] sees every node of the engine.
//! * [`PrescopedTreeScope`] sees only nodes matching its filter and stamps the
//!   filter's attributes onto nodes it creates.
//!
//! Both expose the same contract; structural operations refuse nodes the
//! scope cannot see with `NodeNotFound`.

use std::fmt;
use std::sync::Arc;

use crate::Result;
use crate::backend::{NestedSet, Scope};
use crate::node::{Attributes, NodeId, TreeNode};

/// Nested-set query capability bound to a scope.
pub trait TreeScope: Send + Sync {
    /// The engine behind this scope.
    fn backend(&self) -> &dyn NestedSet;

    /// The filter applied to every lookup.
    fn scope(&self) -> &Scope;

    /// Looks a node up, failing with `NodeNotFound` if it is not visible.
    fn find(&self, id: NodeId) -> Result<TreeNode> {
        self.backend().find(self.scope(), id)
    }

    /// All visible nodes in default order, with depth.
    fn nodes(&self) -> Result<Vec<TreeNode>> {
        self.backend().nodes(self.scope())
    }

    /// Number of siblings of a node, excluding the node.
    fn siblings_count(&self, id: NodeId) -> Result<usize> {
        self.find(id)?;
        self.backend().siblings_count(id)
    }

    /// Number of direct children of a node.
    fn children_count(&self, id: NodeId) -> Result<usize> {
        self.find(id)?;
        self.backend().children_count(id)
    }

    /// Descendants of a node in default order.
    fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>> {
        self.find(id)?;
        self.backend().descendants(id)
    }

    /// 0-indexed position of a node among its siblings.
    fn position(&self, id: NodeId) -> Result<usize> {
        let node = self.find(id)?;
        let partition = self.backend().scope_attributes();
        let same_tree = |other: &TreeNode| {
            partition
                .iter()
                .all(|name| other.attribute(name) == node.attribute(name))
        };
        Ok(self
            .nodes()?
            .iter()
            .filter(|other| other.parent_id == node.parent_id && other.left < node.left)
            .filter(|other| same_tree(*other))
            .count())
    }

    /// Shifts a node towards the front of its siblings.
    fn up(&self, id: NodeId, amount: usize) -> Result<bool> {
        self.find(id)?;
        self.backend().up(id, amount)
    }

    /// Shifts a node towards the back of its siblings.
    fn down(&self, id: NodeId, amount: usize) -> Result<bool> {
        self.find(id)?;
        self.backend().down(id, amount)
    }

    /// Makes `node` the first child of `parent`.
    fn prepend_node(&self, parent: NodeId, node: NodeId) -> Result<()> {
        self.find(parent)?;
        self.find(node)?;
        self.backend().prepend_node(parent, node)
    }

    /// Makes `node` the last child of `parent`.
    fn append_node(&self, parent: NodeId, node: NodeId) -> Result<()> {
        self.find(parent)?;
        self.find(node)?;
        self.backend().append_node(parent, node)
    }

    /// Detaches a node and appends it after the existing roots.
    fn save_as_root(&self, id: NodeId) -> Result<()> {
        self.find(id)?;
        self.backend().save_as_root(id)
    }

    /// Creates a node under `parent` (or as a root) carrying the scope's
    /// attributes on top of `attributes`.
    fn create(&self, parent: Option<NodeId>, mut attributes: Attributes) -> Result<TreeNode> {
        if let Some(parent) = parent {
            self.find(parent)?;
        }
        self.scope().apply_to(&mut attributes);
        self.backend().create(parent, attributes)
    }

    /// Replaces a node's payload, keeping the scope's attributes.
    fn update_attributes(&self, id: NodeId, mut attributes: Attributes) -> Result<TreeNode> {
        self.find(id)?;
        self.scope().apply_to(&mut attributes);
        self.backend().update_attributes(id, attributes)
    }

    /// Deletes a node and its subtree.
    fn delete(&self, id: NodeId) -> Result<usize> {
        self.find(id)?;
        self.backend().delete(id)
    }

    /// Repairs the trees this scope can see.
    fn fix_tree(&self) -> Result<usize> {
        self.backend().fix_tree(self.scope())
    }

    /// Runs `operation` as one unit: if it fails, every change it made is
    /// rolled back before the error is returned.
    fn atomically(&self, operation: &mut dyn FnMut() -> Result<()>) -> Result<()> {
        let backend = self.backend();
        backend.begin()?;
        match operation() {
            Ok(()) => backend.commit(),
            Err(err) => {
                if let Err(rollback_err) = backend.rollback() {
                    tracing::error!(error = %rollback_err, "Failed to roll back tree operation");
                }
                Err(err)
            }
        }
    }
}

/// A scope over every node of an engine.
#[derive(Clone)]
pub struct UnscopedTreeScope {
    backend: Arc<dyn NestedSet>,
    scope: Scope,
}

impl UnscopedTreeScope {
    pub fn new(backend: Arc<dyn NestedSet>) -> Self {
        Self {
            backend,
            scope: Scope::all(),
        }
    }
}

impl TreeScope for UnscopedTreeScope {
    fn backend(&self) -> &dyn NestedSet {
        self.backend.as_ref()
    }

    fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl fmt::Debug for UnscopedTreeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnscopedTreeScope").finish_non_exhaustive()
    }
}

/// A scope restricted to nodes matching an attribute filter.
///
/// Typically the filter names the engine's scope attributes, e.g. one menu
/// out of a table of menus.
#[derive(Clone)]
pub struct PrescopedTreeScope {
    backend: Arc<dyn NestedSet>,
    scope: Scope,
}

impl PrescopedTreeScope {
    pub fn new(backend: Arc<dyn NestedSet>, scope: Scope) -> Self {
        Self { backend, scope }
    }
}

impl TreeScope for PrescopedTreeScope {
    fn backend(&self) -> &dyn NestedSet {
        self.backend.as_ref()
    }

    fn scope(&self) -> &Scope {
        &self.scope
    }
}

impl fmt::Debug for PrescopedTreeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrescopedTreeScope")
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}
