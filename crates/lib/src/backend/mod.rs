//! Nested-set storage engines
//!
//! This module provides the core `NestedSet` trait and the in-memory engine.
//!
//! The `NestedSet` trait is the storage capability the rest of the crate
//! consumes: lookups, listing in default order with computed depth, the
//! positional primitives (`up`, `down`, `prepend_node`, ...), and the global
//! `fix_tree` repair. The reposition algorithm in [`crate::move_item`] never
//! touches intervals directly; it only composes these primitives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::node::{Attributes, NodeId, TreeNode};

pub mod errors;
mod in_memory;

pub use errors::BackendError;
pub use in_memory::InMemory;

/// Attribute filter restricting which nodes a query sees.
///
/// An empty scope sees every node. A non-empty scope sees only nodes whose
/// attributes equal every condition, and stamps those conditions onto nodes
/// created through it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope {
    conditions: BTreeMap<String, serde_json::Value>,
}

impl Scope {
    /// A scope that sees every node.
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds an equality condition.
    pub fn with(mut self, attribute: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.conditions.insert(attribute.into(), value.into());
        self
    }

    /// Whether this scope has no conditions.
    pub fn is_unscoped(&self) -> bool {
        self.conditions.is_empty()
    }

    /// The conditions of this scope.
    pub fn conditions(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.conditions
    }

    /// Whether a node passes every condition.
    pub fn matches(&self, attributes: &Attributes) -> bool {
        self.conditions
            .iter()
            .all(|(name, value)| attributes.get(name) == Some(value))
    }

    /// Writes the scope conditions into a set of attributes.
    pub fn apply_to(&self, attributes: &mut Attributes) {
        for (name, value) in &self.conditions {
            attributes.insert(name.clone(), value.clone());
        }
    }
}

/// Storage capability for nested-set trees.
///
/// Lookups and listings take a [`Scope`]; structural operations act on the
/// tree partition the node already belongs to. Every structural operation
/// rewrites `left`/`right` of an unbounded number of other nodes in that
/// partition and must do so as one unit.
///
/// Implementations must be `Send` and `Sync` so a store can be shared
/// behind an `Arc`.
pub trait NestedSet: Send + Sync {
    /// Attributes that split the store into independent trees.
    fn scope_attributes(&self) -> Vec<String>;

    /// Retrieves a node visible through `scope`, with depth.
    ///
    /// # Returns
    /// The node, or `BackendError::NodeNotFound` if it does not exist or is
    /// outside the scope.
    fn find(&self, scope: &Scope, id: NodeId) -> Result<TreeNode>;

    /// Every node visible through `scope` in default tree order, with depth.
    fn nodes(&self, scope: &Scope) -> Result<Vec<TreeNode>>;

    /// Number of nodes sharing this node's parent, excluding the node.
    fn siblings_count(&self, id: NodeId) -> Result<usize>;

    /// Number of direct children.
    fn children_count(&self, id: NodeId) -> Result<usize>;

    /// Identifiers of every node inside this node's interval, in default order.
    fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>>;

    /// Moves the node before its `amount`-th previous sibling.
    ///
    /// Returns `false` without changing anything when there is no such
    /// sibling or `amount` is zero.
    fn up(&self, id: NodeId, amount: usize) -> Result<bool>;

    /// Moves the node after its `amount`-th next sibling.
    ///
    /// Returns `false` without changing anything when there is no such
    /// sibling or `amount` is zero.
    fn down(&self, id: NodeId, amount: usize) -> Result<bool>;

    /// Makes `node` the first child of `parent`.
    fn prepend_node(&self, parent: NodeId, node: NodeId) -> Result<()>;

    /// Makes `node` the last child of `parent`.
    fn append_node(&self, parent: NodeId, node: NodeId) -> Result<()>;

    /// Places `node` directly before `sibling`, under `sibling`'s parent.
    fn insert_before(&self, sibling: NodeId, node: NodeId) -> Result<()>;

    /// Places `node` directly after `sibling`, under `sibling`'s parent.
    fn insert_after(&self, sibling: NodeId, node: NodeId) -> Result<()>;

    /// Detaches `node` and appends it after the existing roots.
    fn save_as_root(&self, id: NodeId) -> Result<()>;

    /// Creates a node as the last child of `parent`, or the last root.
    fn create(&self, parent: Option<NodeId>, attributes: Attributes) -> Result<TreeNode>;

    /// Replaces a node's payload attributes. Structure is untouched.
    fn update_attributes(&self, id: NodeId, attributes: Attributes) -> Result<TreeNode>;

    /// Deletes a node together with its subtree and closes the gap.
    ///
    /// # Returns
    /// The number of removed nodes.
    fn delete(&self, id: NodeId) -> Result<usize>;

    /// Rebuilds intervals of every tree touched by `scope` from `parent_id`.
    ///
    /// Nodes whose parent is missing (or unreachable because of a parent
    /// cycle) become roots. Idempotent.
    ///
    /// # Returns
    /// The number of nodes whose interval or parent changed.
    fn fix_tree(&self, scope: &Scope) -> Result<usize>;

    /// Records a restore point.
    fn begin(&self) -> Result<()>;

    /// Discards the latest restore point, keeping all changes.
    fn commit(&self) -> Result<()>;

    /// Restores the latest restore point.
    fn rollback(&self) -> Result<()>;
}
