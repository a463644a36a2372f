//! In-memory nested-set engine
//!
//! This module provides an in-memory implementation of the `NestedSet` trait,
//! suitable for testing, development, or small data sets that are persisted
//! by saving the whole store to a JSON file.
//!
//! Structural operations follow the usual nested-set arithmetic: every move
//! is a single patch over the `left`/`right` columns of one tree partition,
//! so a valid contiguous numbering stays contiguous.

mod persistence;
mod repair;
mod structure;

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::backend::errors::BackendError;
use crate::backend::{NestedSet, Scope};
use crate::node::{Attributes, NodeId, TreeNode};

/// Stored form of a node. Depth is never stored; it is derived on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Record {
    pub(crate) id: NodeId,
    pub(crate) parent_id: Option<NodeId>,
    pub(crate) left: i64,
    pub(crate) right: i64,
    #[serde(default)]
    pub(crate) attributes: Attributes,
}

/// Everything a restore point has to capture.
#[derive(Debug, Clone, Default)]
pub(crate) struct State {
    pub(crate) records: BTreeMap<NodeId, Record>,
    pub(crate) next_id: u64,
    pub(crate) scope_attributes: Vec<String>,
}

/// A nested-set store held in memory.
///
/// The store may be split into independent trees by *scope attributes*:
/// nodes with equal values for every scope attribute share one interval
/// numbering, and structural operations never cross between them.
///
/// Restore points (`begin`/`commit`/`rollback`) snapshot the whole store.
/// They assume calls are serialized by the caller.
#[derive(Debug)]
pub struct InMemory {
    pub(crate) state: RwLock<State>,
    pub(crate) restore_points: Mutex<Vec<State>>,
}

impl InMemory {
    /// Creates a new, empty store holding a single tree partition.
    pub fn new() -> Self {
        Self::with_scope_attributes(Vec::<String>::new())
    }

    /// Creates a new, empty store partitioned by the given attributes.
    pub fn with_scope_attributes<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_state(State {
            records: BTreeMap::new(),
            next_id: 1,
            scope_attributes: attributes.into_iter().map(Into::into).collect(),
        })
    }

    pub(crate) fn from_state(state: State) -> Self {
        Self {
            state: RwLock::new(state),
            restore_points: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of stored nodes.
    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    /// Whether the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.read().records.is_empty()
    }

    /// Saves the entire store to a file as JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path)
    }

    /// Loads a store from a JSON file.
    ///
    /// If the file does not exist, a new, empty `InMemory` store is returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path)
    }

    /// Overwrites a node's bounds without any bookkeeping.
    ///
    /// Simulates a damaged tree in tests; repair with `fix_tree`.
    #[cfg(any(test, feature = "testing"))]
    pub fn corrupt_bounds(&self, id: NodeId, left: i64, right: i64) -> Result<()> {
        let mut state = self.write();
        let record = state
            .records
            .get_mut(&id)
            .ok_or(BackendError::NodeNotFound { id })?;
        record.left = left;
        record.right = right;
        Ok(())
    }

    /// Overwrites a node's parent link without any bookkeeping.
    #[cfg(any(test, feature = "testing"))]
    pub fn corrupt_parent(&self, id: NodeId, parent: Option<NodeId>) -> Result<()> {
        let mut state = self.write();
        let record = state
            .records
            .get_mut(&id)
            .ok_or(BackendError::NodeNotFound { id })?;
        record.parent_id = parent;
        Ok(())
    }
}

impl Default for InMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl NestedSet for InMemory {
    fn scope_attributes(&self) -> Vec<String> {
        self.read().scope_attributes.clone()
    }

    fn find(&self, scope: &Scope, id: NodeId) -> Result<TreeNode> {
        let state = self.read();
        let record = state.record(id)?;
        if !scope.matches(&record.attributes) {
            return Err(BackendError::NodeNotFound { id }.into());
        }
        Ok(state.to_node(record))
    }

    fn nodes(&self, scope: &Scope) -> Result<Vec<TreeNode>> {
        Ok(self.read().nodes(scope))
    }

    fn siblings_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.read().siblings(id)?.len())
    }

    fn children_count(&self, id: NodeId) -> Result<usize> {
        self.read().children_count(id)
    }

    fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>> {
        self.read().descendants(id)
    }

    fn up(&self, id: NodeId, amount: usize) -> Result<bool> {
        let moved = self.write().up(id, amount)?;
        tracing::debug!(node = %id, amount, moved, "Shifted node up");
        Ok(moved)
    }

    fn down(&self, id: NodeId, amount: usize) -> Result<bool> {
        let moved = self.write().down(id, amount)?;
        tracing::debug!(node = %id, amount, moved, "Shifted node down");
        Ok(moved)
    }

    fn prepend_node(&self, parent: NodeId, node: NodeId) -> Result<()> {
        self.write().prepend(parent, node)?;
        tracing::debug!(node = %node, parent = %parent, "Prepended node");
        Ok(())
    }

    fn append_node(&self, parent: NodeId, node: NodeId) -> Result<()> {
        self.write().append(parent, node)?;
        tracing::debug!(node = %node, parent = %parent, "Appended node");
        Ok(())
    }

    fn insert_before(&self, sibling: NodeId, node: NodeId) -> Result<()> {
        self.write().before(sibling, node)
    }

    fn insert_after(&self, sibling: NodeId, node: NodeId) -> Result<()> {
        self.write().after(sibling, node)
    }

    fn save_as_root(&self, id: NodeId) -> Result<()> {
        self.write().save_as_root(id)?;
        tracing::debug!(node = %id, "Saved node as root");
        Ok(())
    }

    fn create(&self, parent: Option<NodeId>, attributes: Attributes) -> Result<TreeNode> {
        let mut state = self.write();
        let id = state.create(parent, attributes)?;
        let record = state.record(id)?;
        tracing::debug!(node = %id, parent = ?parent, "Created node");
        Ok(state.to_node(record))
    }

    fn update_attributes(&self, id: NodeId, mut attributes: Attributes) -> Result<TreeNode> {
        let mut state = self.write();
        let scope_attributes = state.scope_attributes.clone();
        let record = state
            .records
            .get_mut(&id)
            .ok_or(BackendError::NodeNotFound { id })?;
        // A node never leaves its tree partition through a payload update.
        for name in &scope_attributes {
            match record.attributes.get(name) {
                Some(value) => attributes.insert(name.clone(), value.clone()),
                None => attributes.remove(name),
            };
        }
        record.attributes = attributes;
        let record = state.record(id)?;
        Ok(state.to_node(record))
    }

    fn delete(&self, id: NodeId) -> Result<usize> {
        let removed = self.write().delete(id)?;
        tracing::debug!(node = %id, removed, "Deleted subtree");
        Ok(removed)
    }

    fn fix_tree(&self, scope: &Scope) -> Result<usize> {
        let fixed = self.write().fix_tree(scope);
        tracing::info!(fixed, "Rebuilt tree structure");
        Ok(fixed)
    }

    fn begin(&self) -> Result<()> {
        let snapshot = self.read().clone();
        self.restore_points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(snapshot);
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.restore_points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .map(drop)
            .ok_or_else(|| BackendError::NoRestorePoint { operation: "commit" }.into())
    }

    fn rollback(&self) -> Result<()> {
        let snapshot = self
            .restore_points
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .ok_or(BackendError::NoRestorePoint {
                operation: "rollback",
            })?;
        *self.write() = snapshot;
        tracing::debug!("Rolled back to restore point");
        Ok(())
    }
}
