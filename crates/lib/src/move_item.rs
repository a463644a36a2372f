//! Drag-and-drop reposition of a node
//!
//! [`MoveItem`] turns "put this node at position `to` under parent `P`" into
//! the engine's primitives. The nested-set engine only offers atomic
//! prepend/append and "shift by N among siblings", so every move is composed
//! from at most two of them:
//!
//! 1. Same parent: a pure sibling permutation, `up` or `down` by
//!    `from - to`.
//! 2. New parent is `None`: `save_as_root` (lands after every root), then
//!    `up` until exactly `to` roots precede the node.
//! 3. Any other parent: `prepend_node` (lands at position 0), then `down`
//!    by `to`.
//!
//! `MoveItem` does not check whether the new parent lies inside the moved
//! subtree. Callers restrict the offered parents with
//! [`ParentSelect`](crate::parent_select::ParentSelect); the engine itself
//! rejects such a move with `MoveIntoSelf`, and the surrounding
//! [`TreeScope::atomically`] leaves the tree as it was.

use std::cmp::Ordering;

use crate::Result;
use crate::node::{NodeId, TreeNode};
use crate::scope::TreeScope;

/// What a move ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Same parent and same position.
    Unchanged,
    /// Reordered among the current siblings from position `from` towards
    /// position `to`.
    Reordered { from: usize, to: usize },
    /// Detached into a root.
    MovedToRoot,
    /// Attached under a different parent.
    Reparented { parent: NodeId },
}

/// Reposition algorithm for drag-and-drop moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveItem;

impl MoveItem {
    /// Moves `node` under `parent` (a root when `None`) at sibling position
    /// `to`, where `from` is its current position.
    ///
    /// Positions are 0-indexed in sibling order. The whole move runs inside
    /// [`TreeScope::atomically`]; a missing parent fails with `NodeNotFound`
    /// before anything is changed.
    pub fn apply<S>(
        &self,
        scope: &S,
        node: &TreeNode,
        parent: Option<NodeId>,
        from: usize,
        to: usize,
    ) -> Result<Movement>
    where
        S: TreeScope + ?Sized,
    {
        let mut movement = Movement::Unchanged;
        scope.atomically(&mut || {
            movement = self.reposition(scope, node, parent, from, to)?;
            Ok(())
        })?;
        tracing::debug!(node = %node.id, ?movement, "Moved tree item");
        Ok(movement)
    }

    fn reposition<S>(
        &self,
        scope: &S,
        node: &TreeNode,
        parent: Option<NodeId>,
        from: usize,
        to: usize,
    ) -> Result<Movement>
    where
        S: TreeScope + ?Sized,
    {
        if parent == node.parent_id {
            return self.reorder(scope, node.id, from, to);
        }

        match parent {
            None => self.move_to_root(scope, node.id, to),
            Some(parent) => {
                let parent = scope.find(parent)?;
                scope.prepend_node(parent.id, node.id)?;
                if to > 0 {
                    shift_down(scope, node.id, to)?;
                }
                Ok(Movement::Reparented { parent: parent.id })
            }
        }
    }

    fn reorder<S>(&self, scope: &S, id: NodeId, from: usize, to: usize) -> Result<Movement>
    where
        S: TreeScope + ?Sized,
    {
        match from.cmp(&to) {
            Ordering::Equal => return Ok(Movement::Unchanged),
            Ordering::Greater => shift_up(scope, id, from - to)?,
            Ordering::Less => shift_down(scope, id, to - from)?,
        }
        Ok(Movement::Reordered { from, to })
    }

    fn move_to_root<S>(&self, scope: &S, id: NodeId, position: usize) -> Result<Movement>
    where
        S: TreeScope + ?Sized,
    {
        scope.save_as_root(id)?;

        // The node now sits after `siblings` other roots.
        let siblings = scope.siblings_count(id)?;
        if siblings > position {
            shift_up(scope, id, siblings - position)?;
        }
        Ok(Movement::MovedToRoot)
    }
}

fn shift_up<S: TreeScope + ?Sized>(scope: &S, id: NodeId, amount: usize) -> Result<()> {
    if !scope.up(id, amount)? {
        tracing::debug!(node = %id, amount, "Not enough previous siblings to shift up");
    }
    Ok(())
}

fn shift_down<S: TreeScope + ?Sized>(scope: &S, id: NodeId, amount: usize) -> Result<()> {
    if !scope.down(id, amount)? {
        tracing::debug!(node = %id, amount, "Not enough next siblings to shift down");
    }
    Ok(())
}
