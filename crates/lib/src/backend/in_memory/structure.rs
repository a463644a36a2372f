//! Interval arithmetic for the in-memory engine
//!
//! Every positional operation reduces to [`State::move_to`]: relocate the
//! subtree `[lft, rgt]` so that its left bound lands on `position`, shifting
//! the nodes in between by the subtree's width. Nodes outside the affected
//! range keep their bounds.

use std::{cmp::Ordering, collections::HashMap};

use super::{Record, State};
use crate::{
    Result,
    backend::{Scope, errors::BackendError},
    node::{Attributes, NodeId, TreeNode},
};

/// Identity of one independent tree: the rendered scope-attribute values.
pub(crate) type PartitionKey = Vec<String>;

impl State {
    pub(crate) fn record(&self, id: NodeId) -> Result<&Record> {
        self.records
            .get(&id)
            .ok_or_else(|| BackendError::NodeNotFound { id }.into())
    }

    pub(crate) fn partition_key(&self, attributes: &Attributes) -> PartitionKey {
        self.scope_attributes
            .iter()
            .map(|name| match attributes.get(name) {
                Some(value) => value.to_string(),
                None => "null".to_string(),
            })
            .collect()
    }

    pub(crate) fn partition(&self, key: &PartitionKey) -> impl Iterator<Item = &Record> + '_ {
        let key = key.clone();
        self.records
            .values()
            .filter(move |record| self.partition_key(&record.attributes) == key)
    }

    /// Number of nodes in the partition whose interval holds `record.left`,
    /// minus one for the node itself.
    fn depth_in(&self, key: &PartitionKey, record: &Record) -> i64 {
        let containing = self
            .partition(key)
            .filter(|other| other.left <= record.left && record.left <= other.right)
            .count();
        containing as i64 - 1
    }

    pub(crate) fn to_node(&self, record: &Record) -> TreeNode {
        let key = self.partition_key(&record.attributes);
        TreeNode {
            id: record.id,
            parent_id: record.parent_id,
            left: record.left,
            right: record.right,
            depth: self.depth_in(&key, record),
            attributes: record.attributes.clone(),
        }
    }

    /// Nodes visible through `scope`, ordered by partition then `left`.
    ///
    /// Partition keys are computed once per record and depths are counted
    /// within each partition's bounds.
    pub(crate) fn nodes(&self, scope: &Scope) -> Vec<TreeNode> {
        let mut partitions: HashMap<PartitionKey, Vec<(i64, i64)>> = HashMap::new();
        let mut visible: Vec<(PartitionKey, &Record)> = Vec::new();
        for record in self.records.values() {
            let key = self.partition_key(&record.attributes);
            partitions
                .entry(key.clone())
                .or_default()
                .push((record.left, record.right));
            if scope.matches(&record.attributes) {
                visible.push((key, record));
            }
        }

        let mut keyed: Vec<(PartitionKey, TreeNode)> = visible
            .into_iter()
            .map(|(key, record)| {
                let bounds = partitions.get(&key).map(Vec::as_slice).unwrap_or_default();
                let containing = bounds
                    .iter()
                    .filter(|(left, right)| *left <= record.left && record.left <= *right)
                    .count();
                let node = TreeNode {
                    id: record.id,
                    parent_id: record.parent_id,
                    left: record.left,
                    right: record.right,
                    depth: containing as i64 - 1,
                    attributes: record.attributes.clone(),
                };
                (key, node)
            })
            .collect();
        keyed.sort_by(|(ka, a), (kb, b)| {
            ka.cmp(kb)
                .then(a.left.cmp(&b.left))
                .then(a.id.cmp(&b.id))
        });
        keyed.into_iter().map(|(_, node)| node).collect()
    }

    /// Highest right bound in a partition, `0` when it is empty.
    fn upper_bound(&self, key: &PartitionKey) -> i64 {
        self.partition(key)
            .map(|record| record.right)
            .max()
            .unwrap_or(0)
    }

    fn ensure_same_partition(&self, id: NodeId, target: NodeId) -> Result<()> {
        let node = self.record(id)?;
        let anchor = self.record(target)?;
        if self.partition_key(&node.attributes) != self.partition_key(&anchor.attributes) {
            return Err(BackendError::ScopeMismatch { id, target }.into());
        }
        Ok(())
    }

    /// Other nodes with the same parent, ordered by `left`.
    pub(crate) fn siblings(&self, id: NodeId) -> Result<Vec<&Record>> {
        let record = self.record(id)?;
        let key = self.partition_key(&record.attributes);
        let mut siblings: Vec<&Record> = self
            .partition(&key)
            .filter(|other| other.id != id && other.parent_id == record.parent_id)
            .collect();
        siblings.sort_by_key(|other| (other.left, other.id));
        Ok(siblings)
    }

    pub(crate) fn children_count(&self, id: NodeId) -> Result<usize> {
        let record = self.record(id)?;
        let key = self.partition_key(&record.attributes);
        Ok(self
            .partition(&key)
            .filter(|other| other.parent_id == Some(id))
            .count())
    }

    pub(crate) fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let record = self.record(id)?;
        let key = self.partition_key(&record.attributes);
        let mut inside: Vec<&Record> = self
            .partition(&key)
            .filter(|other| record.left < other.left && other.right < record.right)
            .collect();
        inside.sort_by_key(|other| (other.left, other.id));
        Ok(inside.into_iter().map(|other| other.id).collect())
    }

    fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(record) = self.records.get_mut(&id) {
            record.parent_id = parent;
        }
    }

    /// Relocates the subtree of `id` so that its left bound lands on `position`.
    ///
    /// `target` is only used for error reporting.
    fn move_to(&mut self, id: NodeId, position: i64, target: NodeId) -> Result<()> {
        let record = self.record(id)?;
        let (lft, rgt) = (record.left, record.right);
        if lft < position && position <= rgt {
            return Err(BackendError::MoveIntoSelf { id, target }.into());
        }
        let key = self.partition_key(&record.attributes);

        let from = lft.min(position);
        let to = rgt.max(position - 1);
        let mut height = rgt - lft + 1;
        let mut distance = to - from + 1 - height;
        if position > lft {
            height = -height;
        } else {
            distance = -distance;
        }
        if distance == 0 {
            return Ok(());
        }

        let shift = move |bound: i64| {
            if lft <= bound && bound <= rgt {
                bound + distance
            } else if from <= bound && bound <= to {
                bound + height
            } else {
                bound
            }
        };

        let affected: Vec<NodeId> = self.partition(&key).map(|other| other.id).collect();
        for other in affected {
            if let Some(other) = self.records.get_mut(&other) {
                other.left = shift(other.left);
                other.right = shift(other.right);
            }
        }
        Ok(())
    }

    /// Opens a gap of `height` at `position` by shifting every bound at or
    /// after it.
    fn make_gap(&mut self, key: &PartitionKey, position: i64, height: i64) {
        let affected: Vec<NodeId> = self.partition(key).map(|other| other.id).collect();
        for other in affected {
            if let Some(other) = self.records.get_mut(&other) {
                if other.left >= position {
                    other.left += height;
                }
                if other.right >= position {
                    other.right += height;
                }
            }
        }
    }

    pub(crate) fn prepend(&mut self, parent: NodeId, id: NodeId) -> Result<()> {
        self.ensure_same_partition(id, parent)?;
        let position = self.record(parent)?.left + 1;
        self.move_to(id, position, parent)?;
        self.set_parent(id, Some(parent));
        Ok(())
    }

    pub(crate) fn append(&mut self, parent: NodeId, id: NodeId) -> Result<()> {
        self.ensure_same_partition(id, parent)?;
        let position = self.record(parent)?.right;
        self.move_to(id, position, parent)?;
        self.set_parent(id, Some(parent));
        Ok(())
    }

    pub(crate) fn before(&mut self, sibling: NodeId, id: NodeId) -> Result<()> {
        if sibling == id {
            return Ok(());
        }
        self.ensure_same_partition(id, sibling)?;
        let anchor = self.record(sibling)?;
        let (position, parent) = (anchor.left, anchor.parent_id);
        self.move_to(id, position, sibling)?;
        self.set_parent(id, parent);
        Ok(())
    }

    pub(crate) fn after(&mut self, sibling: NodeId, id: NodeId) -> Result<()> {
        if sibling == id {
            return Ok(());
        }
        self.ensure_same_partition(id, sibling)?;
        let anchor = self.record(sibling)?;
        let (position, parent) = (anchor.right + 1, anchor.parent_id);
        self.move_to(id, position, sibling)?;
        self.set_parent(id, parent);
        Ok(())
    }

    pub(crate) fn save_as_root(&mut self, id: NodeId) -> Result<()> {
        let record = self.record(id)?;
        let key = self.partition_key(&record.attributes);
        let position = self.upper_bound(&key) + 1;
        self.move_to(id, position, id)?;
        self.set_parent(id, None);
        Ok(())
    }

    pub(crate) fn up(&mut self, id: NodeId, amount: usize) -> Result<bool> {
        if amount == 0 {
            return Ok(false);
        }
        let left = self.record(id)?.left;
        let target = self
            .siblings(id)?
            .into_iter()
            .rev()
            .filter(|other| other.left < left)
            .nth(amount - 1)
            .map(|other| other.id);
        match target {
            Some(sibling) => {
                self.before(sibling, id)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub(crate) fn down(&mut self, id: NodeId, amount: usize) -> Result<bool> {
        if amount == 0 {
            return Ok(false);
        }
        let left = self.record(id)?.left;
        let target = self
            .siblings(id)?
            .into_iter()
            .filter(|other| other.left > left)
            .nth(amount - 1)
            .map(|other| other.id);
        match target {
            Some(sibling) => {
                self.after(sibling, id)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub(crate) fn create(&mut self, parent: Option<NodeId>, attributes: Attributes) -> Result<NodeId> {
        let id = NodeId::new(self.next_id.max(1));
        let key = self.partition_key(&attributes);

        let left = match parent {
            Some(parent) => {
                let anchor = self.record(parent)?;
                if self.partition_key(&anchor.attributes) != key {
                    return Err(BackendError::ScopeMismatch { id, target: parent }.into());
                }
                let position = anchor.right;
                self.make_gap(&key, position, 2);
                position
            }
            None => self.upper_bound(&key) + 1,
        };

        self.records.insert(
            id,
            Record {
                id,
                parent_id: parent,
                left,
                right: left + 1,
                attributes,
            },
        );
        self.next_id = id.get() + 1;
        Ok(id)
    }

    /// Removes the subtree of `id` and closes the gap it leaves.
    pub(crate) fn delete(&mut self, id: NodeId) -> Result<usize> {
        let record = self.record(id)?;
        let (lft, rgt) = (record.left, record.right);
        let key = self.partition_key(&record.attributes);

        let mut doomed: Vec<NodeId> = self
            .partition(&key)
            .filter(|other| other.left >= lft && other.right <= rgt)
            .map(|other| other.id)
            .collect();
        if !doomed.contains(&id) {
            doomed.push(id);
        }
        for doomed_id in &doomed {
            self.records.remove(doomed_id);
        }

        let height = rgt - lft + 1;
        if height > 0 {
            let remaining: Vec<NodeId> = self.partition(&key).map(|other| other.id).collect();
            for other in remaining {
                if let Some(other) = self.records.get_mut(&other) {
                    if other.left > rgt {
                        other.left -= height;
                    }
                    if other.right > rgt {
                        other.right -= height;
                    }
                }
            }
        }
        Ok(doomed.len())
    }
}

/// Orders records by their stored interval, breaking ties by id.
pub(crate) fn default_order(a: &Record, b: &Record) -> Ordering {
    a.left.cmp(&b.left).then(a.id.cmp(&b.id))
}
