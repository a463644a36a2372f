//! Structural repair for the in-memory engine
//!
//! `fix_tree` trusts only `parent_id` and the existing sibling order (by
//! `left`), and renumbers every interval of the affected partitions from
//! scratch. Nodes that cannot be reached from a root, because their parent
//! is missing or part of a parent cycle, are promoted to roots after the
//! real roots.

use std::collections::{BTreeSet, HashMap};

use super::State;
use super::structure::{PartitionKey, default_order};
use crate::{backend::Scope, node::NodeId};

/// Target coordinates computed for one node.
struct Placement {
    id: NodeId,
    parent: Option<NodeId>,
    left: i64,
    right: i64,
}

type Dictionary = HashMap<Option<NodeId>, Vec<NodeId>>;

impl State {
    /// Repairs every partition holding at least one node visible through
    /// `scope`. Returns the number of nodes that changed.
    pub(crate) fn fix_tree(&mut self, scope: &Scope) -> usize {
        let keys: BTreeSet<PartitionKey> = self
            .records
            .values()
            .filter(|record| scope.matches(&record.attributes))
            .map(|record| self.partition_key(&record.attributes))
            .collect();
        keys.iter().map(|key| self.fix_partition(key)).sum()
    }

    fn fix_partition(&mut self, key: &PartitionKey) -> usize {
        let mut ordered: Vec<_> = self.partition(key).collect();
        ordered.sort_by(|a, b| default_order(a, b));

        let mut dictionary = Dictionary::new();
        let mut groups: Vec<Option<NodeId>> = Vec::new();
        for record in &ordered {
            let siblings = dictionary.entry(record.parent_id).or_insert_with(|| {
                groups.push(record.parent_id);
                Vec::new()
            });
            siblings.push(record.id);
        }

        let mut plan = Vec::with_capacity(ordered.len());
        let mut cut = 1;
        if let Some(roots) = dictionary.remove(&None) {
            cut = place(&mut dictionary, roots, None, cut, &mut plan);
        }
        for group in groups {
            if let Some(orphans) = dictionary.remove(&group) {
                tracing::warn!(
                    parent = ?group,
                    count = orphans.len(),
                    "Promoting unreachable nodes to roots"
                );
                cut = place(&mut dictionary, orphans, None, cut, &mut plan);
            }
        }

        let mut changed = 0;
        for placement in plan {
            if let Some(record) = self.records.get_mut(&placement.id) {
                if record.left != placement.left
                    || record.right != placement.right
                    || record.parent_id != placement.parent
                {
                    record.left = placement.left;
                    record.right = placement.right;
                    record.parent_id = placement.parent;
                    changed += 1;
                }
            }
        }
        changed
    }
}

/// Numbers `nodes` and their subtrees depth-first starting at `cut`.
///
/// Every group is removed from the dictionary as it is consumed, so a parent
/// cycle cannot be entered twice. Returns the next free bound.
fn place(
    dictionary: &mut Dictionary,
    nodes: Vec<NodeId>,
    parent: Option<NodeId>,
    mut cut: i64,
    plan: &mut Vec<Placement>,
) -> i64 {
    for id in nodes {
        let left = cut;
        cut += 1;
        if let Some(children) = dictionary.remove(&Some(id)) {
            cut = place(dictionary, children, Some(id), cut, plan);
        }
        plan.push(Placement {
            id,
            parent,
            left,
            right: cut,
        });
        cut += 1;
    }
    cut
}
