//! Nested view of a tree, as a front end renders it.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::helpers::tree_key;
use crate::model::TreeDefinition;
use crate::node::{NodeId, TreeNode};
use crate::page::UiStateStore;

/// One rendered row with its children.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeBranch {
    pub node: TreeNode,
    /// [`tree_key`] of the node; changes whenever the row moves.
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    pub collapsed: bool,
    pub children: Vec<TreeBranch>,
}

impl TreeBranch {
    /// Number of rows in this branch, including itself.
    pub fn row_count(&self) -> usize {
        1 + self.children.iter().map(TreeBranch::row_count).sum::<usize>()
    }
}

/// Nests `nodes` (in default order) by `parent_id`.
///
/// Nodes whose parent is not among `nodes` are shown as roots. Nodes caught
/// in a parent cycle are appended as roots after everything reachable, so a
/// corrupted tree still renders every row exactly once.
pub(crate) fn build(
    nodes: Vec<TreeNode>,
    definition: &TreeDefinition,
    ui_state: &dyn UiStateStore,
) -> Vec<TreeBranch> {
    let visible: HashSet<NodeId> = nodes.iter().map(|node| node.id).collect();
    let mut groups: BTreeMap<Option<NodeId>, Vec<TreeNode>> = BTreeMap::new();
    let mut detached = Vec::new();
    for node in nodes {
        match node.parent_id {
            Some(parent) if parent == node.id => detached.push(node),
            Some(parent) if visible.contains(&parent) => {
                groups.entry(Some(parent)).or_default().push(node)
            }
            _ => groups.entry(None).or_default().push(node),
        }
    }

    let builder = Builder {
        definition,
        ui_state,
    };
    let roots = groups.remove(&None).unwrap_or_default();
    let mut branches: Vec<TreeBranch> = roots
        .into_iter()
        .map(|node| builder.branch(node, &mut groups))
        .collect();

    detached.extend(std::mem::take(&mut groups).into_values().flatten());
    if !detached.is_empty() {
        tracing::warn!(count = detached.len(), "Tree nodes unreachable from any root");
    }
    branches.extend(
        detached
            .into_iter()
            .map(|node| builder.branch(node, &mut BTreeMap::new())),
    );
    branches
}

struct Builder<'a> {
    definition: &'a TreeDefinition,
    ui_state: &'a dyn UiStateStore,
}

impl Builder<'_> {
    fn branch(
        &self,
        node: TreeNode,
        groups: &mut BTreeMap<Option<NodeId>, Vec<TreeNode>>,
    ) -> TreeBranch {
        let children = groups
            .remove(&Some(node.id))
            .unwrap_or_default()
            .into_iter()
            .map(|child| self.branch(child, groups))
            .collect();
        TreeBranch {
            key: tree_key(&node),
            title: self.definition.title(&node),
            caption: self.definition.caption(&node),
            collapsed: self.ui_state.is_collapsed(node.id),
            children,
            node,
        }
    }
}
