//! Small helpers shared by the tree front ends.

use crate::constants::ROOT_PARENT_KEY;
use crate::node::TreeNode;

/// Identity key of a node's structural position.
///
/// Joins `id`, `left`, `right` and the parent id (or `-1` for a root) with
/// dots. Any reparent or reorder changes the interval and therefore the key,
/// which makes it suitable for deciding when a rendered subtree is stale.
pub fn tree_key(node: &TreeNode) -> String {
    let parent = node
        .parent_id
        .map_or_else(|| ROOT_PARENT_KEY.to_string(), |parent| parent.to_string());
    format!("{}.{}.{}.{}", node.id, node.left, node.right, parent)
}
