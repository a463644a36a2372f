//! Tree node model
//!
//! A [`TreeNode`] is one record participating in a nested-set tree. Its
//! structural coordinates are the `(left, right)` interval, the `parent_id`
//! link and the computed `depth`; everything else lives in the free-form
//! [`Attributes`] payload.
//!
//! The interval encoding gives ancestor/descendant tests without recursion:
//! B is a descendant of A iff `A.left < B.left` and `B.right < A.right`.

mod id;

pub use id::NodeId;

use serde::{Deserialize, Serialize};

/// Payload attributes of a node, stored verbatim.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// A record in a nested-set tree.
///
/// Nodes handed out by a [`NestedSet`](crate::backend::NestedSet) are
/// snapshots. They do not track later changes to the store; re-read the node
/// after any structural operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    /// Stable identifier.
    pub id: NodeId,
    /// Parent identifier, `None` for a root.
    pub parent_id: Option<NodeId>,
    /// Left interval bound.
    pub left: i64,
    /// Right interval bound.
    pub right: i64,
    /// Distance from the root, computed on read.
    ///
    /// A node whose own interval is inverted is not contained by any interval
    /// in its tree, including its own, so it reports `-1`.
    #[serde(default)]
    pub depth: i64,
    /// Free-form payload.
    #[serde(default)]
    pub attributes: Attributes,
}

impl TreeNode {
    /// Whether this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether the node's bounds satisfy `left < right`.
    pub fn has_valid_bounds(&self) -> bool {
        self.left < self.right
    }

    /// Whether `other` lies strictly inside this node's interval.
    pub fn is_ancestor_of(&self, other: &TreeNode) -> bool {
        self.left < other.left && other.right < self.right
    }

    /// Whether this node lies strictly inside `other`'s interval.
    pub fn is_descendant_of(&self, other: &TreeNode) -> bool {
        other.is_ancestor_of(self)
    }

    /// Number of descendants implied by the interval width.
    ///
    /// Only meaningful for a contiguous numbering, which every engine
    /// operation maintains.
    pub fn descendant_count(&self) -> i64 {
        ((self.right - self.left - 1) / 2).max(0)
    }

    /// Look up a payload attribute.
    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }

    /// Render a payload attribute for display.
    ///
    /// Strings are returned without quotes, `null` and missing attributes as
    /// an empty string, anything else in its JSON form.
    pub fn attribute_text(&self, name: &str) -> String {
        match self.attributes.get(name) {
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        }
    }
}
