//! Parent selector options
//!
//! Lists every node that could become the parent of the node being created
//! or edited, indented by depth, and decides which of them must be disabled:
//! the edited node itself and anything inside its subtree. Offering only the
//! remaining options is what keeps drag-free reparenting from creating a
//! cycle.

use std::collections::HashSet;

use serde::Serialize;

use crate::Result;
use crate::constants::{DEPTH_MARKER, MIN_DEPTH, PARENT_NODE_LABEL};
use crate::node::{NodeId, TreeNode};
use crate::page::PageError;
use crate::scope::TreeScope;

/// One entry of the parent selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParentOption {
    pub id: NodeId,
    pub label: String,
}

/// Parent selector built from a scope.
pub struct ParentSelect<'a> {
    scope: &'a dyn TreeScope,
    options: Vec<ParentOption>,
}

impl<'a> ParentSelect<'a> {
    /// Loads every visible node in default order and labels it with
    /// `label_attribute`, prefixed by one depth marker per level.
    ///
    /// Fails with `StructuralCorruption` if any node reports a depth below
    /// zero; the tree has to be repaired before it can be edited safely.
    pub fn make(scope: &'a dyn TreeScope, label_attribute: &str) -> Result<Self> {
        let options = scope
            .nodes()?
            .iter()
            .map(|node| {
                Ok(ParentOption {
                    id: node.id,
                    label: option_label(node, label_attribute)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { scope, options })
    }

    /// Field label of the selector.
    pub fn label(&self) -> &'static str {
        PARENT_NODE_LABEL
    }

    /// All options in tree order, including disabled ones.
    pub fn options(&self) -> &[ParentOption] {
        &self.options
    }

    /// Whether `candidate` must not be offered as the parent of `for_node`.
    ///
    /// Nothing is disallowed while creating (`for_node` is `None`).
    pub fn is_disallowed(&self, candidate: NodeId, for_node: Option<&TreeNode>) -> Result<bool> {
        let Some(node) = for_node else {
            return Ok(false);
        };
        if candidate == node.id {
            return Ok(true);
        }
        Ok(self.scope.descendants(node.id)?.contains(&candidate))
    }

    /// Options that may be chosen as the parent of `for_node`.
    pub fn eligible_options(&self, for_node: Option<&TreeNode>) -> Result<Vec<&ParentOption>> {
        let Some(node) = for_node else {
            return Ok(self.options.iter().collect());
        };
        let mut disallowed: HashSet<NodeId> = self.scope.descendants(node.id)?.into_iter().collect();
        disallowed.insert(node.id);
        Ok(self
            .options
            .iter()
            .filter(|option| !disallowed.contains(&option.id))
            .collect())
    }
}

/// `"-- -- Title"`-style label: one marker per depth level, then the title.
fn option_label(node: &TreeNode, label_attribute: &str) -> Result<String> {
    if node.depth < MIN_DEPTH {
        tracing::warn!(node = %node.id, depth = node.depth, "Corrupted tree node, fix the tree");
        return Err(PageError::StructuralCorruption {
            id: node.id,
            depth: node.depth,
        }
        .into());
    }
    let prefix = DEPTH_MARKER.repeat(node.depth as usize);
    let title = node.attribute_text(label_attribute);
    Ok(format!("{prefix} {title}").trim().to_string())
}
