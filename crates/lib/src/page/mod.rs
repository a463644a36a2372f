//! Tree page
//!
//! [`TreePage`] is the event boundary of a tree editor. A front end forwards
//! user actions (a drag-and-drop move, the "fix tree" button, the create,
//! edit and delete forms) to its handlers and gets back a [`Response`]: the
//! [`TreeEvent`]s naming which rendered parts went stale, in emission order,
//! and the notification to show.
//!
//! Errors the user can act on are reported as danger notifications. Lookups
//! of missing nodes, corruption and rejected form actions are returned as
//! errors instead, so the caller decides how to surface them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::config::TreeConfig;
use crate::constants::{CANNOT_DELETE, ITEM_CREATED, ITEM_DELETED, ITEM_MOVED, ITEM_SAVED, TREE_FIXED};
use crate::model::TreeDefinition;
use crate::move_item::MoveItem;
use crate::node::{Attributes, NodeId, TreeNode};
use crate::parent_select::ParentSelect;
use crate::scope::TreeScope;

pub mod errors;
mod events;
mod ui_state;
mod view;

pub use errors::PageError;
pub use events::{Notification, NotificationLevel, Response, TreeEvent};
pub use ui_state::{InMemoryUiState, UiStateStore};
pub use view::TreeBranch;

/// A drag-and-drop move reported by the front end.
///
/// `ancestor` is the container the node was dragged out of and `parent` the
/// one it was dropped into, both as raw identifiers. An empty string or a
/// missing value means the list of roots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMoved {
    pub id: NodeId,
    #[serde(default)]
    pub ancestor: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    pub from: usize,
    pub to: usize,
}

/// Editor for one tree.
pub struct TreePage {
    scope: Arc<dyn TreeScope>,
    definition: TreeDefinition,
    config: TreeConfig,
    ui_state: Arc<dyn UiStateStore>,
}

impl TreePage {
    /// Sets up a page, failing with `InvalidModel` if `definition` cannot be
    /// used with `scope`.
    pub fn new(
        scope: Arc<dyn TreeScope>,
        definition: TreeDefinition,
        config: TreeConfig,
        ui_state: Arc<dyn UiStateStore>,
    ) -> Result<Self> {
        definition.validate(scope.as_ref())?;
        tracing::debug!(
            label = %definition.label_attribute,
            scoped = !scope.scope().is_unscoped(),
            "Tree page ready"
        );
        Ok(Self {
            scope,
            definition,
            config,
            ui_state,
        })
    }

    pub fn scope(&self) -> &dyn TreeScope {
        self.scope.as_ref()
    }

    pub fn definition(&self) -> &TreeDefinition {
        &self.definition
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Applies a drag-and-drop move.
    ///
    /// Fails with `NodeNotFound` if the moved node or the new parent does
    /// not exist. A move the engine refuses (e.g. into the node's own
    /// subtree) leaves the tree untouched and is reported as a danger
    /// notification without events.
    pub fn on_node_moved(&self, moved: NodeMoved) -> Result<Response> {
        let ancestor = parse_reference(moved.ancestor.as_deref())?;
        let parent = parse_reference(moved.parent.as_deref())?;
        let node = self.scope.find(moved.id)?;

        match MoveItem.apply(self.scope.as_ref(), &node, parent, moved.from, moved.to) {
            Ok(_) => {}
            Err(err) if err.is_logical_error() => {
                tracing::warn!(node = %node.id, error = %err, "Tree move rejected");
                return Ok(Response::default().notify(Notification::danger(err.to_string())));
            }
            Err(err) => return Err(err),
        }

        let mut response = Response::default();
        response.emit(TreeEvent::Refresh(node.id));
        if let Some(ancestor) = ancestor {
            response.emit(TreeEvent::Refresh(ancestor));
        }
        if let Some(parent) = parent {
            response.emit(TreeEvent::Refresh(parent));
        }
        if ancestor.is_none() || parent.is_none() {
            response.emit(TreeEvent::Updated);
        }
        tracing::info!(node = %node.id, from = moved.from, to = moved.to, "Tree item moved");
        Ok(response.notify(Notification::success(ITEM_MOVED)))
    }

    /// Rebuilds the tree structure from parent links.
    ///
    /// The whole tree is marked stale before the repair runs, so the
    /// front end reloads even when the repair fails.
    pub fn on_fix_tree_requested(&self) -> Response {
        let mut response = Response::default();
        response.emit(TreeEvent::Updated);

        match self.scope.fix_tree() {
            Ok(changed) => {
                tracing::info!(changed, "Tree fixed");
                response.notify(Notification::success(TREE_FIXED))
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to fix tree");
                response.notify(Notification::danger(err.to_string()))
            }
        }
    }

    /// Creates a node as the last child of `parent`, or as the last root.
    pub fn create_node(
        &self,
        parent: Option<NodeId>,
        attributes: Attributes,
    ) -> Result<(TreeNode, Response)> {
        let node = self.scope.create(parent, attributes)?;
        tracing::info!(node = %node.id, parent = ?parent, "Tree item created");

        let mut response = Response::default();
        response.emit(TreeEvent::Updated);
        Ok((node, response.notify(Notification::success(ITEM_CREATED))))
    }

    /// Saves the edit form of a node.
    ///
    /// `parent` is only honored while the parent selector is shown. Moving
    /// a node under itself or one of its descendants is rejected with
    /// `OperationRejected` before anything is written.
    pub fn edit_node(
        &self,
        id: NodeId,
        attributes: Attributes,
        parent: Option<NodeId>,
    ) -> Result<(TreeNode, Response)> {
        let node = self.scope.find(id)?;
        let original_parent = node.parent_id;
        let reparent = self.config.show_parent_select_while_edit && parent != original_parent;

        if reparent && let Some(parent) = parent {
            let select = ParentSelect::make(self.scope.as_ref(), &self.definition.label_attribute)?;
            if select.is_disallowed(parent, Some(&node))? {
                return Err(PageError::OperationRejected {
                    reason: format!("Node {parent} cannot become the parent of node {id}"),
                }
                .into());
            }
        }

        let scope = self.scope.as_ref();
        scope.atomically(&mut || {
            if reparent {
                match parent {
                    Some(parent) => scope.append_node(parent, id)?,
                    None => scope.save_as_root(id)?,
                }
            }
            scope.update_attributes(id, attributes.clone()).map(drop)
        })?;
        let saved = scope.find(id)?;
        tracing::info!(node = %id, reparented = reparent, "Tree item saved");

        let mut response = Response::default();
        if self.config.show_parent_select_while_edit {
            let updated_parent = saved.parent_id;
            if let Some(original) = original_parent {
                response.emit(TreeEvent::Refresh(original));
            }
            if let Some(updated) = updated_parent {
                response.emit(TreeEvent::Refresh(updated));
            }
            if original_parent.is_none() || updated_parent.is_none() {
                response.emit(TreeEvent::Updated);
            }
        }
        Ok((saved, response.notify(Notification::success(ITEM_SAVED))))
    }

    /// Whether the configuration allows deleting `node`.
    ///
    /// Nodes with children are protected unless `allow-delete-parent` is
    /// set; roots with children additionally need `allow-delete-root`.
    pub fn can_be_deleted(&self, node: &TreeNode) -> Result<bool> {
        let has_children = self.scope.children_count(node.id)? > 0;
        if !self.config.allow_delete_parent && has_children {
            return Ok(false);
        }
        Ok(!(!self.config.allow_delete_root && has_children && node.is_root()))
    }

    /// Deletes a node with its subtree.
    pub fn delete_node(&self, id: NodeId) -> Result<Response> {
        let node = self.scope.find(id)?;
        if !self.can_be_deleted(&node)? {
            tracing::warn!(node = %id, "Tree item deletion rejected");
            return Err(PageError::OperationRejected {
                reason: CANNOT_DELETE.to_string(),
            }
            .into());
        }

        let removed = self.scope.delete(id)?;
        tracing::info!(node = %id, removed, "Tree item deleted");

        let mut response = Response::default();
        response.emit(TreeEvent::Updated);
        Ok(response.notify(Notification::success(ITEM_DELETED)))
    }

    /// The whole tree, nested, in sibling order.
    pub fn tree(&self) -> Result<Vec<TreeBranch>> {
        let nodes = self.scope.nodes()?;
        Ok(view::build(nodes, &self.definition, self.ui_state.as_ref()))
    }

    /// Parent selector for the create and edit forms.
    pub fn parent_select(&self) -> Result<ParentSelect<'_>> {
        ParentSelect::make(self.scope.as_ref(), &self.definition.label_attribute)
    }

    pub fn is_collapsed(&self, id: NodeId) -> bool {
        self.ui_state.is_collapsed(id)
    }

    /// Flips the collapsed state of a row and returns the new state.
    pub fn toggle_collapsed(&self, id: NodeId) -> bool {
        let collapsed = !self.ui_state.is_collapsed(id);
        self.ui_state.set_collapsed(id, collapsed);
        collapsed
    }
}

/// Reads a raw node reference; empty means none.
fn parse_reference(raw: Option<&str>) -> Result<Option<NodeId>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<NodeId>().map(Some).map_err(|_| {
            crate::Error::from(PageError::OperationRejected {
                reason: format!("Invalid node reference '{raw}'"),
            })
        }),
    }
}
