//! Constants used throughout the nestree library.
//!
//! Central definitions for user-facing strings and structural sentinels.

/// Parent component of a tree key for root nodes.
pub const ROOT_PARENT_KEY: &str = "-1";

/// Depth marker repeated once per level in parent option labels.
pub const DEPTH_MARKER: &str = "--";

/// Smallest depth a well-formed node can report.
pub const MIN_DEPTH: i64 = 0;

/// Field label of the parent selector.
pub const PARENT_NODE_LABEL: &str = "Parent node";

/// Notification title after a successful move.
pub const ITEM_MOVED: &str = "Item moved";

/// Notification title after a successful repair.
pub const TREE_FIXED: &str = "Tree fixed";

/// Notification title after a node was created.
pub const ITEM_CREATED: &str = "Item created";

/// Notification title after a node was saved.
pub const ITEM_SAVED: &str = "Item saved";

/// Notification title after a node was deleted.
pub const ITEM_DELETED: &str = "Item deleted";

/// Rejection reason when the configuration forbids a deletion.
pub const CANNOT_DELETE: &str = "Cannot delete tree node.";
