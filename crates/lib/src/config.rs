//! Tree page configuration
//!
//! Flags that change what a tree page allows. They are read once when the
//! page is built and never change afterwards. Keys use kebab-case so a JSON
//! file can be written by hand:
//!
//! ```json
//! { "allow-delete-parent": true, "show-parent-select-while-edit": false }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Behavior switches of a tree page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TreeConfig {
    /// Whether a node that still has children may be deleted.
    pub allow_delete_parent: bool,
    /// Whether a root that still has children may be deleted.
    pub allow_delete_root: bool,
    /// Whether editing a node offers a parent selector.
    pub show_parent_select_while_edit: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            allow_delete_parent: false,
            allow_delete_root: false,
            show_parent_select_while_edit: true,
        }
    }
}

impl TreeConfig {
    /// Parses a configuration from JSON; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration file, or the defaults if it does not exist.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No tree config file, using defaults");
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
