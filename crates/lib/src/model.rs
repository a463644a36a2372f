//! Tree record definitions
//!
//! A [`TreeDefinition`] describes how the records of one tree are presented:
//! which payload attribute is the node title, which one (if any) is shown
//! next to it, and how the record type is called. A tree page refuses to
//! start on a definition that cannot work with its scope.

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::node::TreeNode;
use crate::page::PageError;
use crate::scope::TreeScope;

/// Default label attribute of a record.
pub const DEFAULT_LABEL_ATTRIBUTE: &str = "title";

/// How records of a tree are labelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TreeDefinition {
    /// Attribute rendered as the node title and parent option label.
    pub label_attribute: String,
    /// Attribute rendered next to the title.
    pub caption_attribute: Option<String>,
    /// Singular name of the record type.
    pub model_label: Option<String>,
}

impl Default for TreeDefinition {
    fn default() -> Self {
        Self {
            label_attribute: DEFAULT_LABEL_ATTRIBUTE.to_string(),
            caption_attribute: None,
            model_label: None,
        }
    }
}

impl TreeDefinition {
    pub fn new(label_attribute: impl Into<String>) -> Self {
        Self {
            label_attribute: label_attribute.into(),
            ..Self::default()
        }
    }

    pub fn with_caption(mut self, attribute: impl Into<String>) -> Self {
        self.caption_attribute = Some(attribute.into());
        self
    }

    pub fn with_model_label(mut self, label: impl Into<String>) -> Self {
        self.model_label = Some(label.into());
        self
    }

    /// Title of a node.
    pub fn title(&self, node: &TreeNode) -> String {
        node.attribute_text(&self.label_attribute)
    }

    /// Caption of a node, if the definition has a non-empty one.
    pub fn caption(&self, node: &TreeNode) -> Option<String> {
        let caption = node.attribute_text(self.caption_attribute.as_deref()?);
        (!caption.is_empty()).then_some(caption)
    }

    /// Checks that records of `scope` can be managed with this definition.
    ///
    /// The label attribute must be set and must not be one of the engine's
    /// scope attributes. A prescoped scope may only filter on scope
    /// attributes, since anything else would hide siblings that still take
    /// part in sibling positions.
    pub fn validate(&self, scope: &dyn TreeScope) -> Result<()> {
        if self.label_attribute.trim().is_empty() {
            return Err(invalid("label attribute is empty"));
        }

        let scope_attributes = scope.backend().scope_attributes();
        if scope_attributes.contains(&self.label_attribute) {
            return Err(invalid(format!(
                "label attribute '{}' is a scope attribute",
                self.label_attribute
            )));
        }

        if let Some(attribute) = scope
            .scope()
            .conditions()
            .keys()
            .find(|attribute| !scope_attributes.contains(attribute))
        {
            return Err(invalid(format!(
                "scope filters on '{attribute}', which does not partition the tree"
            )));
        }

        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> crate::Error {
    PageError::InvalidModel {
        reason: reason.into(),
    }
    .into()
}
