//! What a page handler reports back to the front end.

use std::fmt;

use serde::Serialize;

use crate::node::NodeId;

/// Signal that part of the rendered tree is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "event", content = "id", rename_all = "kebab-case")]
pub enum TreeEvent {
    /// The row of this node must be re-rendered.
    Refresh(NodeId),
    /// The list of roots must be re-rendered.
    Updated,
}

impl fmt::Display for TreeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeEvent::Refresh(id) => write!(f, "refresh.{id}"),
            TreeEvent::Updated => f.write_str("updated"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Danger,
}

/// A toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
}

impl Notification {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            title: title.into(),
        }
    }

    pub fn danger(title: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Danger,
            title: title.into(),
        }
    }
}

/// Events in emission order plus an optional notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Response {
    pub events: Vec<TreeEvent>,
    pub notification: Option<Notification>,
}

impl Response {
    pub(crate) fn emit(&mut self, event: TreeEvent) {
        self.events.push(event);
    }

    pub(crate) fn notify(mut self, notification: Notification) -> Self {
        self.notification = Some(notification);
        self
    }

    /// Whether the handler reported success.
    pub fn is_success(&self) -> bool {
        matches!(
            self.notification,
            Some(Notification {
                level: NotificationLevel::Success,
                ..
            })
        )
    }
}
