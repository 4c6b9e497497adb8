//! Notification model
//!
//! A notification is a user-scoped inbox entry. Its link to other entities is
//! a soft reference, never enforced as a foreign key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "notification_type", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    EventCreated,
    EventApproved,
    EventRejected,
    EventUpdated,
    BudgetApproved,
    BudgetRejected,
    SystemAnnouncement,
    Reminder,
}

/// What a notification points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelatedEntity {
    Event { id: i64 },
    System,
    Reminder { event_id: i64 },
    #[default]
    None,
}

impl RelatedEntity {
    /// Column pair `(related_entity_type, related_entity_id)`
    pub fn to_columns(&self) -> (Option<&'static str>, Option<i64>) {
        match self {
            RelatedEntity::Event { id } => (Some("event"), Some(*id)),
            RelatedEntity::System => (Some("system"), None),
            RelatedEntity::Reminder { event_id } => (Some("reminder"), Some(*event_id)),
            RelatedEntity::None => (None, None),
        }
    }

    /// Rebuild from stored columns. Incomplete or unknown pairs read as `None`.
    pub fn from_columns(entity_type: Option<&str>, entity_id: Option<i64>) -> Self {
        match (entity_type, entity_id) {
            (Some("event"), Some(id)) => RelatedEntity::Event { id },
            (Some("system"), _) => RelatedEntity::System,
            (Some("reminder"), Some(event_id)) => RelatedEntity::Reminder { event_id },
            _ => RelatedEntity::None,
        }
    }

    /// Default deep link for the referenced entity
    pub fn action_url(&self) -> Option<String> {
        match self {
            RelatedEntity::Event { id } | RelatedEntity::Reminder { event_id: id } => {
                Some(format!("/events/{}", id))
            }
            RelatedEntity::System | RelatedEntity::None => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub related: RelatedEntity,
    pub action_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

/// Notification content before it is fanned out to recipients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewNotification {
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub related: RelatedEntity,
    pub action_url: Option<String>,
}

impl NewNotification {
    pub fn new(notification_type: NotificationType, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            notification_type,
            title: title.into(),
            message: message.into(),
            related: RelatedEntity::None,
            action_url: None,
        }
    }

    /// Attach a soft link and derive its default action URL
    pub fn related_to(mut self, related: RelatedEntity) -> Self {
        self.action_url = related.action_url();
        self.related = related;
        self
    }
}

/// One row to insert: content plus recipient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: i64,
    pub content: NewNotification,
    pub created_at: DateTime<Utc>,
}
