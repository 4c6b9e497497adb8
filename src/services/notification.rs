//! Notification service implementation
//!
//! Turns workflow milestones into inbox rows for the organizer, fans bulk
//! content out to many recipients, and serves the per-user inbox. Only the
//! notification records matter here; delivery over mail or push is someone
//! else's job.

use std::sync::Arc;

use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::models::{
    CreateNotificationRequest, Event, EventStatus, NewNotification, Notification, NotificationType, RelatedEntity,
    User,
};
use crate::utils::clock::Clock;
use crate::utils::errors::{PromoFlowError, Result};
use crate::utils::helpers::{days_before, non_blank, truncate_text};

/// Comments quoted in notifications are cut to this many characters
pub const COMMENT_PREVIEW_CHARS: usize = 100;

#[derive(Clone)]
pub struct NotificationService {
    db: DatabaseService,
    clock: Arc<dyn Clock>,
}

impl NotificationService {
    pub fn new(db: DatabaseService, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Milestone notification for a status change, if the edge has one.
    /// Fires regardless of who made the change.
    pub fn milestone(event: &Event, actor: &User, from: EventStatus, to: EventStatus, comment: Option<&str>) -> Option<NewNotification> {
        let (notification_type, title, message) = match (from, to) {
            (_, EventStatus::Approved) => (
                NotificationType::EventApproved,
                "Event Approved",
                format!("Your event \"{}\" has been approved", event.title),
            ),
            (_, EventStatus::Rejected) => {
                let mut message = format!("Your event \"{}\" was rejected by {}", event.title, actor.name);
                if let Some(reason) = non_blank(comment) {
                    message.push_str(&format!(". Reason: {}", reason));
                }
                (NotificationType::EventRejected, "Event Rejected", message)
            }
            (EventStatus::PendingGm, EventStatus::PendingMarketing) => (
                NotificationType::EventUpdated,
                "Event Updated",
                format!("Your event \"{}\" has progressed to marketing review", event.title),
            ),
            (_, EventStatus::Completed) => (
                NotificationType::EventUpdated,
                "Event Completed",
                format!("Your event \"{}\" has been completed", event.title),
            ),
            (EventStatus::Rejected, EventStatus::Draft) => (
                NotificationType::EventUpdated,
                "Event Updated",
                format!("Your event \"{}\" is ready for revision", event.title),
            ),
            _ => return None,
        };

        Some(NewNotification::new(notification_type, title, message).related_to(RelatedEntity::Event { id: event.id }))
    }

    /// Notification quoting someone else's comment on the organizer's event.
    /// `None` when the comment is blank or the actor is the organizer.
    pub fn comment_notice(event: &Event, actor: &User, comment: Option<&str>) -> Option<NewNotification> {
        let text = non_blank(comment)?;
        if event.is_organizer(actor.id) {
            return None;
        }

        let message = format!(
            "{} commented on \"{}\": {}",
            actor.name,
            event.title,
            truncate_text(text, COMMENT_PREVIEW_CHARS)
        );
        Some(
            NewNotification::new(NotificationType::EventUpdated, "New Comment", message)
                .related_to(RelatedEntity::Event { id: event.id }),
        )
    }

    /// Create the organizer's notifications for a committed status change
    pub async fn on_status_changed(
        &self,
        event: &Event,
        actor: &User,
        from: EventStatus,
        to: EventStatus,
        comment: Option<&str>,
    ) -> Result<Vec<Notification>> {
        let contents: Vec<NewNotification> = Self::milestone(event, actor, from, to, comment)
            .into_iter()
            .chain(Self::comment_notice(event, actor, comment))
            .collect();

        if contents.is_empty() {
            debug!(event_id = event.id, from = %from, to = %to, "No notifications for status change");
            return Ok(Vec::new());
        }

        let now = self.clock.now();
        let requests = contents
            .into_iter()
            .map(|content| CreateNotificationRequest {
                user_id: event.organizer_id,
                content,
                created_at: now,
            })
            .collect();

        let created = self.db.notifications.insert_many(requests).await?;
        info!(event_id = event.id, organizer_id = event.organizer_id, count = created.len(), "Status change notifications created");
        Ok(created)
    }

    /// Notify the organizer of a free-standing comment by someone else
    pub async fn notify_comment(&self, event: &Event, actor: &User, comment: &str) -> Result<Option<Notification>> {
        let Some(content) = Self::comment_notice(event, actor, Some(comment)) else {
            return Ok(None);
        };

        let mut created = self.create_bulk(&[event.organizer_id], content).await?;
        Ok(created.pop())
    }

    /// One independent row per recipient, in the order given. No
    /// de-duplication, within or across calls.
    pub async fn create_bulk(&self, user_ids: &[i64], content: NewNotification) -> Result<Vec<Notification>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let now = self.clock.now();
        let requests = user_ids
            .iter()
            .map(|&user_id| CreateNotificationRequest {
                user_id,
                content: content.clone(),
                created_at: now,
            })
            .collect();

        let created = self.db.notifications.insert_many(requests).await?;
        info!(count = created.len(), notification_type = ?content.notification_type, "Bulk notifications created");
        Ok(created)
    }

    /// System announcement to many users
    pub async fn announce(&self, user_ids: &[i64], title: &str, message: &str) -> Result<Vec<Notification>> {
        if title.trim().is_empty() {
            return Err(PromoFlowError::Validation("Announcement title is required".to_string()));
        }

        let content = NewNotification::new(NotificationType::SystemAnnouncement, title.trim(), message)
            .related_to(RelatedEntity::System);
        self.create_bulk(user_ids, content).await
    }

    /// Reminder to an organizer about one of their events
    pub async fn remind(&self, event: &Event, message: impl Into<String>) -> Result<Notification> {
        let content = NewNotification::new(NotificationType::Reminder, "Reminder", message)
            .related_to(RelatedEntity::Reminder { event_id: event.id });

        let mut created = self.create_bulk(&[event.organizer_id], content).await?;
        created
            .pop()
            .ok_or_else(|| PromoFlowError::Storage("Notification insert returned no rows".to_string()))
    }

    /// A user's inbox, newest first
    pub async fn notifications_for(&self, user_id: i64, unread_only: bool) -> Result<Vec<Notification>> {
        self.db.notifications.find_for_user(user_id, unread_only).await
    }

    pub async fn unread_count(&self, user_id: i64) -> Result<i64> {
        self.db.notifications.count_unread(user_id).await
    }

    /// Mark one notification read. Only its owner may do so.
    pub async fn mark_read(&self, notification_id: i64, user_id: i64) -> Result<Notification> {
        let notification = self
            .db
            .notifications
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| PromoFlowError::not_found("Notification", notification_id))?;

        if notification.user_id != user_id {
            return Err(PromoFlowError::Forbidden(
                "Notifications can only be marked read by their recipient".to_string(),
            ));
        }

        if notification.is_read {
            return Ok(notification);
        }

        self.db
            .notifications
            .mark_read(notification_id, self.clock.now())
            .await?
            .ok_or_else(|| PromoFlowError::not_found("Notification", notification_id))
    }

    pub async fn mark_all_read(&self, user_id: i64) -> Result<u64> {
        let changed = self.db.notifications.mark_all_read(user_id, self.clock.now()).await?;
        debug!(user_id = user_id, changed = changed, "Marked notifications read");
        Ok(changed)
    }

    /// Delete read notifications older than `retention_days`
    pub async fn cleanup(&self, retention_days: i64) -> Result<u64> {
        let cutoff = days_before(self.clock.now(), retention_days)?;
        let removed = self.db.notifications.delete_read_before(cutoff).await?;
        if removed > 0 {
            info!(removed = removed, cutoff = %cutoff, "Removed old read notifications");
        }
        Ok(removed)
    }
}
