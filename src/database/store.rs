//! Repository abstraction
//!
//! The workflow core only talks to storage through these traits. Postgres
//! implementations live in `repositories`, in-memory ones in
//! `repositories::memory`. Every method may fail with a storage error, which
//! callers surface as an internal error without retrying.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{
    CreateCommentRequest, CreateNotificationRequest, CreateUserRequest, Event, EventComment, EventFilter,
    Notification, User,
};
use crate::utils::errors::Result;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Insert a new event; the store assigns `id`
    async fn insert(&self, event: Event) -> Result<Event>;

    /// Direct lookup, inactive events included
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>>;

    /// Overwrite the stored row (last write wins)
    async fn save(&self, event: &Event) -> Result<Event>;

    /// Active events matching `filter`, oldest first
    async fn find(&self, filter: &EventFilter) -> Result<Vec<Event>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, request: CreateUserRequest, now: DateTime<Utc>) -> Result<User>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert(&self, request: CreateCommentRequest, now: DateTime<Utc>) -> Result<EventComment>;

    /// Comments of one event in creation order
    async fn find_by_event(&self, event_id: i64) -> Result<Vec<EventComment>>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Insert one row per request, preserving order
    async fn insert_many(&self, requests: Vec<CreateNotificationRequest>) -> Result<Vec<Notification>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Notification>>;

    /// Newest first
    async fn find_for_user(&self, user_id: i64, unread_only: bool) -> Result<Vec<Notification>>;

    async fn count_unread(&self, user_id: i64) -> Result<i64>;

    /// Flag one notification read; `None` when it does not exist
    async fn mark_read(&self, id: i64, at: DateTime<Utc>) -> Result<Option<Notification>>;

    /// Flag all of a user's unread notifications; returns rows changed
    async fn mark_all_read(&self, user_id: i64, at: DateTime<Utc>) -> Result<u64>;

    /// Remove read notifications created before `cutoff`; returns rows removed
    async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}
