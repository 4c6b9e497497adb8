//! In-memory repository implementations
//!
//! Backed by `tokio::sync::RwLock`-guarded vectors. Used by tests and local
//! runs without a database. Ids are assigned from a per-store counter.

use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::database::store::{CommentStore, EventStore, NotificationStore, UserStore};
use crate::models::{
    CreateCommentRequest, CreateNotificationRequest, CreateUserRequest, Event, EventComment, EventFilter,
    Notification, User,
};
use crate::utils::errors::{PromoFlowError, Result};

#[derive(Debug)]
struct IdSequence(AtomicI64);

impl IdSequence {
    fn new() -> Self {
        Self(AtomicI64::new(1))
    }

    fn next(&self) -> i64 {
        self.0.fetch_add(1, Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct InMemoryEventStore {
    rows: RwLock<Vec<Event>>,
    ids: IdSequence,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn insert(&self, mut event: Event) -> Result<Event> {
        event.id = self.ids.next();
        self.rows.write().await.push(event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        Ok(self.rows.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn save(&self, event: &Event) -> Result<Event> {
        let mut rows = self.rows.write().await;
        let stored = rows
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| PromoFlowError::not_found("Event", event.id))?;

        // organizer and branch are fixed at creation
        let organizer_id = stored.organizer_id;
        let branch_id = stored.branch_id;
        *stored = event.clone();
        stored.organizer_id = organizer_id;
        stored.branch_id = branch_id;

        Ok(stored.clone())
    }

    async fn find(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }
}

#[derive(Debug)]
pub struct InMemoryUserStore {
    rows: RwLock<Vec<User>>,
    ids: IdSequence,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn insert(&self, request: CreateUserRequest, now: DateTime<Utc>) -> Result<User> {
        let user = User {
            id: self.ids.next(),
            name: request.name,
            email: request.email,
            role: request.role,
            branch_id: request.branch_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.rows.write().await.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.rows.read().await.iter().find(|u| u.id == id).cloned())
    }
}

#[derive(Debug)]
pub struct InMemoryCommentStore {
    rows: RwLock<Vec<EventComment>>,
    ids: IdSequence,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            ids: IdSequence::new(),
        }
    }
}

impl Default for InMemoryCommentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn insert(&self, request: CreateCommentRequest, now: DateTime<Utc>) -> Result<EventComment> {
        let comment = EventComment {
            id: self.ids.next(),
            event_id: request.event_id,
            user_id: request.user_id,
            comment: request.comment,
            comment_type: request.comment_type,
            status_from: request.status_from,
            status_to: request.status_to,
            created_at: now,
        };
        self.rows.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn find_by_event(&self, event_id: i64) -> Result<Vec<EventComment>> {
        Ok(self
            .rows
            .read()
            .await
            .iter()
            .filter(|c| c.event_id == event_id)
            .cloned()
            .collect())
    }
}

/// Notification store with a switch to make writes fail
#[derive(Debug)]
pub struct InMemoryNotificationStore {
    rows: RwLock<Vec<Notification>>,
    ids: IdSequence,
    fail_writes: AtomicBool,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            ids: IdSequence::new(),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Make subsequent inserts fail with a storage error
    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    /// Every stored row in insertion order
    pub async fn all(&self) -> Vec<Notification> {
        self.rows.read().await.clone()
    }
}

impl Default for InMemoryNotificationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn insert_many(&self, requests: Vec<CreateNotificationRequest>) -> Result<Vec<Notification>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(PromoFlowError::Storage("notification store unavailable".to_string()));
        }

        let created: Vec<Notification> = requests
            .into_iter()
            .map(|request| Notification {
                id: self.ids.next(),
                user_id: request.user_id,
                notification_type: request.content.notification_type,
                title: request.content.title,
                message: request.content.message,
                is_read: false,
                related: request.content.related,
                action_url: request.content.action_url,
                created_at: request.created_at,
                read_at: None,
            })
            .collect();

        self.rows.write().await.extend(created.iter().cloned());
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Notification>> {
        Ok(self.rows.read().await.iter().find(|n| n.id == id).cloned())
    }

    async fn find_for_user(&self, user_id: i64, unread_only: bool) -> Result<Vec<Notification>> {
        let mut found: Vec<Notification> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
            .cloned()
            .collect();

        found.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(found)
    }

    async fn count_unread(&self, user_id: i64) -> Result<i64> {
        let count = self
            .rows
            .read()
            .await
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count();
        Ok(count as i64)
    }

    async fn mark_read(&self, id: i64, at: DateTime<Utc>) -> Result<Option<Notification>> {
        let mut rows = self.rows.write().await;
        Ok(rows.iter_mut().find(|n| n.id == id).map(|n| {
            n.is_read = true;
            if n.read_at.is_none() {
                n.read_at = Some(at);
            }
            n.clone()
        }))
    }

    async fn mark_all_read(&self, user_id: i64, at: DateTime<Utc>) -> Result<u64> {
        let mut changed = 0;
        for n in self.rows.write().await.iter_mut().filter(|n| n.user_id == user_id && !n.is_read) {
            n.is_read = true;
            n.read_at = Some(at);
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|n| !(n.is_read && n.created_at < cutoff));
        Ok((before - rows.len()) as u64)
    }
}
