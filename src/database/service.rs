//! Database service layer
//!
//! Bundles the four stores behind trait objects so services can be built on
//! either Postgres or in-memory storage.

use std::sync::Arc;

use crate::database::repositories::{
    CommentRepository, EventRepository, InMemoryCommentStore, InMemoryEventStore, InMemoryNotificationStore,
    InMemoryUserStore, NotificationRepository, UserRepository,
};
use crate::database::store::{CommentStore, EventStore, NotificationStore, UserStore};
use crate::database::DatabasePool;

#[derive(Clone)]
pub struct DatabaseService {
    pub events: Arc<dyn EventStore>,
    pub users: Arc<dyn UserStore>,
    pub comments: Arc<dyn CommentStore>,
    pub notifications: Arc<dyn NotificationStore>,
}

impl DatabaseService {
    /// Postgres-backed stores sharing one pool
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            events: Arc::new(EventRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            comments: Arc::new(CommentRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool)),
        }
    }

    /// Process-local stores
    pub fn in_memory() -> Self {
        Self {
            events: Arc::new(InMemoryEventStore::new()),
            users: Arc::new(InMemoryUserStore::new()),
            comments: Arc::new(InMemoryCommentStore::new()),
            notifications: Arc::new(InMemoryNotificationStore::new()),
        }
    }

    /// Replace the notification store, keeping the others
    pub fn with_notifications(mut self, notifications: Arc<dyn NotificationStore>) -> Self {
        self.notifications = notifications;
        self
    }
}

impl std::fmt::Debug for DatabaseService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseService").finish_non_exhaustive()
    }
}
