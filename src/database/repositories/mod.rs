//! Database repositories module
//!
//! This module contains the Postgres repository implementations for data
//! access, plus in-memory equivalents.

pub mod comment;
pub mod event;
pub mod memory;
pub mod notification;
pub mod user;

// Re-export repositories
pub use comment::CommentRepository;
pub use event::EventRepository;
pub use memory::{InMemoryCommentStore, InMemoryEventStore, InMemoryNotificationStore, InMemoryUserStore};
pub use notification::NotificationRepository;
pub use user::UserRepository;
