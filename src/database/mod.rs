//! Database module
//!
//! This module handles database connections, the repository abstraction and
//! its implementations

pub mod connection;
pub mod repositories;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, create_pool, run_migrations, health_check};
pub use repositories::{CommentRepository, EventRepository, NotificationRepository, UserRepository};
pub use service::DatabaseService;
pub use store::{CommentStore, EventStore, NotificationStore, UserStore};
