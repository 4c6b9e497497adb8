//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod comment;
pub mod event;
pub mod notification;
pub mod user;

// Re-export commonly used models
pub use comment::{CommentType, CreateCommentRequest, EventComment};
pub use event::{
    ActualMetrics, CreateEventRequest, Event, EventFilter, EventStatus, EventSummary, StatusChange,
    UpdateEventRequest,
};
pub use notification::{CreateNotificationRequest, NewNotification, Notification, NotificationType, RelatedEntity};
pub use user::{CreateUserRequest, Role, User};
