//! Event comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::event::EventStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "comment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CommentType {
    Feedback,
    Approval,
    Rejection,
    General,
}

impl CommentType {
    /// Comment type recorded for a transition into `target`
    pub fn for_target(target: EventStatus) -> Self {
        match target {
            EventStatus::Approved | EventStatus::PendingMarketing => CommentType::Approval,
            EventStatus::Rejected => CommentType::Rejection,
            EventStatus::Draft => CommentType::Feedback,
            _ => CommentType::General,
        }
    }
}

/// Immutable audit/communication record attached to an event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventComment {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
    pub comment: String,
    pub comment_type: CommentType,
    pub status_from: Option<EventStatus>,
    pub status_to: Option<EventStatus>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommentRequest {
    pub event_id: i64,
    pub user_id: i64,
    pub comment: String,
    pub comment_type: CommentType,
    pub status_from: Option<EventStatus>,
    pub status_to: Option<EventStatus>,
}

impl CreateCommentRequest {
    /// Comment produced by a status transition
    pub fn for_transition(event_id: i64, user_id: i64, comment: &str, from: EventStatus, to: EventStatus) -> Self {
        Self {
            event_id,
            user_id,
            comment: comment.to_string(),
            comment_type: CommentType::for_target(to),
            status_from: Some(from),
            status_to: Some(to),
        }
    }

    /// Free-standing comment with no transition context
    pub fn general(event_id: i64, user_id: i64, comment: &str) -> Self {
        Self {
            event_id,
            user_id,
            comment: comment.to_string(),
            comment_type: CommentType::General,
            status_from: None,
            status_to: None,
        }
    }
}
