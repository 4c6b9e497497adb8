//! Event comment repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::store::CommentStore;
use crate::models::comment::{CreateCommentRequest, EventComment};
use crate::utils::errors::PromoFlowError;

#[derive(Clone, Debug)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn insert(&self, request: CreateCommentRequest, now: DateTime<Utc>) -> Result<EventComment, PromoFlowError> {
        let comment = sqlx::query_as::<_, EventComment>(
            r#"
            INSERT INTO event_comments (event_id, user_id, comment, comment_type, status_from, status_to, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, event_id, user_id, comment, comment_type, status_from, status_to, created_at
            "#
        )
        .bind(request.event_id)
        .bind(request.user_id)
        .bind(request.comment)
        .bind(request.comment_type)
        .bind(request.status_from)
        .bind(request.status_to)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn find_by_event(&self, event_id: i64) -> Result<Vec<EventComment>, PromoFlowError> {
        let comments = sqlx::query_as::<_, EventComment>(
            r#"
            SELECT id, event_id, user_id, comment, comment_type, status_from, status_to, created_at
            FROM event_comments
            WHERE event_id = $1
            ORDER BY created_at ASC, id ASC
            "#
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
