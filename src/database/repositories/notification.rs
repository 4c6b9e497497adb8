//! Notification repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::database::store::NotificationStore;
use crate::models::notification::{CreateNotificationRequest, Notification, NotificationType, RelatedEntity};
use crate::utils::errors::PromoFlowError;

const NOTIFICATION_COLUMNS: &str = "id, user_id, notification_type, title, message, is_read, \
     related_entity_type, related_entity_id, action_url, created_at, read_at";

/// Stored shape; the soft link is split over two nullable columns
#[derive(Debug, FromRow)]
struct NotificationRow {
    id: i64,
    user_id: i64,
    notification_type: NotificationType,
    title: String,
    message: String,
    is_read: bool,
    related_entity_type: Option<String>,
    related_entity_id: Option<i64>,
    action_url: Option<String>,
    created_at: DateTime<Utc>,
    read_at: Option<DateTime<Utc>>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            notification_type: row.notification_type,
            title: row.title,
            message: row.message,
            is_read: row.is_read,
            related: RelatedEntity::from_columns(row.related_entity_type.as_deref(), row.related_entity_id),
            action_url: row.action_url,
            created_at: row.created_at,
            read_at: row.read_at,
        }
    }
}

#[derive(Clone, Debug)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    /// Insert all rows in one transaction
    async fn insert_many(&self, requests: Vec<CreateNotificationRequest>) -> Result<Vec<Notification>, PromoFlowError> {
        let query = format!(
            r#"
            INSERT INTO notifications (user_id, notification_type, title, message, is_read,
                                       related_entity_type, related_entity_id, action_url, created_at)
            VALUES ($1, $2, $3, $4, false, $5, $6, $7, $8)
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        );

        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(requests.len());

        for request in requests {
            let (entity_type, entity_id) = request.content.related.to_columns();
            let row = sqlx::query_as::<_, NotificationRow>(&query)
                .bind(request.user_id)
                .bind(request.content.notification_type)
                .bind(request.content.title)
                .bind(request.content.message)
                .bind(entity_type)
                .bind(entity_id)
                .bind(request.content.action_url)
                .bind(request.created_at)
                .fetch_one(&mut *tx)
                .await?;
            created.push(row.into());
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Notification>, PromoFlowError> {
        let query = format!("SELECT {} FROM notifications WHERE id = $1", NOTIFICATION_COLUMNS);

        let row = sqlx::query_as::<_, NotificationRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_for_user(&self, user_id: i64, unread_only: bool) -> Result<Vec<Notification>, PromoFlowError> {
        let query = format!(
            r#"
            SELECT {}
            FROM notifications
            WHERE user_id = $1 AND ($2 = false OR is_read = false)
            ORDER BY created_at DESC, id DESC
            "#,
            NOTIFICATION_COLUMNS
        );

        let rows = sqlx::query_as::<_, NotificationRow>(&query)
            .bind(user_id)
            .bind(unread_only)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_unread(&self, user_id: i64) -> Result<i64, PromoFlowError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn mark_read(&self, id: i64, at: DateTime<Utc>) -> Result<Option<Notification>, PromoFlowError> {
        let query = format!(
            r#"
            UPDATE notifications
            SET is_read = true, read_at = COALESCE(read_at, $2)
            WHERE id = $1
            RETURNING {}
            "#,
            NOTIFICATION_COLUMNS
        );

        let row = sqlx::query_as::<_, NotificationRow>(&query)
            .bind(id)
            .bind(at)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn mark_all_read(&self, user_id: i64, at: DateTime<Utc>) -> Result<u64, PromoFlowError> {
        let result = sqlx::query("UPDATE notifications SET is_read = true, read_at = $2 WHERE user_id = $1 AND is_read = false")
            .bind(user_id)
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> Result<u64, PromoFlowError> {
        let result = sqlx::query("DELETE FROM notifications WHERE is_read = true AND created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
