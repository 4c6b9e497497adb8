//! Event repository implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::store::EventStore;
use crate::models::event::{Event, EventFilter};
use crate::utils::errors::PromoFlowError;

const EVENT_COLUMNS: &str = "id, title, description, event_type_id, product_id, location, start_date, end_date, \
     organizer_id, branch_id, status, planned_budget, planned_enquiries, planned_orders, \
     actual_budget, actual_enquiries, actual_orders, is_active, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for EventRepository {
    /// Create a new event
    async fn insert(&self, event: Event) -> Result<Event, PromoFlowError> {
        let query = format!(
            r#"
            INSERT INTO events (title, description, event_type_id, product_id, location, start_date, end_date,
                                organizer_id, branch_id, status, planned_budget, planned_enquiries, planned_orders,
                                actual_budget, actual_enquiries, actual_orders, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );

        let event = sqlx::query_as::<_, Event>(&query)
            .bind(event.title)
            .bind(event.description)
            .bind(event.event_type_id)
            .bind(event.product_id)
            .bind(event.location)
            .bind(event.start_date)
            .bind(event.end_date)
            .bind(event.organizer_id)
            .bind(event.branch_id)
            .bind(event.status)
            .bind(event.planned_budget)
            .bind(event.planned_enquiries)
            .bind(event.planned_orders)
            .bind(event.actual_budget)
            .bind(event.actual_enquiries)
            .bind(event.actual_orders)
            .bind(event.is_active)
            .bind(event.created_at)
            .bind(event.updated_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(event)
    }

    /// Find event by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>, PromoFlowError> {
        let query = format!("SELECT {} FROM events WHERE id = $1", EVENT_COLUMNS);

        let event = sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(event)
    }

    /// Update every mutable column; organizer and branch stay as created
    async fn save(&self, event: &Event) -> Result<Event, PromoFlowError> {
        let query = format!(
            r#"
            UPDATE events
            SET title = $2,
                description = $3,
                event_type_id = $4,
                product_id = $5,
                location = $6,
                start_date = $7,
                end_date = $8,
                status = $9,
                planned_budget = $10,
                planned_enquiries = $11,
                planned_orders = $12,
                actual_budget = $13,
                actual_enquiries = $14,
                actual_orders = $15,
                is_active = $16,
                updated_at = $17
            WHERE id = $1
            RETURNING {}
            "#,
            EVENT_COLUMNS
        );

        let saved = sqlx::query_as::<_, Event>(&query)
            .bind(event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.event_type_id)
            .bind(event.product_id)
            .bind(&event.location)
            .bind(event.start_date)
            .bind(event.end_date)
            .bind(event.status)
            .bind(event.planned_budget)
            .bind(event.planned_enquiries)
            .bind(event.planned_orders)
            .bind(event.actual_budget)
            .bind(event.actual_enquiries)
            .bind(event.actual_orders)
            .bind(event.is_active)
            .bind(event.updated_at)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| PromoFlowError::not_found("Event", event.id))?;

        Ok(saved)
    }

    /// List active events matching the filter
    async fn find(&self, filter: &EventFilter) -> Result<Vec<Event>, PromoFlowError> {
        let query = format!(
            r#"
            SELECT {}
            FROM events
            WHERE is_active = true
              AND ($1::event_status IS NULL OR status = $1)
              AND ($2::BIGINT IS NULL OR branch_id = $2)
              AND ($3::BIGINT IS NULL OR organizer_id = $3)
              AND ($4::TIMESTAMPTZ IS NULL OR end_date < $4)
            ORDER BY created_at ASC, id ASC
            "#,
            EVENT_COLUMNS
        );

        let events = sqlx::query_as::<_, Event>(&query)
            .bind(filter.status)
            .bind(filter.branch_id)
            .bind(filter.organizer_id)
            .bind(filter.ended_before)
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }
}
