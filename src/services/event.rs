//! Event service implementation
//!
//! Creation, editing, soft deletion, comments and listings of events. Edits
//! and deletes go through the permission matrices; status changes do not
//! happen here, see `services::workflow`.

use std::sync::Arc;

use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::models::{
    ActualMetrics, CreateCommentRequest, CreateEventRequest, Event, EventComment, EventFilter, EventStatus,
    EventSummary, UpdateEventRequest, User,
};
use crate::services::notification::NotificationService;
use crate::services::permissions::{self, PermissionDecision};
use crate::utils::clock::Clock;
use crate::utils::errors::{PromoFlowError, Result};
use crate::utils::helpers::{non_blank, normalize_whitespace};
use crate::utils::logging::{log_denied, log_event_action, log_notification_failure};

#[derive(Clone)]
pub struct EventService {
    db: DatabaseService,
    notifications: NotificationService,
    clock: Arc<dyn Clock>,
}

impl EventService {
    pub fn new(db: DatabaseService, notifications: NotificationService, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            notifications,
            clock,
        }
    }

    /// Create a draft event organized by `actor_id`
    pub async fn create_event(&self, actor_id: i64, request: CreateEventRequest) -> Result<Event> {
        let actor = self.load_user(actor_id).await?;

        let title = normalize_whitespace(&request.title);
        if title.is_empty() {
            return Err(PromoFlowError::Validation("Event title is required".to_string()));
        }
        validate_planned(request.planned_budget, request.planned_enquiries, request.planned_orders)?;

        let branch_id = request
            .branch_id
            .or(actor.branch_id)
            .ok_or_else(|| PromoFlowError::Validation("Branch is required for users without a branch".to_string()))?;

        let now = self.clock.now();
        let event = Event {
            id: 0,
            title,
            description: request.description,
            event_type_id: request.event_type_id,
            product_id: request.product_id,
            location: request.location,
            start_date: request.start_date,
            end_date: request.end_date,
            organizer_id: actor.id,
            branch_id,
            status: EventStatus::Draft,
            planned_budget: request.planned_budget,
            planned_enquiries: request.planned_enquiries,
            planned_orders: request.planned_orders,
            actual_budget: None,
            actual_enquiries: None,
            actual_orders: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let event = self.db.events.insert(event).await?;
        log_event_action(event.id, "create", actor.id, Some(&event.title));
        Ok(event)
    }

    /// Direct lookup; soft-deleted events are still returned
    pub async fn get_event(&self, event_id: i64) -> Result<Event> {
        self.db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| PromoFlowError::not_found("Event", event_id))
    }

    /// Active events matching the filter
    pub async fn list_events(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let events = self.db.events.find(filter).await?;
        debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    /// Edit event fields. Status, organizer and branch are untouched.
    pub async fn update_event(&self, actor_id: i64, event_id: i64, request: UpdateEventRequest) -> Result<Event> {
        let (mut event, actor) = self.load(event_id, actor_id).await?;

        let decision = permissions::can_edit(&actor, &event);
        if !decision.allowed {
            log_denied(event.id, actor.id, "update", &decision.reason);
            return Err(PromoFlowError::Forbidden(decision.reason));
        }

        if request.is_empty() {
            return Ok(event);
        }

        if let Some(title) = &request.title {
            if title.trim().is_empty() {
                return Err(PromoFlowError::Validation("Event title cannot be empty".to_string()));
            }
        }
        validate_planned(request.planned_budget, request.planned_enquiries, request.planned_orders)?;
        validate_actuals(request.actual_budget, request.actual_enquiries, request.actual_orders)?;

        request.apply_to(&mut event);
        event.updated_at = self.clock.now();

        let event = self.db.events.save(&event).await?;
        log_event_action(event.id, "update", actor.id, None);
        Ok(event)
    }

    /// Record post-event results
    pub async fn record_actuals(&self, actor_id: i64, event_id: i64, metrics: ActualMetrics) -> Result<Event> {
        self.update_event(actor_id, event_id, metrics.into()).await
    }

    /// Soft delete
    pub async fn delete_event(&self, actor_id: i64, event_id: i64) -> Result<()> {
        let (mut event, actor) = self.load(event_id, actor_id).await?;

        let decision = permissions::can_delete(&actor, &event);
        if !decision.allowed {
            log_denied(event.id, actor.id, "delete", &decision.reason);
            return Err(PromoFlowError::Forbidden(decision.reason));
        }

        event.is_active = false;
        event.updated_at = self.clock.now();
        self.db.events.save(&event).await?;

        log_event_action(event.id, "delete", actor.id, None);
        Ok(())
    }

    pub async fn check_edit_permission(&self, event_id: i64, actor_id: i64) -> Result<PermissionDecision> {
        let (event, actor) = self.load(event_id, actor_id).await?;
        Ok(permissions::can_edit(&actor, &event))
    }

    pub async fn check_delete_permission(&self, event_id: i64, actor_id: i64) -> Result<PermissionDecision> {
        let (event, actor) = self.load(event_id, actor_id).await?;
        Ok(permissions::can_delete(&actor, &event))
    }

    /// Free-standing comment. The organizer hears about comments by others.
    pub async fn add_comment(&self, event_id: i64, actor_id: i64, text: &str) -> Result<EventComment> {
        let text = non_blank(Some(text))
            .ok_or_else(|| PromoFlowError::Validation("Comment text is required".to_string()))?;
        let (event, actor) = self.load(event_id, actor_id).await?;

        let comment = self
            .db
            .comments
            .insert(CreateCommentRequest::general(event.id, actor.id, text), self.clock.now())
            .await?;
        info!(event_id = event.id, comment_id = comment.id, user_id = actor.id, "Comment added");

        if let Err(e) = self.notifications.notify_comment(&event, &actor, text).await {
            log_notification_failure(event.id, &e);
        }

        Ok(comment)
    }

    /// Comments in creation order
    pub async fn list_comments(&self, event_id: i64) -> Result<Vec<EventComment>> {
        self.get_event(event_id).await?;
        self.db.comments.find_by_event(event_id).await
    }

    /// Totals over active events matching the filter
    pub async fn summary(&self, filter: &EventFilter) -> Result<EventSummary> {
        let events = self.db.events.find(filter).await?;
        Ok(summarize(&events))
    }

    async fn load(&self, event_id: i64, actor_id: i64) -> Result<(Event, User)> {
        let event = self.get_event(event_id).await?;
        let actor = self.load_user(actor_id).await?;
        Ok((event, actor))
    }

    async fn load_user(&self, user_id: i64) -> Result<User> {
        self.db
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| PromoFlowError::not_found("User", user_id))
    }
}

pub fn summarize(events: &[Event]) -> EventSummary {
    let mut summary = EventSummary::default();

    for event in events {
        summary.total_events += 1;
        *summary.by_status.entry(event.status).or_insert(0) += 1;
        summary.planned_budget += event.planned_budget.unwrap_or(0.0);
        summary.actual_budget += event.actual_budget.unwrap_or(0.0);
        summary.actual_enquiries += i64::from(event.actual_enquiries.unwrap_or(0));
        summary.actual_orders += i64::from(event.actual_orders.unwrap_or(0));
    }

    summary
}

fn validate_planned(budget: Option<f64>, enquiries: Option<i32>, orders: Option<i32>) -> Result<()> {
    non_negative_amount("Planned budget", budget)?;
    non_negative_count("Planned enquiries", enquiries)?;
    non_negative_count("Planned orders", orders)
}

fn validate_actuals(budget: Option<f64>, enquiries: Option<i32>, orders: Option<i32>) -> Result<()> {
    non_negative_amount("Actual cost", budget)?;
    non_negative_count("Actual leads", enquiries)?;
    non_negative_count("Actual orders", orders)
}

fn non_negative_amount(label: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(amount) if !amount.is_finite() || amount < 0.0 => Err(PromoFlowError::Validation(format!(
            "{} must be a non-negative number",
            label
        ))),
        _ => Ok(()),
    }
}

fn non_negative_count(label: &str, value: Option<i32>) -> Result<()> {
    match value {
        Some(count) if count < 0 => Err(PromoFlowError::Validation(format!("{} cannot be negative", label))),
        _ => Ok(()),
    }
}
