//! Workflow engine
//!
//! Applies status change requests to events. Every request runs the same
//! short-circuiting sequence: resolve the requested status, load the event
//! and the actor, check the completion preconditions, check the edge and
//! the permission gates, persist, record the comment, then notify.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::database::DatabaseService;
use crate::models::{CreateCommentRequest, Event, EventStatus, StatusChange, User};
use crate::services::notification::NotificationService;
use crate::services::permissions::{self, PermissionDecision};
use crate::state::transitions::{next_statuses, rule_for};
use crate::utils::clock::Clock;
use crate::utils::errors::{PromoFlowError, Result};
use crate::utils::helpers::{human_list, non_blank};
use crate::utils::logging::{log_denied, log_notification_failure, log_transition};

/// Inbound "change event status" request. `new_status` is the wire string
/// and is validated by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub event_id: i64,
    pub new_status: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ChangeStatusRequest {
    pub fn new(event_id: i64, new_status: impl Into<String>) -> Self {
        Self {
            event_id,
            new_status: new_status.into(),
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

#[derive(Clone)]
pub struct WorkflowService {
    db: DatabaseService,
    notifications: NotificationService,
    clock: Arc<dyn Clock>,
}

impl WorkflowService {
    pub fn new(db: DatabaseService, notifications: NotificationService, clock: Arc<dyn Clock>) -> Self {
        Self {
            db,
            notifications,
            clock,
        }
    }

    /// Move an event to a new status on behalf of `actor_id`.
    ///
    /// Completion metrics are checked before the edge and permission gates,
    /// so a request failing both reports the missing metrics. Notification
    /// failures are logged and never fail the request.
    pub async fn change_status(&self, actor_id: i64, request: ChangeStatusRequest) -> Result<StatusChange> {
        let span = info_span!(
            "change_status",
            request_id = %Uuid::new_v4(),
            event_id = request.event_id,
            actor_id = actor_id,
            new_status = %request.new_status,
        );

        self.apply_status_change(actor_id, request).instrument(span).await
    }

    async fn apply_status_change(&self, actor_id: i64, request: ChangeStatusRequest) -> Result<StatusChange> {
        let to: EventStatus = request.new_status.parse()?;
        let (mut event, actor) = self.load(request.event_id, actor_id).await?;
        let from = event.status;

        if to == EventStatus::Completed {
            ensure_actuals(&event)?;
        }

        if rule_for(from, to).is_none() {
            log_denied(event.id, actor.id, "change_status", "Invalid status transition");
            return Err(PromoFlowError::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        let decision = permissions::can_transition(&actor, &event, to);
        if !decision.allowed {
            log_denied(event.id, actor.id, "change_status", &decision.reason);
            return Err(PromoFlowError::Forbidden(decision.reason));
        }

        let now = self.clock.now();
        event.status = to;
        event.updated_at = now;
        let event = self.db.events.save(&event).await?;
        log_transition(event.id, actor.id, from, to);

        let comment = non_blank(request.comment.as_deref());
        if let Some(text) = comment {
            self.db
                .comments
                .insert(CreateCommentRequest::for_transition(event.id, actor.id, text, from, to), now)
                .await?;
        }

        if let Err(e) = self.notifications.on_status_changed(&event, &actor, from, to, comment).await {
            log_notification_failure(event.id, &e);
        }

        Ok(StatusChange {
            previous_status: from,
            new_status: to,
        })
    }

    /// Statuses `actor_id` could move the event to right now, ignoring the
    /// completion preconditions
    pub async fn available_transitions(&self, event_id: i64, actor_id: i64) -> Result<Vec<EventStatus>> {
        let (event, actor) = self.load(event_id, actor_id).await?;

        let statuses: Vec<EventStatus> = next_statuses(event.status)
            .into_iter()
            .filter(|&to| permissions::can_transition(&actor, &event, to).allowed)
            .collect();

        debug!(event_id = event_id, actor_id = actor_id, count = statuses.len(), "Resolved available transitions");
        Ok(statuses)
    }

    /// Transition decision without applying anything
    pub async fn check_transition(&self, event_id: i64, actor_id: i64, to: EventStatus) -> Result<PermissionDecision> {
        let (event, actor) = self.load(event_id, actor_id).await?;
        Ok(permissions::can_transition(&actor, &event, to))
    }

    async fn load(&self, event_id: i64, actor_id: i64) -> Result<(Event, User)> {
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| PromoFlowError::not_found("Event", event_id))?;
        let actor = self
            .db
            .users
            .find_by_id(actor_id)
            .await?
            .ok_or_else(|| PromoFlowError::not_found("User", actor_id))?;

        Ok((event, actor))
    }
}

/// Completion precondition: every actual metric present, cost above zero.
/// The error lists all gaps, not just the first.
pub fn ensure_actuals(event: &Event) -> Result<()> {
    let missing = event.missing_actuals();
    if missing.is_empty() {
        return Ok(());
    }

    Err(PromoFlowError::Validation(format!(
        "Missing required fields: {}",
        human_list(&missing)
    )))
}
