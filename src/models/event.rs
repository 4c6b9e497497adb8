//! Event model
//!
//! An `Event` is one promotional activity moving through the approval
//! pipeline. Its `status` is the subject of the transition table in
//! `crate::state::transitions`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::PromoFlowError;

/// Approval lifecycle status. Wire names are the lowercase snake_case strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Draft,
    PendingGm,
    PendingMarketing,
    Approved,
    Rejected,
    Completed,
}

impl EventStatus {
    pub const ALL: [EventStatus; 6] = [
        EventStatus::Draft,
        EventStatus::PendingGm,
        EventStatus::PendingMarketing,
        EventStatus::Approved,
        EventStatus::Rejected,
        EventStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Draft => "draft",
            EventStatus::PendingGm => "pending_gm",
            EventStatus::PendingMarketing => "pending_marketing",
            EventStatus::Approved => "approved",
            EventStatus::Rejected => "rejected",
            EventStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = PromoFlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| PromoFlowError::Validation(format!("Invalid status: {}", s)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_type_id: Option<i64>,
    pub product_id: Option<i64>,
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub organizer_id: i64,
    pub branch_id: i64,
    pub status: EventStatus,
    pub planned_budget: Option<f64>,
    pub planned_enquiries: Option<i32>,
    pub planned_orders: Option<i32>,
    pub actual_budget: Option<f64>,
    pub actual_enquiries: Option<i32>,
    pub actual_orders: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn is_organizer(&self, user_id: i64) -> bool {
        self.organizer_id == user_id
    }

    /// Labels of the actual metrics that block completion, in fixed order.
    /// An actual cost of zero or less counts as missing.
    pub fn missing_actuals(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();

        if !matches!(self.actual_budget, Some(budget) if budget > 0.0) {
            missing.push("Actual Cost");
        }
        if self.actual_enquiries.is_none() {
            missing.push("Actual Leads");
        }
        if self.actual_orders.is_none() {
            missing.push("Actual Orders");
        }

        missing
    }
}

/// Fields a new event is created with; status, organizer and timestamps are
/// filled in by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub event_type_id: Option<i64>,
    pub product_id: Option<i64>,
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Falls back to the organizer's branch
    pub branch_id: Option<i64>,
    pub planned_budget: Option<f64>,
    pub planned_enquiries: Option<i32>,
    pub planned_orders: Option<i32>,
}

/// Partial update. Status, organizer and branch are not editable here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_type_id: Option<i64>,
    pub product_id: Option<i64>,
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub planned_budget: Option<f64>,
    pub planned_enquiries: Option<i32>,
    pub planned_orders: Option<i32>,
    pub actual_budget: Option<f64>,
    pub actual_enquiries: Option<i32>,
    pub actual_orders: Option<i32>,
}

impl UpdateEventRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.event_type_id.is_none()
            && self.product_id.is_none()
            && self.location.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.planned_budget.is_none()
            && self.planned_enquiries.is_none()
            && self.planned_orders.is_none()
            && self.actual_budget.is_none()
            && self.actual_enquiries.is_none()
            && self.actual_orders.is_none()
    }

    /// Overwrite every field that is set
    pub fn apply_to(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = Some(description);
        }
        if let Some(event_type_id) = self.event_type_id {
            event.event_type_id = Some(event_type_id);
        }
        if let Some(product_id) = self.product_id {
            event.product_id = Some(product_id);
        }
        if let Some(location) = self.location {
            event.location = Some(location);
        }
        if let Some(start_date) = self.start_date {
            event.start_date = Some(start_date);
        }
        if let Some(end_date) = self.end_date {
            event.end_date = Some(end_date);
        }
        if let Some(budget) = self.planned_budget {
            event.planned_budget = Some(budget);
        }
        if let Some(enquiries) = self.planned_enquiries {
            event.planned_enquiries = Some(enquiries);
        }
        if let Some(orders) = self.planned_orders {
            event.planned_orders = Some(orders);
        }
        if let Some(budget) = self.actual_budget {
            event.actual_budget = Some(budget);
        }
        if let Some(enquiries) = self.actual_enquiries {
            event.actual_enquiries = Some(enquiries);
        }
        if let Some(orders) = self.actual_orders {
            event.actual_orders = Some(orders);
        }
    }
}

/// Post-event results
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActualMetrics {
    pub actual_budget: f64,
    pub actual_enquiries: i32,
    pub actual_orders: i32,
}

impl From<ActualMetrics> for UpdateEventRequest {
    fn from(metrics: ActualMetrics) -> Self {
        Self {
            actual_budget: Some(metrics.actual_budget),
            actual_enquiries: Some(metrics.actual_enquiries),
            actual_orders: Some(metrics.actual_orders),
            ..Default::default()
        }
    }
}

/// Query criteria for event listings. Inactive events are never listed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    pub status: Option<EventStatus>,
    pub branch_id: Option<i64>,
    pub organizer_id: Option<i64>,
    /// Only events whose `end_date` is strictly before this instant
    pub ended_before: Option<DateTime<Utc>>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        event.is_active
            && self.status.map_or(true, |status| event.status == status)
            && self.branch_id.map_or(true, |branch| event.branch_id == branch)
            && self.organizer_id.map_or(true, |organizer| event.organizer_id == organizer)
            && self
                .ended_before
                .map_or(true, |cutoff| matches!(event.end_date, Some(end) if end < cutoff))
    }
}

/// Status transition result returned to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub previous_status: EventStatus,
    pub new_status: EventStatus,
}

/// Simple per-filter totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventSummary {
    pub total_events: usize,
    pub by_status: std::collections::BTreeMap<EventStatus, usize>,
    pub planned_budget: f64,
    pub actual_budget: f64,
    pub actual_enquiries: i64,
    pub actual_orders: i64,
}
