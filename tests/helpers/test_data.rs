//! Canned test data

use chrono::{DateTime, Duration, TimeZone, Utc};
use promoflow::models::{ActualMetrics, CreateEventRequest};

pub const BRANCH_NORTH: i64 = 1;
pub const BRANCH_SOUTH: i64 = 2;

/// Instant every test context starts at
pub fn start_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub fn sample_event_request(title: &str) -> CreateEventRequest {
    let start = start_instant() + Duration::days(14);
    CreateEventRequest {
        title: title.to_string(),
        description: Some("Weekend showroom promotion with test drives".to_string()),
        location: Some("Main showroom".to_string()),
        start_date: Some(start),
        end_date: Some(start + Duration::days(2)),
        planned_budget: Some(5000.0),
        planned_enquiries: Some(40),
        planned_orders: Some(8),
        ..Default::default()
    }
}

pub fn full_actuals() -> ActualMetrics {
    ActualMetrics {
        actual_budget: 1000.0,
        actual_enquiries: 5,
        actual_orders: 2,
    }
}
