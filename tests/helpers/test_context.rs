//! Test context for unified test setup
//!
//! Wires every service to in-memory stores and a `FixedClock`, and offers
//! shortcuts for creating users and placing events in a given state.

use std::sync::{Arc, Once};

use chrono::Duration;
use promoflow::config::Settings;
use promoflow::database::repositories::InMemoryNotificationStore;
use promoflow::database::DatabaseService;
use promoflow::models::{ActualMetrics, CreateUserRequest, Event, EventStatus, Role, User};
use promoflow::services::ServiceFactory;
use promoflow::utils::clock::FixedClock;

use super::test_data::{sample_event_request, start_instant};

static INIT: Once = Once::new();

pub struct TestContext {
    pub db: DatabaseService,
    pub services: ServiceFactory,
    pub notification_store: Arc<InMemoryNotificationStore>,
    pub clock: Arc<FixedClock>,
    pub settings: Settings,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        INIT.call_once(|| {
            let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        });

        let notification_store = Arc::new(InMemoryNotificationStore::new());
        let db = DatabaseService::in_memory().with_notifications(notification_store.clone());
        let clock = Arc::new(FixedClock::new(start_instant()));
        let services = ServiceFactory::new(db.clone(), &settings, clock.clone());

        Self {
            db,
            services,
            notification_store,
            clock,
            settings,
        }
    }

    pub async fn user(&self, name: &str, role: Role, branch_id: Option<i64>) -> User {
        self.services
            .user_service
            .create_user(CreateUserRequest {
                name: name.to_string(),
                email: format!("{}@promoflow.test", name.to_lowercase().replace(' ', ".")),
                role,
                branch_id,
            })
            .await
            .expect("Failed to create test user")
    }

    /// Draft event organized by `organizer`
    pub async fn draft_event(&self, organizer: &User, title: &str) -> Event {
        self.services
            .event_service
            .create_event(organizer.id, sample_event_request(title))
            .await
            .expect("Failed to create test event")
    }

    /// Force an event into `status`, bypassing the workflow
    pub async fn place_in(&self, event: &Event, status: EventStatus) -> Event {
        let mut event = self.reload(event.id).await;
        event.status = status;
        self.db.events.save(&event).await.expect("Failed to place event")
    }

    /// Write actual metrics directly, bypassing the edit matrix
    pub async fn set_actuals(&self, event: &Event, metrics: Option<ActualMetrics>) -> Event {
        let mut event = self.reload(event.id).await;
        event.actual_budget = metrics.map(|m| m.actual_budget);
        event.actual_enquiries = metrics.map(|m| m.actual_enquiries);
        event.actual_orders = metrics.map(|m| m.actual_orders);
        self.db.events.save(&event).await.expect("Failed to set actuals")
    }

    pub async fn reload(&self, event_id: i64) -> Event {
        self.services
            .event_service
            .get_event(event_id)
            .await
            .expect("Event should exist")
    }

    pub fn advance_days(&self, days: i64) {
        self.clock.advance(Duration::days(days));
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// The usual cast of one branch plus the org-wide reviewers
pub struct Cast {
    pub admin: User,
    pub sales: User,
    pub other_sales: User,
    pub gm: User,
    pub other_gm: User,
    pub marketing_head: User,
    pub marketing_manager: User,
    pub plain_user: User,
}

impl Cast {
    pub async fn new(ctx: &TestContext) -> Self {
        use super::test_data::{BRANCH_NORTH, BRANCH_SOUTH};

        Self {
            admin: ctx.user("Ada Admin", Role::Admin, None).await,
            sales: ctx.user("Sam Sales", Role::SalesManager, Some(BRANCH_NORTH)).await,
            other_sales: ctx.user("Sue Sales", Role::SalesManager, Some(BRANCH_NORTH)).await,
            gm: ctx.user("Gina General", Role::GeneralManager, Some(BRANCH_NORTH)).await,
            other_gm: ctx.user("Gus General", Role::GeneralManager, Some(BRANCH_SOUTH)).await,
            marketing_head: ctx.user("Mia Head", Role::MarketingHead, None).await,
            marketing_manager: ctx.user("Max Manager", Role::MarketingManager, None).await,
            plain_user: ctx.user("Pat User", Role::User, Some(BRANCH_NORTH)).await,
        }
    }
}
