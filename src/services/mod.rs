//! Services module
//!
//! This module contains the workflow business logic

pub mod event;
pub mod notification;
pub mod permissions;
pub mod reminder;
pub mod user;
pub mod workflow;

// Re-export commonly used services
pub use event::EventService;
pub use notification::NotificationService;
pub use permissions::PermissionDecision;
pub use reminder::{ReminderReport, ReminderService};
pub use user::UserService;
pub use workflow::{ChangeStatusRequest, WorkflowService};

use std::sync::Arc;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::clock::Clock;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub user_service: UserService,
    pub event_service: EventService,
    pub workflow_service: WorkflowService,
    pub notification_service: NotificationService,
    pub reminder_service: ReminderService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services sharing one store set
    /// and one clock
    pub fn new(db: DatabaseService, settings: &Settings, clock: Arc<dyn Clock>) -> Self {
        let notification_service = NotificationService::new(db.clone(), clock.clone());
        let user_service = UserService::new(db.clone(), clock.clone());
        let event_service = EventService::new(db.clone(), notification_service.clone(), clock.clone());
        let workflow_service = WorkflowService::new(db.clone(), notification_service.clone(), clock.clone());
        let reminder_service = ReminderService::new(
            db,
            notification_service.clone(),
            clock,
            settings.reminders.clone(),
        );

        Self {
            user_service,
            event_service,
            workflow_service,
            notification_service,
            reminder_service,
        }
    }
}
