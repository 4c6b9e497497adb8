//! Reminder and retention timer
//!
//! Periodically nudges organizers of approved events that ended a while ago
//! to record their results, and prunes old read notifications.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::ReminderConfig;
use crate::database::DatabaseService;
use crate::models::{EventFilter, EventStatus};
use crate::services::notification::NotificationService;
use crate::utils::clock::Clock;
use crate::utils::errors::Result;
use crate::utils::helpers::{days_before, format_timestamp};

/// Outcome of one reminder pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderReport {
    pub reminders_sent: usize,
    pub reminders_failed: usize,
    pub notifications_removed: u64,
}

#[derive(Clone)]
pub struct ReminderService {
    db: DatabaseService,
    notifications: NotificationService,
    clock: Arc<dyn Clock>,
    config: ReminderConfig,
}

impl ReminderService {
    pub fn new(
        db: DatabaseService,
        notifications: NotificationService,
        clock: Arc<dyn Clock>,
        config: ReminderConfig,
    ) -> Self {
        Self {
            db,
            notifications,
            clock,
            config,
        }
    }

    /// One pass: remind, then prune. Reminders are not de-duplicated across
    /// passes; an event keeps being reminded until it is completed.
    pub async fn run_once(&self) -> Result<ReminderReport> {
        let ended_before = days_before(self.clock.now(), self.config.completion_grace_days)?;
        let filter = EventFilter {
            status: Some(EventStatus::Approved),
            ended_before: Some(ended_before),
            ..Default::default()
        };

        let overdue = self.db.events.find(&filter).await?;
        let mut report = ReminderReport::default();

        for event in &overdue {
            let ended = event.end_date.map(format_timestamp).unwrap_or_default();
            let message = format!(
                "Your event \"{}\" ended on {}. Please record the actual cost, leads and orders and mark it completed.",
                event.title, ended
            );

            match self.notifications.remind(event, message).await {
                Ok(_) => report.reminders_sent += 1,
                Err(e) => {
                    report.reminders_failed += 1;
                    warn!(event_id = event.id, error = %e, "Failed to create completion reminder");
                }
            }
        }

        report.notifications_removed = self
            .notifications
            .cleanup(self.config.notification_retention_days)
            .await?;

        debug!(?report, "Reminder pass finished");
        Ok(report)
    }

    /// Run `run_once` every `interval_seconds` until `cancel` fires
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(cancel).await })
    }

    async fn run(self, cancel: CancellationToken) {
        let period = Duration::from_secs(self.config.interval_seconds);
        info!(interval_secs = period.as_secs(), "Reminder job started");

        let mut interval = tokio::time::interval(period);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Reminder job stopping");
                    break;
                }
                _ = interval.tick() => {
                    match self.run_once().await {
                        Ok(report) if report.reminders_sent > 0 || report.notifications_removed > 0 => {
                            info!(
                                reminders_sent = report.reminders_sent,
                                notifications_removed = report.notifications_removed,
                                "Reminder pass completed"
                            );
                        }
                        Ok(_) => {}
                        Err(e) => error!(error = %e, "Reminder pass failed"),
                    }
                }
            }
        }
    }
}
