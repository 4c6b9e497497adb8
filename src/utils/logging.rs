//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the PromoFlow service.

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LoggingConfig;
use crate::models::EventStatus;
use crate::utils::errors::{PromoFlowError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "promoflow.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| PromoFlowError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log an applied status transition
pub fn log_transition(event_id: i64, actor_id: i64, from: EventStatus, to: EventStatus) {
    info!(
        event_id = event_id,
        actor_id = actor_id,
        from = %from,
        to = %to,
        "Event status changed"
    );
}

/// Log event management actions
pub fn log_event_action(event_id: i64, action: &str, user_id: i64, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        user_id = user_id,
        details = details,
        "Event action performed"
    );
}

/// Log a refused request together with the rule that refused it
pub fn log_denied(event_id: i64, actor_id: i64, action: &str, reason: &str) {
    warn!(
        event_id = event_id,
        actor_id = actor_id,
        action = action,
        reason = reason,
        "Event action denied"
    );
}

/// Log a notification side effect that could not be written
pub fn log_notification_failure(event_id: i64, error: &PromoFlowError) {
    warn!(
        event_id = event_id,
        error = %error,
        "Notification dispatch failed; status change kept"
    );
}
