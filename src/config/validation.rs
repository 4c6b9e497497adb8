//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{PromoFlowError, Result};
use super::Settings;

/// Longest grace or retention window accepted, in days
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_logging_config(&settings.logging)?;
    validate_reminder_config(&settings.reminders)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(PromoFlowError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(PromoFlowError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(PromoFlowError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(PromoFlowError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(PromoFlowError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    if matches!(config.directory.as_deref(), Some("")) {
        return Err(PromoFlowError::Config(
            "Log directory cannot be empty when set".to_string()
        ));
    }

    Ok(())
}

/// Validate reminder timer configuration
fn validate_reminder_config(config: &super::ReminderConfig) -> Result<()> {
    if config.interval_seconds == 0 {
        return Err(PromoFlowError::Config(
            "Reminder interval must be greater than 0".to_string()
        ));
    }

    if config.completion_grace_days < 0 {
        return Err(PromoFlowError::Config(
            "Completion grace period cannot be negative".to_string()
        ));
    }

    if config.notification_retention_days <= 0 {
        return Err(PromoFlowError::Config(
            "Notification retention must be at least one day".to_string()
        ));
    }

    if config.completion_grace_days > MAX_WINDOW_DAYS || config.notification_retention_days > MAX_WINDOW_DAYS {
        return Err(PromoFlowError::Config(
            format!("Reminder windows cannot exceed {} days", MAX_WINDOW_DAYS)
        ));
    }

    Ok(())
}
