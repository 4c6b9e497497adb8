//! PromoFlow service
//!
//! Main application entry point

use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use promoflow::{
    config::Settings,
    database::{create_pool, run_migrations, DatabaseService},
    services::ServiceFactory,
    utils::{clock::SystemClock, logging},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    settings.validate().context("Invalid configuration")?;

    // Initialize logging; the guard flushes the file writer on exit
    let _log_guard = logging::init_logging(&settings.logging).context("Failed to initialize logging")?;

    info!("Starting {}...", promoflow::info());

    // Initialize database connection
    info!("Connecting to database...");
    let pool = create_pool(&settings.database)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool).await.context("Failed to run migrations")?;

    let database_service = DatabaseService::new(pool.clone());

    // Initialize services
    info!("Initializing services...");
    let services = ServiceFactory::new(database_service, &settings, Arc::new(SystemClock));

    let shutdown = CancellationToken::new();
    let reminder_task = if settings.reminders.enabled {
        Some(services.reminder_service.clone().spawn(shutdown.clone()))
    } else {
        info!("Reminder job disabled");
        None
    };

    info!("PromoFlow is ready");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutdown signal received");
    shutdown.cancel();

    if let Some(task) = reminder_task {
        if let Err(e) = task.await {
            error!(error = %e, "Reminder job did not stop cleanly");
        }
    }

    pool.close().await;
    info!("PromoFlow has been shut down.");

    Ok(())
}
