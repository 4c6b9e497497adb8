//! Test database helper utilities
//!
//! Starts a throwaway Postgres via testcontainers, or uses
//! `TEST_DATABASE_URL` when set, and runs the migrations against it.

use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres as PostgresImage;

pub struct TestDatabase {
    pub pool: PgPool,
    pub database_url: String,
    _container: Option<ContainerAsync<PostgresImage>>,
}

impl TestDatabase {
    pub async fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let (database_url, container) = match std::env::var("TEST_DATABASE_URL") {
            Ok(url) => (url, None),
            Err(_) => {
                let container = PostgresImage::default()
                    .with_db_name("test_promoflow")
                    .with_user("test_user")
                    .with_password("test_password")
                    .with_tag("16-alpine")
                    .start()
                    .await?;
                let host = container.get_host().await?;
                let port = container.get_host_port_ipv4(5432).await?;
                let url = format!("postgresql://test_user:test_password@{}:{}/test_promoflow", host, port);
                (url, Some(container))
            }
        };

        let pool = PgPool::connect(&database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self {
            pool,
            database_url,
            _container: container,
        })
    }

    /// Empty every table, keeping the schema
    pub async fn truncate_all(&self) -> Result<(), sqlx::Error> {
        sqlx::query("TRUNCATE notifications, event_comments, events, users RESTART IDENTITY CASCADE")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn count_records(&self, table: &str) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
