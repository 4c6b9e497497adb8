//! User repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::database::store::UserStore;
use crate::models::user::{CreateUserRequest, User};
use crate::utils::errors::PromoFlowError;

#[derive(Clone, Debug)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    /// Create a new user
    async fn insert(&self, request: CreateUserRequest, now: DateTime<Utc>) -> Result<User, PromoFlowError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, role, branch_id, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, true, $5, $5)
            RETURNING id, name, email, role, branch_id, is_active, created_at, updated_at
            "#
        )
        .bind(request.name)
        .bind(request.email)
        .bind(request.role)
        .bind(request.branch_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, PromoFlowError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, branch_id, is_active, created_at, updated_at FROM users WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
