//! User service implementation
//!
//! Users are owned by an external directory; this service only registers and
//! resolves the copies the workflow needs.

use std::sync::Arc;

use tracing::{debug, info};

use crate::database::DatabaseService;
use crate::models::user::{CreateUserRequest, User};
use crate::utils::clock::Clock;
use crate::utils::errors::{PromoFlowError, Result};
use crate::utils::helpers::normalize_whitespace;

#[derive(Clone)]
pub struct UserService {
    db: DatabaseService,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(db: DatabaseService, clock: Arc<dyn Clock>) -> Self {
        Self { db, clock }
    }

    /// Register a user from the external directory
    pub async fn create_user(&self, mut request: CreateUserRequest) -> Result<User> {
        request.name = normalize_whitespace(&request.name);
        request.email = request.email.trim().to_lowercase();

        if request.name.is_empty() {
            return Err(PromoFlowError::Validation("User name is required".to_string()));
        }
        if !request.email.contains('@') {
            return Err(PromoFlowError::Validation(format!("Invalid email address: {}", request.email)));
        }

        let user = self.db.users.insert(request, self.clock.now()).await?;
        info!(user_id = user.id, role = %user.role, branch_id = ?user.branch_id, "User registered");
        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: i64) -> Result<User> {
        debug!(user_id = user_id, "Getting user by ID");
        self.db
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| PromoFlowError::not_found("User", user_id))
    }
}
