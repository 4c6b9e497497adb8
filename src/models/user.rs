//! User model
//!
//! Users are owned by the identity collaborator; the workflow core only reads
//! them to learn an actor's role, branch and display name.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    User,
    Manager,
    SalesManager,
    GeneralManager,
    MarketingHead,
    MarketingManager,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::User,
        Role::Manager,
        Role::SalesManager,
        Role::GeneralManager,
        Role::MarketingHead,
        Role::MarketingManager,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
            Role::Manager => "manager",
            Role::SalesManager => "sales_manager",
            Role::GeneralManager => "general_manager",
            Role::MarketingHead => "marketing_head",
            Role::MarketingManager => "marketing_manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("Unknown role: {}", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// `None` means organization-wide scope
    pub branch_id: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this user's branch scope covers `branch_id`
    pub fn covers_branch(&self, branch_id: i64) -> bool {
        match self.branch_id {
            None => true,
            Some(own) => own == branch_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub branch_id: Option<i64>,
}
