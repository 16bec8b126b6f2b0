use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Coarse authorization tier. New accounts always start as `Basic`;
/// no exposed operation can escalate a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
pub enum Role {
    Basic,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Basic
    }
}

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                       // unique user ID
    pub username: String,               // unique login name
    #[serde(skip_serializing)]
    pub password_hash: String,          // Argon2 hash, not exposed in JSON
    pub role: Role,
    pub home_preferences: Vec<String>,  // ordered diet tags
}

/// Store failures, with the unique-constraint violation kept distinct so the
/// service layer can surface it as a duplicate-username conflict.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Duplicate(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
