use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::{Role, User};

/// Request body for registration and login. Absent fields deserialize to
/// empty strings so the service can answer with its own missing-credentials
/// body instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Request body for the preference update. The id travels in the body, not
/// the session, matching the account form on the client.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: Option<Uuid>,
    #[serde(rename = "homePreferences")]
    pub home_preferences: Option<Vec<String>>,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: Uuid,
}

/// Response returned after a successful update.
#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    #[serde(rename = "homePreferences")]
    pub home_preferences: Vec<String>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            role: user.role,
            home_preferences: user.home_preferences,
        }
    }
}

/// Error body shared by every failed auth response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: None,
        }
    }

    pub fn with_detail(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            error: Some(detail.into()),
        }
    }
}
