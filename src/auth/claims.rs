use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::repo_types::Role;

/// JWT payload carried in the session cookie. Integrity-protected, not
/// encrypted: the holder can decode these fields but cannot forge them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,         // user ID
    pub username: String, // login name, shown as the current identity
    pub role: Role,       // basic or admin
    pub iat: usize,       // issued at (unix timestamp)
    pub exp: usize,       // expires at (unix timestamp)
}
