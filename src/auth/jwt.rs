use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::auth::{claims::Claims, repo_types::User};
use crate::state::AppState;

/// Sessions live exactly three hours; there is no refresh and no server-side
/// revocation, so a stolen token stays verifiable until natural expiry.
pub const SESSION_TTL_SECS: i64 = 3 * 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token expired")]
    Expired,
    #[error("invalid token signature")]
    InvalidSignature,
}

/// Holds JWT signing and verification keys derived from the app secret.
#[derive(Clone)]
pub struct SessionKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        let secret = state.config.jwt.secret.as_bytes();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

impl SessionKeys {
    /// Mint a session token for the given user. CPU-bound signing only,
    /// no other side effects.
    pub fn issue(&self, user: &User) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(SESSION_TTL_SECS);
        let claims = Claims {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user.id, username = %user.username, "session token issued");
        Ok(token)
    }

    /// Pure verification: signature check plus expiry check, nothing else.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data =
            decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::Expired,
                    _ => AuthError::InvalidSignature,
                }
            })?;
        debug!(user_id = %data.claims.id, "session token verified");
        Ok(data.claims)
    }
}
