use axum::http::{header::COOKIE, HeaderMap};

use crate::auth::jwt::SESSION_TTL_SECS;

pub const SESSION_COOKIE: &str = "jwt";

/// Build the Set-Cookie value carrying a freshly issued session token.
/// httpOnly keeps the token away from page scripts.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; Max-Age={SESSION_TTL_SECS}")
}

/// Logout overwrites the cookie with an empty, immediately-expiring value.
/// Previously issued tokens remain verifiable until natural expiry.
pub fn clear_session() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0")
}

/// Pull the session token out of the request's Cookie header, if any.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.to_string())
}
