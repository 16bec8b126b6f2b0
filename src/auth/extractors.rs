use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    Json,
};
use tracing::debug;

use crate::auth::{claims::Claims, cookie, dto::ErrorBody, jwt::SessionKeys, repo_types::Role};

/// The current identity, or `None` for anonymous requests. This gate never
/// rejects: a missing or failing token is treated as anonymous and the
/// request proceeds. Verification failures are swallowed here on purpose;
/// pages that work anonymously keep working with a stale cookie.
pub struct CurrentUser(pub Option<Claims>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = cookie::token_from_headers(&parts.headers) else {
            return Ok(CurrentUser(None));
        };
        let keys = SessionKeys::from_ref(state);
        match keys.verify(&token) {
            Ok(claims) => Ok(CurrentUser(Some(claims))),
            Err(e) => {
                debug!(error = %e, "session token rejected, proceeding as anonymous");
                Ok(CurrentUser(None))
            }
        }
    }
}

type Unauthorized = (StatusCode, Json<ErrorBody>);

/// Shared role gate: missing token, failed verification, or a role other
/// than the required one all terminate the request with 401. Deliberately
/// does not hand the claims onward.
fn check_role<S>(parts: &Parts, state: &S, required: Role) -> Result<(), Unauthorized>
where
    SessionKeys: FromRef<S>,
{
    let token = cookie::token_from_headers(&parts.headers).ok_or((
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody::new("Not authorized, token not available")),
    ))?;

    let keys = SessionKeys::from_ref(state);
    let claims = keys
        .verify(&token)
        .map_err(|_| (StatusCode::UNAUTHORIZED, Json(ErrorBody::new("Not authorized"))))?;

    if claims.role != required {
        return Err((
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody::new("Not authorized")),
        ));
    }
    Ok(())
}

/// Gate requiring a valid token whose role is exactly `admin`.
pub struct RequireAdmin;

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Unauthorized;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        check_role(parts, state, Role::Admin)?;
        Ok(RequireAdmin)
    }
}

/// Gate requiring a valid token whose role is exactly `basic`. An admin
/// token does not pass this gate; the roles are matched exactly.
pub struct RequireBasic;

#[async_trait]
impl<S> FromRequestParts<S> for RequireBasic
where
    S: Send + Sync,
    SessionKeys: FromRef<S>,
{
    type Rejection = Unauthorized;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        check_role(parts, state, Role::Basic)?;
        Ok(RequireBasic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo_types::User;
    use crate::state::AppState;
    use axum::http::{header::COOKIE, Request};
    use uuid::Uuid;

    fn parts_with_cookie(token: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(token) = token {
            builder = builder.header(COOKIE, format!("jwt={token}"));
        }
        let (parts, _) = builder.body(()).expect("request").into_parts();
        parts
    }

    fn issue_for(state: &AppState, username: &str, role: Role) -> String {
        let keys = SessionKeys::from_ref(state);
        let user = User {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash: String::new(),
            role,
            home_preferences: Vec::new(),
        };
        keys.issue(&user).expect("issue token")
    }

    #[tokio::test]
    async fn any_access_without_cookie_is_anonymous() {
        let state = AppState::fake();
        let mut parts = parts_with_cookie(None);
        let CurrentUser(identity) = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .expect("infallible");
        assert!(identity.is_none());
    }

    #[tokio::test]
    async fn any_access_with_tampered_cookie_is_anonymous() {
        let state = AppState::fake();
        let mut parts = parts_with_cookie(Some("not.a.token"));
        let CurrentUser(identity) = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .expect("infallible");
        assert!(identity.is_none());
    }

    #[tokio::test]
    async fn any_access_with_valid_token_carries_username() {
        let state = AppState::fake();
        let token = issue_for(&state, "alice", Role::Basic);
        let mut parts = parts_with_cookie(Some(&token));
        let CurrentUser(identity) = CurrentUser::from_request_parts(&mut parts, &state)
            .await
            .expect("infallible");
        assert_eq!(identity.expect("identity").username, "alice");
    }

    #[tokio::test]
    async fn admin_gate_rejects_missing_token() {
        let state = AppState::fake();
        let mut parts = parts_with_cookie(None);
        let (status, _) = RequireAdmin::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("rejected");
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_gate_rejects_basic_role() {
        let state = AppState::fake();
        let token = issue_for(&state, "bob", Role::Basic);
        let mut parts = parts_with_cookie(Some(&token));
        let (status, _) = RequireAdmin::from_request_parts(&mut parts, &state)
            .await
            .err()
            .expect("rejected");
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_gate_accepts_admin_role() {
        let state = AppState::fake();
        let token = issue_for(&state, "root", Role::Admin);
        let mut parts = parts_with_cookie(Some(&token));
        assert!(RequireAdmin::from_request_parts(&mut parts, &state)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn basic_gate_matches_role_exactly() {
        let state = AppState::fake();
        let admin_token = issue_for(&state, "root", Role::Admin);
        let mut parts = parts_with_cookie(Some(&admin_token));
        assert!(RequireBasic::from_request_parts(&mut parts, &state)
            .await
            .is_err());

        let basic_token = issue_for(&state, "bob", Role::Basic);
        let mut parts = parts_with_cookie(Some(&basic_token));
        assert!(RequireBasic::from_request_parts(&mut parts, &state)
            .await
            .is_ok());
    }
}
