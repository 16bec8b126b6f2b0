use axum::{
    extract::{FromRef, State},
    http::{header::SET_COOKIE, StatusCode},
    response::{AppendHeaders, IntoResponse, Redirect},
    routing::{post, put},
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        cookie,
        dto::{AuthResponse, CredentialsRequest, ErrorBody, PublicUser, UpdateRequest, UpdateResponse},
        extractors::{CurrentUser, RequireAdmin, RequireBasic},
        jwt::SessionKeys,
        service::{self, AccountError},
    },
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/update", put(update))
        .route("/deleteUser", put(delete_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AccountError> {
    let user = service::register(state.users.as_ref(), &payload.username, &payload.password).await?;

    let keys = SessionKeys::from_ref(&state);
    let token = keys.issue(&user).map_err(AccountError::Internal)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, cookie::session_cookie(&token))]),
        Json(AuthResponse {
            message: "User successfully created".into(),
            user_id: user.id,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AccountError> {
    let user = service::login(state.users.as_ref(), &payload.username, &payload.password).await?;

    let keys = SessionKeys::from_ref(&state);
    let token = keys.issue(&user).map_err(AccountError::Internal)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(SET_COOKIE, cookie::session_cookie(&token))]),
        Json(AuthResponse {
            message: "User successfully logged in".into(),
            user_id: user.id,
        }),
    ))
}

#[instrument(skip_all)]
pub async fn update(
    State(state): State<AppState>,
    _gate: RequireBasic,
    Json(payload): Json<UpdateRequest>,
) -> Result<impl IntoResponse, AccountError> {
    let user =
        service::update_preferences(state.users.as_ref(), payload.id, payload.home_preferences)
            .await?;

    info!(user_id = %user.id, "preferences updated");
    Ok((
        StatusCode::CREATED,
        Json(UpdateResponse {
            message: "User updated successfully".into(),
            user: PublicUser::from(user),
        }),
    ))
}

/// Account deletion stub: admin callers observe no effect and no error.
#[instrument(skip_all)]
pub async fn delete_user(State(state): State<AppState>, _gate: RequireAdmin) -> StatusCode {
    service::delete_user(state.users.as_ref()).await;
    StatusCode::OK
}

pub async fn logout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, cookie::clear_session())]),
        Redirect::to("/"),
    )
}

/// Profile of the logged-in user, re-derived from the store so the
/// preference list reflects the latest update rather than the token.
#[instrument(skip_all)]
pub async fn account(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
) -> Result<Json<PublicUser>, (StatusCode, Json<ErrorBody>)> {
    let claims = current.ok_or((
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody::new("Not authorized, token not available")),
    ))?;

    let user = state
        .users
        .find_by_id(claims.id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "account lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new("An error occurred")),
            )
        })?
        .ok_or((
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::with_detail("An error occurred", "User not found")),
        ))?;

    Ok(Json(PublicUser::from(user)))
}
