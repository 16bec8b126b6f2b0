use axum::{http::StatusCode, response::IntoResponse, Json};
use tracing::{error, warn};
use uuid::Uuid;

use crate::auth::{
    dto::ErrorBody,
    password::{hash_password, verify_password},
    repo::UserStore,
    repo_types::{StoreError, User},
};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Password must be at least 6 characters.")]
    WeakPassword,
    #[error("Username or Password not supplied")]
    MissingCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("password mismatch")]
    PasswordMismatch,
    #[error("username is required")]
    MissingUsername,
    #[error("{0}")]
    DuplicateUsername(String),
    #[error("No user ID supplied")]
    MissingId,
    #[error("User not found")]
    NotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AccountError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self {
            AccountError::WeakPassword | AccountError::MissingCredentials
            | AccountError::MissingId => {
                (StatusCode::BAD_REQUEST, ErrorBody::new(self.to_string()))
            }
            AccountError::UserNotFound => (
                StatusCode::BAD_REQUEST,
                ErrorBody::with_detail("Login not successful", "User not found"),
            ),
            AccountError::PasswordMismatch => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Login not successful"),
            ),
            AccountError::MissingUsername => (
                StatusCode::BAD_REQUEST,
                ErrorBody::with_detail("User not successfully created", self.to_string()),
            ),
            AccountError::DuplicateUsername(detail) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::with_detail("User not successfully created", detail.clone()),
            ),
            AccountError::NotFound => (
                StatusCode::BAD_REQUEST,
                ErrorBody::with_detail("An error occurred", self.to_string()),
            ),
            AccountError::Internal(e) => {
                error!(error = %e, "account operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("An error occurred"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Create a new user record. The store's unique constraint is the only
/// guard against duplicate usernames; a concurrent duplicate registration
/// is resolved by the store rejecting the second writer.
pub async fn register(
    store: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<User, AccountError> {
    if password.len() < 6 {
        warn!("registration rejected, password too short");
        return Err(AccountError::WeakPassword);
    }
    if username.is_empty() {
        warn!("registration rejected, no username supplied");
        return Err(AccountError::MissingUsername);
    }

    let hash = hash_password(password)?;
    match store.create(username, &hash).await {
        Ok(user) => Ok(user),
        Err(StoreError::Duplicate(message)) => {
            warn!(%username, "registration rejected, username taken");
            Err(AccountError::DuplicateUsername(message))
        }
        Err(StoreError::Other(e)) => Err(AccountError::Internal(e)),
    }
}

pub async fn login(
    store: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<User, AccountError> {
    if username.is_empty() || password.is_empty() {
        return Err(AccountError::MissingCredentials);
    }

    let user = store
        .find_by_username(username)
        .await?
        .ok_or(AccountError::UserNotFound)?;

    if !verify_password(password, &user.password_hash)? {
        warn!(%username, "login rejected, password mismatch");
        return Err(AccountError::PasswordMismatch);
    }
    Ok(user)
}

/// Overwrite the user's preference list. The target id comes from the
/// request body and is not tied to the caller's own identity; any caller
/// reaching this operation may update any user's preferences.
pub async fn update_preferences(
    store: &dyn UserStore,
    id: Option<Uuid>,
    preferences: Option<Vec<String>>,
) -> Result<User, AccountError> {
    let id = id.ok_or(AccountError::MissingId)?;

    match preferences {
        Some(preferences) => store
            .save_preferences(id, &preferences)
            .await?
            .ok_or(AccountError::NotFound),
        // Nothing to change, but the record must still exist.
        None => store.find_by_id(id).await?.ok_or(AccountError::NotFound),
    }
}

/// Deletion is not implemented; callers observe no effect and no error.
pub async fn delete_user(_store: &dyn UserStore) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::InMemoryUsers;
    use crate::auth::repo_types::Role;

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let store = InMemoryUsers::default();
        let user = register(&store, "alice", "correctpw").await.expect("register");
        assert_eq!(user.username, "alice");
        assert_eq!(user.role, Role::Basic);
        assert_ne!(user.password_hash, "correctpw");

        let logged_in = login(&store, "alice", "correctpw").await.expect("login");
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn register_rejects_short_password_without_creating_record() {
        let store = InMemoryUsers::default();
        let err = register(&store, "alice", "pw").await.unwrap_err();
        assert!(matches!(err, AccountError::WeakPassword));
        assert!(store
            .find_by_username("alice")
            .await
            .expect("store read")
            .is_none());
    }

    #[tokio::test]
    async fn register_rejects_empty_username_without_creating_record() {
        let store = InMemoryUsers::default();
        let err = register(&store, "", "correctpw").await.unwrap_err();
        assert!(matches!(err, AccountError::MissingUsername));
        assert!(store
            .find_by_username("")
            .await
            .expect("store read")
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_fails_leaving_one_record() {
        let store = InMemoryUsers::default();
        let first = register(&store, "alice", "correctpw").await.expect("register");
        let err = register(&store, "alice", "otherpw99").await.unwrap_err();
        assert!(matches!(err, AccountError::DuplicateUsername(_)));

        let survivor = store
            .find_by_username("alice")
            .await
            .expect("store read")
            .expect("record exists");
        assert_eq!(survivor.id, first.id);
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let store = InMemoryUsers::default();
        register(&store, "alice", "correctpw").await.expect("register");
        let err = login(&store, "alice", "wrongpass").await.unwrap_err();
        assert!(matches!(err, AccountError::PasswordMismatch));
    }

    #[tokio::test]
    async fn login_rejects_unknown_user_and_empty_credentials() {
        let store = InMemoryUsers::default();
        let err = login(&store, "nobody", "whatever").await.unwrap_err();
        assert!(matches!(err, AccountError::UserNotFound));

        let err = login(&store, "", "whatever").await.unwrap_err();
        assert!(matches!(err, AccountError::MissingCredentials));
        let err = login(&store, "alice", "").await.unwrap_err();
        assert!(matches!(err, AccountError::MissingCredentials));
    }

    #[tokio::test]
    async fn update_preferences_persists_ordered_list_verbatim() {
        let store = InMemoryUsers::default();
        let user = register(&store, "alice", "correctpw").await.expect("register");

        let prefs = vec!["balanced".to_string(), "vegan".to_string()];
        let updated = update_preferences(&store, Some(user.id), Some(prefs.clone()))
            .await
            .expect("update");
        assert_eq!(updated.home_preferences, prefs);

        let stored = store
            .find_by_id(user.id)
            .await
            .expect("store read")
            .expect("record exists");
        assert_eq!(stored.home_preferences, prefs);
    }

    #[tokio::test]
    async fn update_preferences_requires_id_and_existing_record() {
        let store = InMemoryUsers::default();
        let err = update_preferences(&store, None, Some(vec![])).await.unwrap_err();
        assert!(matches!(err, AccountError::MissingId));

        let err = update_preferences(&store, Some(Uuid::new_v4()), Some(vec!["vegan".into()]))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
    }

    #[tokio::test]
    async fn update_without_preference_list_returns_record_unchanged() {
        let store = InMemoryUsers::default();
        let user = register(&store, "alice", "correctpw").await.expect("register");
        let unchanged = update_preferences(&store, Some(user.id), None)
            .await
            .expect("update");
        assert!(unchanged.home_preferences.is_empty());
    }

    #[tokio::test]
    async fn delete_user_is_a_no_op() {
        let store = InMemoryUsers::default();
        let user = register(&store, "alice", "correctpw").await.expect("register");
        delete_user(&store).await;
        assert!(store
            .find_by_id(user.id)
            .await
            .expect("store read")
            .is_some());
    }
}
