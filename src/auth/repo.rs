use std::collections::HashMap;
use std::sync::Mutex;

use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::{Role, StoreError, User};

/// Record-at-a-time access to user records. Username uniqueness is enforced
/// by the store itself: a race between two registrations resolves
/// first-committer-wins, the loser seeing `StoreError::Duplicate`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;
    /// Overwrite the preference list. `None` means no record matched the id.
    async fn save_preferences(
        &self,
        id: Uuid,
        preferences: &[String],
    ) -> anyhow::Result<Option<User>>;
    async fn ping(&self) -> anyhow::Result<()>;
}

pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, home_preferences
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, role, home_preferences
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, role, home_preferences
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(StoreError::Duplicate(db_err.message().to_string()))
            }
            Err(e) => Err(StoreError::Other(e.into())),
        }
    }

    async fn save_preferences(
        &self,
        id: Uuid,
        preferences: &[String],
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET home_preferences = $2
            WHERE id = $1
            RETURNING id, username, password_hash, role, home_preferences
            "#,
        )
        .bind(id)
        .bind(preferences)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

/// In-memory store backing `AppState::fake()` and the service tests.
#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().expect("users lock");
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().expect("users lock");
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut users = self.users.lock().expect("users lock");
        if users.values().any(|u| u.username == username) {
            return Err(StoreError::Duplicate(format!(
                "duplicate key value violates unique constraint \"users_username_key\" ({username})"
            )));
        }
        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role: Role::default(),
            home_preferences: Vec::new(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save_preferences(
        &self,
        id: Uuid,
        preferences: &[String],
    ) -> anyhow::Result<Option<User>> {
        let mut users = self.users.lock().expect("users lock");
        Ok(users.get_mut(&id).map(|user| {
            user.home_preferences = preferences.to_vec();
            user.clone()
        }))
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
