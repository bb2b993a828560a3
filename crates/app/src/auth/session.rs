//! Persisted session.

use std::sync::Arc;

use tracing::warn;

use crate::{
    auth::{BearerToken, Session, User},
    storage::{self, KeyValueStore, StorageError},
};

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the JSON-encoded user profile.
pub const USER_KEY: &str = "user";

/// Keeps the signed-in session across restarts.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the persisted session.
    ///
    /// A missing or unusable token means "signed out". A token without a
    /// readable profile still counts as a session, with an empty profile.
    pub async fn load(&self) -> Option<Session> {
        let raw = match self.store.get(TOKEN_KEY).await {
            Ok(raw) => raw?,
            Err(error) => {
                warn!("failed to read persisted token: {error}");
                return None;
            }
        };

        let token = match BearerToken::new(raw.trim()) {
            Ok(token) => token,
            Err(error) => {
                warn!("ignoring persisted token: {error}");
                return None;
            }
        };

        let user = match self.store.get(USER_KEY).await {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|error| {
                warn!("ignoring malformed persisted user: {error}");
                empty_user()
            }),
            Ok(None) => empty_user(),
            Err(error) => {
                warn!("failed to read persisted user: {error}");
                empty_user()
            }
        };

        Some(Session { token, user })
    }

    /// Persist both halves of a session.
    ///
    /// # Errors
    ///
    /// Returns an error when either write fails.
    pub async fn save(&self, session: &Session) -> Result<(), StorageError> {
        self.store.set(TOKEN_KEY, session.token.expose()).await?;
        self.save_user(&session.user).await
    }

    /// Persist an updated profile for the current session.
    ///
    /// # Errors
    ///
    /// Returns an error when the write fails.
    pub async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        storage::set_json(self.store.as_ref(), USER_KEY, user).await
    }

    /// Forget the session.
    ///
    /// # Errors
    ///
    /// Returns an error when either key cannot be removed.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.remove(TOKEN_KEY).await?;
        self.store.remove(USER_KEY).await
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

fn empty_user() -> User {
    User {
        name: String::new(),
        email: String::new(),
    }
}
