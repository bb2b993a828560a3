//! Customer account.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    auth::{
        AuthService, AuthServiceError, BearerToken, Credentials, NewUser, ProfileUpdate, Session,
        User, session::SessionStore,
    },
    domain::carts::CartReconciler,
};

/// Signed-in state shared by the auth flows and the cart.
///
/// Every change of credential is forwarded to the [`CartReconciler`], which
/// reloads from the matching source.
pub struct Account {
    auth: Arc<dyn AuthService>,
    sessions: SessionStore,
    cart: Arc<CartReconciler>,
    session: watch::Sender<Option<Session>>,
}

impl Account {
    #[must_use]
    pub fn new(auth: Arc<dyn AuthService>, sessions: SessionStore, cart: Arc<CartReconciler>) -> Self {
        Self {
            auth,
            sessions,
            cart,
            session: watch::channel(None).0,
        }
    }

    /// Receive the session every time it changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.session.subscribe()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.session.borrow().as_ref().map(|session| session.user.clone())
    }

    #[must_use]
    pub fn token(&self) -> Option<BearerToken> {
        self.session.borrow().as_ref().map(|session| session.token.clone())
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.session.borrow().is_some()
    }

    /// Pick up the persisted session, if any, and load the matching cart.
    pub async fn restore(&self) -> Option<User> {
        let session = self.sessions.load().await;
        let user = session.as_ref().map(|session| session.user.clone());

        self.activate(session).await;

        user
    }

    /// # Errors
    ///
    /// Returns [`AuthServiceError::InvalidCredentials`] for a wrong email or
    /// password, or an error when the session cannot be persisted.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, AuthServiceError> {
        let session = self.auth.login(credentials).await?;

        self.sessions.save(&session).await?;

        let user = session.user.clone();

        info!(email = %user.email, "signed in");

        self.activate(Some(session)).await;

        Ok(user)
    }

    /// Create an account and sign straight into it.
    ///
    /// # Errors
    ///
    /// Returns the registration error, or any error from the following login.
    pub async fn register(&self, user: &NewUser) -> Result<User, AuthServiceError> {
        self.auth.register(user).await?;

        self.login(&user.credentials()).await
    }

    /// Forget the session and return the cart to guest mode.
    ///
    /// # Errors
    ///
    /// Returns an error when the persisted session cannot be removed. The
    /// in-memory session is dropped regardless.
    pub async fn logout(&self) -> Result<(), AuthServiceError> {
        self.activate(None).await;

        self.sessions.clear().await?;

        info!("signed out");

        Ok(())
    }

    /// Re-read the profile and persist it.
    ///
    /// A rejected token ends the session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::NotSignedIn`] without a session, or the
    /// service error.
    pub async fn refresh_profile(&self) -> Result<User, AuthServiceError> {
        let token = self.token().ok_or(AuthServiceError::NotSignedIn)?;

        let user = match self.auth.profile(&token).await {
            Ok(user) => user,
            Err(AuthServiceError::InvalidCredentials) => {
                warn!("session rejected by the auth service, signing out");
                self.logout().await?;
                return Err(AuthServiceError::NotSignedIn);
            }
            Err(error) => return Err(error),
        };

        self.sessions.save_user(&user).await?;
        self.session.send_modify(|session| {
            if let Some(session) = session {
                session.user = user.clone();
            }
        });

        Ok(user)
    }

    /// Apply `update`, then re-read the stored profile.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::NotSignedIn`] without a session, or the
    /// service error (for example a wrong current password).
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, AuthServiceError> {
        let token = self.token().ok_or(AuthServiceError::NotSignedIn)?;

        self.auth.update_profile(&token, update).await?;

        self.refresh_profile().await
    }

    /// Delete the account and sign out.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::NotSignedIn`] without a session, or the
    /// service error. The session is kept when the deletion fails.
    pub async fn delete_account(&self) -> Result<(), AuthServiceError> {
        let token = self.token().ok_or(AuthServiceError::NotSignedIn)?;

        self.auth.delete_profile(&token).await?;

        info!("account deleted");

        self.logout().await
    }

    async fn activate(&self, session: Option<Session>) {
        let token = session.as_ref().map(|session| session.token.clone());

        self.session.send_replace(session);
        self.cart.set_credential(token).await;
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("user", &self.user())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        api::ApiError,
        auth::MockAuthService,
        domain::{carts::models::IdentityMode, products::models::ProductId},
        storage::KeyValueStore,
        test::{
            fake_cart::FakeCartService,
            helpers::{catalog, memory_store, reconciler, token},
        },
    };

    use super::*;

    fn ana() -> User {
        User {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "ana@example.com".to_string(),
            password: "secreto".to_string(),
        }
    }

    fn account(auth: MockAuthService, store: Arc<dyn KeyValueStore>) -> Account {
        let remote = Arc::new(FakeCartService::new("tok", catalog()).with_lines(&[(10, 2)]));
        let cart = Arc::new(reconciler(store.clone(), remote));

        Account::new(Arc::new(auth), SessionStore::new(store), cart)
    }

    fn logging_in(auth: &mut MockAuthService) {
        auth.expect_login()
            .withf(|credentials| credentials.email == "ana@example.com")
            .returning(|_| {
                Ok(Session {
                    token: token("tok"),
                    user: ana(),
                })
            });
    }

    #[tokio::test]
    async fn login_persists_session_and_switches_cart() -> TestResult {
        let mut auth = MockAuthService::new();
        logging_in(&mut auth);

        let store = memory_store();
        let account = account(auth, store.clone());

        assert_eq!(account.login(&credentials()).await?, ana());
        assert!(account.is_signed_in());
        assert_eq!(account.cart.mode(), IdentityMode::Authenticated);
        assert_eq!(account.cart.view().quantity_of(ProductId::new(10)), 2);
        assert_eq!(store.get("token").await?.as_deref(), Some("tok"));

        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_leaves_guest_mode() {
        let mut auth = MockAuthService::new();
        auth.expect_login()
            .returning(|_| Err(AuthServiceError::from(ApiError::Unauthorized)));

        let account = account(auth, memory_store());

        assert!(matches!(
            account.login(&credentials()).await,
            Err(AuthServiceError::InvalidCredentials)
        ));
        assert!(!account.is_signed_in());
        assert_eq!(account.cart.mode(), IdentityMode::Guest);
    }

    #[tokio::test]
    async fn register_then_logs_in() -> TestResult {
        let mut auth = MockAuthService::new();
        let mut sequence = mockall::Sequence::new();

        auth.expect_register()
            .once()
            .in_sequence(&mut sequence)
            .withf(|user| user.name == "Ana")
            .returning(|_| Ok(()));
        auth.expect_login()
            .once()
            .in_sequence(&mut sequence)
            .returning(|_| {
                Ok(Session {
                    token: token("tok"),
                    user: ana(),
                })
            });

        let account = account(auth, memory_store());

        let user = account
            .register(&NewUser {
                name: "Ana".to_string(),
                email: "ana@example.com".to_string(),
                password: "secreto".to_string(),
            })
            .await?;

        assert_eq!(user, ana());

        Ok(())
    }

    #[tokio::test]
    async fn restore_and_logout_round_trip() -> TestResult {
        let mut auth = MockAuthService::new();
        logging_in(&mut auth);

        let store = memory_store();

        account(auth, store.clone()).login(&credentials()).await?;

        let restored = account(MockAuthService::new(), store.clone());

        assert_eq!(restored.restore().await, Some(ana()));
        assert_eq!(restored.cart.mode(), IdentityMode::Authenticated);

        restored.logout().await?;

        assert!(!restored.is_signed_in());
        assert_eq!(restored.cart.mode(), IdentityMode::Guest);
        assert_eq!(SessionStore::new(store).load().await, None);

        Ok(())
    }

    #[tokio::test]
    async fn update_profile_rereads_profile() -> TestResult {
        let mut auth = MockAuthService::new();
        logging_in(&mut auth);

        auth.expect_update_profile()
            .once()
            .withf(|_, update| update.name.as_deref() == Some("Ana María"))
            .returning(|_, _| Ok(()));
        auth.expect_profile().once().returning(|_| {
            Ok(User {
                name: "Ana María".to_string(),
                email: "ana@example.com".to_string(),
            })
        });

        let account = account(auth, memory_store());
        account.login(&credentials()).await?;

        let user = account
            .update_profile(&ProfileUpdate {
                name: Some("Ana María".to_string()),
                ..ProfileUpdate::default()
            })
            .await?;

        assert_eq!(user.name, "Ana María");
        assert_eq!(account.user().map(|user| user.name), Some("Ana María".to_string()));

        Ok(())
    }

    #[tokio::test]
    async fn rejected_token_on_profile_read_signs_out() -> TestResult {
        let mut auth = MockAuthService::new();
        logging_in(&mut auth);

        auth.expect_profile()
            .returning(|_| Err(AuthServiceError::InvalidCredentials));

        let account = account(auth, memory_store());
        account.login(&credentials()).await?;

        assert!(matches!(
            account.refresh_profile().await,
            Err(AuthServiceError::NotSignedIn)
        ));
        assert!(!account.is_signed_in());

        Ok(())
    }

    #[tokio::test]
    async fn delete_account_signs_out() -> TestResult {
        let mut auth = MockAuthService::new();
        logging_in(&mut auth);

        auth.expect_delete_profile().once().returning(|_| Ok(()));

        let account = account(auth, memory_store());
        account.login(&credentials()).await?;
        account.delete_account().await?;

        assert!(!account.is_signed_in());
        assert_eq!(account.cart.mode(), IdentityMode::Guest);

        Ok(())
    }

    #[tokio::test]
    async fn profile_operations_require_a_session() {
        let mut auth = MockAuthService::new();

        auth.expect_profile().never();
        auth.expect_update_profile().never();
        auth.expect_delete_profile().never();

        let account = account(auth, memory_store());

        assert!(matches!(
            account.refresh_profile().await,
            Err(AuthServiceError::NotSignedIn)
        ));
        assert!(matches!(
            account.update_profile(&ProfileUpdate::default()).await,
            Err(AuthServiceError::NotSignedIn)
        ));
        assert!(matches!(
            account.delete_account().await,
            Err(AuthServiceError::NotSignedIn)
        ));
    }
}
