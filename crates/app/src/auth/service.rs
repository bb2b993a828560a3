//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;

use crate::{
    api::ApiClient,
    auth::{
        AuthServiceError, BearerToken, Credentials, NewUser, ProfileUpdate, Session, User,
        models::LoginResponse,
    },
};

#[derive(Debug, Clone)]
pub struct HttpAuthService {
    api: ApiClient,
}

impl HttpAuthService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl AuthService for HttpAuthService {
    async fn login(&self, credentials: &Credentials) -> Result<Session, AuthServiceError> {
        let request = self
            .api
            .request(Method::POST, "/auth/login", None)
            .json(credentials);

        let response: LoginResponse = self.api.send_json(request).await?;

        Ok(response.into())
    }

    async fn register(&self, user: &NewUser) -> Result<(), AuthServiceError> {
        let request = self
            .api
            .request(Method::POST, "/auth/register", None)
            .json(user);

        self.api.send_empty(request).await?;

        Ok(())
    }

    async fn profile(&self, token: &BearerToken) -> Result<User, AuthServiceError> {
        let request = self.api.request(Method::GET, "/me", Some(token));

        Ok(self.api.send_json(request).await?)
    }

    async fn update_profile(
        &self,
        token: &BearerToken,
        update: &ProfileUpdate,
    ) -> Result<(), AuthServiceError> {
        let request = self.api.request(Method::PUT, "/me", Some(token)).json(update);

        self.api.send_empty(request).await?;

        Ok(())
    }

    async fn delete_profile(&self, token: &BearerToken) -> Result<(), AuthServiceError> {
        let request = self.api.request(Method::DELETE, "/me", Some(token));

        self.api.send_empty(request).await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Exchange credentials for a session.
    async fn login(&self, credentials: &Credentials) -> Result<Session, AuthServiceError>;

    /// Create an account. Does not log in.
    async fn register(&self, user: &NewUser) -> Result<(), AuthServiceError>;

    /// Read the profile of the token's owner.
    async fn profile(&self, token: &BearerToken) -> Result<User, AuthServiceError>;

    /// Apply a partial profile update.
    async fn update_profile(
        &self,
        token: &BearerToken,
        update: &ProfileUpdate,
    ) -> Result<(), AuthServiceError>;

    /// Permanently delete the token owner's account.
    async fn delete_profile(&self, token: &BearerToken) -> Result<(), AuthServiceError>;
}
