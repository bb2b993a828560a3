//! Storefront REST API transport.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;

use crate::auth::BearerToken;

/// Configuration for reaching the storefront API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API base address, e.g. `"http://localhost:5000/api"`.
    pub base_url: String,

    /// Per-request timeout applied by the transport.
    pub timeout: Duration,
}

/// HTTP client shared by the catalog, cart, auth and checkout services.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base: Url,
    http: Client,
}

impl ApiClient {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the base address is not an absolute URL with a
    /// path, or when the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let base = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|error| ApiError::InvalidBaseUrl(format!("{}: {error}", config.base_url)))?;

        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url));
        }

        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { base, http })
    }

    /// Base address every request path is joined onto.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    /// Request a fixed path below the base address, such as `"/cart"`.
    pub(crate) fn request(
        &self,
        method: Method,
        path: &str,
        credential: Option<&BearerToken>,
    ) -> RequestBuilder {
        let segments: Vec<&str> = path.split('/').filter(|segment| !segment.is_empty()).collect();

        self.request_segments(method, &segments, credential)
    }

    /// Request the path made of `segments`, each percent-encoded so that
    /// user input cannot leave its segment.
    pub(crate) fn request_segments(
        &self,
        method: Method,
        segments: &[&str],
        credential: Option<&BearerToken>,
    ) -> RequestBuilder {
        let mut url = self.base.clone();

        // Checked in `new`: the base always has a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        debug!(%method, %url, authenticated = credential.is_some(), "api request");

        let request = self.http.request(method, url);

        match credential {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    /// Send a request and decode its JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = check_status(request.send().await?).await?;

        Ok(response.json().await?)
    }

    /// Send a request whose response body is irrelevant.
    pub(crate) async fn send_empty(&self, request: RequestBuilder) -> Result<(), ApiError> {
        check_status(request.send().await?).await?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    msg: Option<String>,
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        StatusCode::NOT_FOUND => Err(ApiError::NotFound),
        _ => {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.msg)
                .unwrap_or(text);

            Err(ApiError::UnexpectedResponse {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the bearer credential, or none was sent.
    #[error("request was not authenticated")]
    Unauthorized,

    /// The addressed resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The configured base address cannot be used.
    #[error("invalid api base url: {0}")]
    InvalidBaseUrl(String),

    /// The API returned any other non-2xx response.
    #[error("unexpected response with status {status}: {message}")]
    UnexpectedResponse { status: u16, message: String },
}
