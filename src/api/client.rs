// src/api/client.rs
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Every way a backend call can fail, kept distinguishable for the UI.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    /// Timeouts and 502/503/504: the backend is likely cold-starting.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Bad request ({status}): {body}")]
    BadRequest { status: u16, body: String },
    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text suitable for a toast or inline notice.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Unable to reach the server. Check your connection and try again.",
            ApiError::ServiceUnavailable(_) => {
                "The service is starting up. Please try again in a moment."
            }
            ApiError::NotFound(_) => "The requested item was not found.",
            ApiError::Unauthorized(_) => "You are not authorized to do that. Please sign in again.",
            ApiError::BadRequest { .. } => "The request was rejected. Please check your input.",
            ApiError::Server { .. } => "Something went wrong on the server. Please try again later.",
            ApiError::Decode(_) => "Received an unexpected response from the server.",
        }
    }

    /// Login has its own wording for 401/404.
    pub fn login_message(&self) -> &'static str {
        match self {
            ApiError::Unauthorized(_) => "Invalid email or password",
            ApiError::NotFound(_) => "Account not found. Please register first.",
            ApiError::ServiceUnavailable(_) | ApiError::Network(_) => self.user_message(),
            _ => "Login failed. Please try again.",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::ServiceUnavailable(_) | ApiError::Network(_))
    }
}

/// Map a non-success status to an [`ApiError`]. `what` names the resource.
pub fn classify_status(status: u16, what: &str, body: String) -> ApiError {
    match status {
        401 | 403 => ApiError::Unauthorized(what.to_string()),
        404 => ApiError::NotFound(what.to_string()),
        502..=504 => ApiError::ServiceUnavailable(format!("{what} returned {status}")),
        400..=499 => ApiError::BadRequest { status, body },
        _ => ApiError::Server { status, body },
    }
}

fn classify_transport(e: reqwest::Error, what: &str) -> ApiError {
    if e.is_timeout() {
        ApiError::ServiceUnavailable(format!("{what} timed out"))
    } else if e.is_decode() {
        ApiError::Decode(e.to_string())
    } else {
        ApiError::Network(e.to_string())
    }
}

/// Stateless wrapper around the backend REST API.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| ApiError::Network(format!("invalid base url {base_url}: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base,
            token: None,
        })
    }

    /// Copy of this client that sends `Authorization: Bearer <token>`.
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            client: self.client.clone(),
            base: self.base.clone(),
            token,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// `base` + `/` + `path`, keeping the base path (e.g. `/api`) intact.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        let joined = format!(
            "{}/{}",
            self.base.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|e| ApiError::Network(format!("invalid url {joined}: {e}")))
    }

    pub(crate) fn get(&self, url: Url) -> RequestBuilder {
        self.authorize(self.client.get(url))
    }

    pub(crate) fn post(&self, url: Url) -> RequestBuilder {
        self.authorize(self.client.post(url))
    }

    pub(crate) fn put(&self, url: Url) -> RequestBuilder {
        self.authorize(self.client.put(url))
    }

    pub(crate) fn patch(&self, url: Url) -> RequestBuilder {
        self.authorize(self.client.patch(url))
    }

    pub(crate) fn delete(&self, url: Url) -> RequestBuilder {
        self.authorize(self.client.delete(url))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let req = req.header("Content-Type", "application/json");
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Send and decode the JSON payload. An empty body decodes as `null`.
    pub(crate) fn send<T: DeserializeOwned>(
        &self,
        req: RequestBuilder,
        what: &str,
    ) -> Result<T, ApiError> {
        let resp = req.send().map_err(|e| classify_transport(e, what))?;
        let status: StatusCode = resp.status();

        let body = resp.text().map_err(|e| classify_transport(e, what))?;
        if !status.is_success() {
            return Err(classify_status(status.as_u16(), what, body));
        }

        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(format!("{what}: {e}")))
    }
}
