// src/notify/relay.rs

use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use crate::notify::templates::TemplateParams;

/// Public key value that means "relay not set up yet".
pub const SENTINEL_PUBLIC_KEY: &str = "demo_key";

const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("API error: {0}")]
    ApiError(String),
}

/// A templated-message delivery service.
pub trait MessageRelay: Send + Sync {
    /// False while the relay still carries placeholder credentials.
    fn is_configured(&self) -> bool;

    fn send(&self, template_id: &str, params: &TemplateParams) -> Result<(), RelayError>;
}

#[derive(Debug, Clone)]
pub struct RelayCredentials {
    pub service_id: String,
    pub public_key: String,
}

/// EmailJS REST relay.
pub struct EmailJsRelay {
    creds: RelayCredentials,
    endpoint: String,
    client: Client,
}

#[derive(Serialize)]
struct EmailJsPayload<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

impl EmailJsRelay {
    pub fn new(creds: RelayCredentials, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            creds,
            endpoint: EMAILJS_ENDPOINT.to_string(),
            client,
        }
    }

    /// Point the relay somewhere other than the public EmailJS endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl MessageRelay for EmailJsRelay {
    fn is_configured(&self) -> bool {
        let key = self.creds.public_key.trim();
        !key.is_empty() && key != SENTINEL_PUBLIC_KEY
    }

    fn send(&self, template_id: &str, params: &TemplateParams) -> Result<(), RelayError> {
        let payload = EmailJsPayload {
            service_id: &self.creds.service_id,
            template_id,
            user_id: &self.creds.public_key,
            template_params: params,
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| RelayError::RequestFailed(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(RelayError::ApiError(format!("{status} - {body}")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::test_server::serve_once;

    fn relay(public_key: &str) -> EmailJsRelay {
        EmailJsRelay::new(
            RelayCredentials {
                service_id: "svc".into(),
                public_key: public_key.into(),
            },
            Duration::from_secs(5),
        )
    }

    fn params() -> TemplateParams {
        TemplateParams {
            to_email: "admin@example.com".into(),
            to_name: "Admin".into(),
            subject: "New Appointment Request - Tower 1".into(),
            ..TemplateParams::default()
        }
    }

    #[test]
    fn sentinel_key_means_unconfigured() {
        assert!(!relay(SENTINEL_PUBLIC_KEY).is_configured());
        assert!(!relay("  ").is_configured());
        assert!(relay("pk_live_123").is_configured());
    }

    #[test]
    fn send_posts_emailjs_payload() {
        let (base, handle) = serve_once(200, "OK");
        let r = relay("pk_live_123").with_endpoint(format!("{base}/email/send"));

        r.send("tmpl_admin", &params()).unwrap();

        let raw = handle.join().unwrap();
        assert!(raw.starts_with("POST /api/email/send "));
        assert!(raw.contains(r#""service_id":"svc""#));
        assert!(raw.contains(r#""template_id":"tmpl_admin""#));
        assert!(raw.contains(r#""user_id":"pk_live_123""#));
        assert!(raw.contains(r#""to_email":"admin@example.com""#));
    }

    #[test]
    fn rejected_send_is_an_api_error() {
        let (base, handle) = serve_once(400, "The user_id parameter is invalid");
        let r = relay("pk_live_123").with_endpoint(format!("{base}/email/send"));

        let err = r.send("tmpl_admin", &params()).unwrap_err();
        assert!(matches!(err, RelayError::ApiError(_)));
        handle.join().unwrap();
    }
}
