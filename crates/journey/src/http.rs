//! reqwest-backed [`FeedbackBackend`] for driving a live deployment.
//!
//! Registration posts JSON credentials, login uses the OAuth2 password flow
//! (form-encoded `username`/`password`, JSON `access_token` back), and
//! feedback is posted as JSON with the bearer token.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use lens_core::config::{endpoint_url, AppConfig, EndpointConfig};

use crate::backend::{BackendError, FeedbackBackend};

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct FeedbackRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    register_url: Url,
    token_url: Url,
    feedback_url: Url,
}

impl HttpBackend {
    pub fn new(
        base_url: &str,
        endpoints: &EndpointConfig,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        Ok(Self {
            http: Client::builder().timeout(timeout).build()?,
            register_url: endpoint_url(base_url, &endpoints.register_path)?,
            token_url: endpoint_url(base_url, &endpoints.token_path)?,
            feedback_url: endpoint_url(base_url, &endpoints.feedback_path)?,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, BackendError> {
        Self::new(
            &config.backend_url,
            &config.journey.endpoints,
            Duration::from_millis(config.request_timeout_ms),
        )
    }
}

fn check(status: StatusCode) -> Result<(), BackendError> {
    match status {
        s if s.is_success() => Ok(()),
        StatusCode::UNAUTHORIZED => Err(BackendError::Unauthenticated),
        s => Err(BackendError::Rejected(s.as_u16())),
    }
}

#[async_trait]
impl FeedbackBackend for HttpBackend {
    async fn register(&self, username: &str, password: &str) -> Result<(), BackendError> {
        debug!(url = %self.register_url, username, "POST register");
        let response = self
            .http
            .post(self.register_url.clone())
            .json(&Credentials { username, password })
            .send()
            .await?;
        check(response.status())
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError> {
        debug!(url = %self.token_url, username, "POST token");
        let response = self
            .http
            .post(self.token_url.clone())
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;
        check(response.status())?;
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    async fn submit_feedback(&self, token: &str, text: &str) -> Result<(), BackendError> {
        debug!(url = %self.feedback_url, "POST feedback");
        let response = self
            .http
            .post(self.feedback_url.clone())
            .bearer_auth(token)
            .json(&FeedbackRequest { content: text })
            .send()
            .await?;
        check(response.status())
    }
}
