use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;
use url::Url;

use lens_core::config::{endpoint_url, AppConfig};
use lens_core::UserProfile;

/// Errors raised while fetching the current user.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("No token found")]
    MissingToken,

    #[error("Failed to fetch user data: status {0}")]
    Status(u16),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Client for `GET /users/me`.
#[derive(Debug, Clone)]
pub struct UserClient {
    http: Client,
    me_url: Url,
}

impl UserClient {
    pub fn new(base_url: &str, me_path: &str, timeout: Duration) -> Result<Self, SessionError> {
        let me_url = endpoint_url(base_url, me_path)?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, me_url })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, SessionError> {
        Self::new(
            &config.backend_url,
            &config.journey.endpoints.me_path,
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    /// Fetch the profile for a bearer token. A missing or blank token fails
    /// without touching the network.
    pub async fn fetch_me(&self, token: Option<&str>) -> Result<UserProfile, SessionError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(SessionError::MissingToken)?;

        debug!(url = %self.me_url, "Fetching current user");
        let response = self
            .http
            .get(self.me_url.clone())
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SessionError::Status(status.as_u16()));
        }

        Ok(response.json::<UserProfile>().await?)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use lens_core::UserRole;

    pub(crate) const GOOD_TOKEN: &str = "token-admin";

    async fn me(headers: HeaderMap) -> Response {
        let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        match auth {
            "Bearer token-admin" => Json(serde_json::json!({
                "username": "admin",
                "role": "Admin",
                "email": "admin@example.com"
            }))
            .into_response(),
            "Bearer token-garbled" => (StatusCode::OK, "not json").into_response(),
            _ => StatusCode::UNAUTHORIZED.into_response(),
        }
    }

    /// Spawn a throwaway backend and return its base URL.
    pub(crate) async fn spawn_backend() -> String {
        let app = Router::new()
            .route("/users/me", get(me))
            .nest("/api", Router::new().route("/users/me", get(me)));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn client(base: &str) -> UserClient {
        UserClient::new(base, "/users/me", Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_me_success() {
        let base = spawn_backend().await;
        let profile = client(&base).fetch_me(Some(GOOD_TOKEN)).await.unwrap();
        assert_eq!(profile.username, "admin");
        assert_eq!(profile.role, UserRole::Admin);
        assert_eq!(profile.email.as_deref(), Some("admin@example.com"));
    }

    #[tokio::test]
    async fn test_fetch_me_missing_token() {
        // Unroutable base: a request would fail differently.
        let client = client("http://127.0.0.1:1");
        assert!(matches!(client.fetch_me(None).await, Err(SessionError::MissingToken)));
        assert!(matches!(client.fetch_me(Some("  ")).await, Err(SessionError::MissingToken)));
    }

    #[tokio::test]
    async fn test_fetch_me_rejected() {
        let base = spawn_backend().await;
        let err = client(&base).fetch_me(Some("stale")).await.unwrap_err();
        assert!(matches!(err, SessionError::Status(401)));
    }

    #[tokio::test]
    async fn test_fetch_me_bad_body() {
        let base = spawn_backend().await;
        let err = client(&base).fetch_me(Some("token-garbled")).await.unwrap_err();
        assert!(matches!(err, SessionError::Transport(_)));
    }

    #[test]
    fn test_invalid_base_url() {
        let err = UserClient::new("not a url", "/users/me", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, SessionError::Url(_)));
    }

    #[tokio::test]
    async fn test_fetch_me_under_path_prefix() {
        let base = spawn_backend().await;
        let client = client(&format!("{base}/api"));
        assert_eq!(client.me_url.as_str(), format!("{base}/api/users/me"));
        let profile = client.fetch_me(Some(GOOD_TOKEN)).await.unwrap();
        assert_eq!(profile.username, "admin");
    }
}
