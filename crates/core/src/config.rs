use std::num::NonZeroU32;

use serde::Deserialize;
use url::Url;

use crate::error::LensResult;

/// Root application configuration. Loaded from environment variables
/// with the prefix `FEEDBACK_LENS__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub journey: JourneyConfig,
}

// ─── Journey Config ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct JourneyConfig {
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_suffix_upper_bound")]
    pub suffix_upper_bound: NonZeroU32,
    #[serde(default)]
    pub endpoints: EndpointConfig,
}

/// Backend API paths, relative to `backend_url`.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_register_path")]
    pub register_path: String,
    #[serde(default = "default_token_path")]
    pub token_path: String,
    #[serde(default = "default_feedback_path")]
    pub feedback_path: String,
    #[serde(default = "default_me_path")]
    pub me_path: String,
}

const DEFAULT_SUFFIX_UPPER_BOUND: NonZeroU32 = match NonZeroU32::new(100_000) {
    Some(bound) => bound,
    None => panic!("suffix bound must be non-zero"),
};

// Default functions
fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_request_timeout_ms() -> u64 {
    5000
}
fn default_password() -> String {
    "testpass123".to_string()
}
fn default_navigation_timeout_ms() -> u64 {
    30_000
}
fn default_settle_delay_ms() -> u64 {
    1000
}
fn default_poll_interval_ms() -> u64 {
    50
}
fn default_suffix_upper_bound() -> NonZeroU32 {
    DEFAULT_SUFFIX_UPPER_BOUND
}
fn default_register_path() -> String {
    "/register".to_string()
}
fn default_token_path() -> String {
    "/token".to_string()
}
fn default_feedback_path() -> String {
    "/feedback".to_string()
}
fn default_me_path() -> String {
    "/users/me".to_string()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            register_path: default_register_path(),
            token_path: default_token_path(),
            feedback_path: default_feedback_path(),
            me_path: default_me_path(),
        }
    }
}

impl Default for JourneyConfig {
    fn default() -> Self {
        Self {
            password: default_password(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            suffix_upper_bound: default_suffix_upper_bound(),
            endpoints: EndpointConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            frontend_url: default_frontend_url(),
            request_timeout_ms: default_request_timeout_ms(),
            journey: JourneyConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> LensResult<Self> {
        Self::from_environment(Self::environment())
    }

    /// The `FEEDBACK_LENS__*` environment source, before any overrides.
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix("FEEDBACK_LENS")
            .separator("__")
            .try_parsing(true)
    }

    pub fn from_environment(env: config::Environment) -> LensResult<Self> {
        let config = config::Config::builder().add_source(env).build()?;
        Ok(config.try_deserialize()?)
    }
}

/// Resolve an endpoint path against a base URL, keeping any path prefix the
/// base carries (`http://host/api` + `/token` is `http://host/api/token`).
pub fn endpoint_url(base_url: &str, path: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path.trim_start_matches('/'))
}
