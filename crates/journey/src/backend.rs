//! Backend seam: the remote service a journey ultimately talks to, plus an
//! in-memory implementation with fault injection for tests and dry runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Request rejected with status {0}")]
    Rejected(u16),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Operations the UI forms trigger on the backend.
#[async_trait]
pub trait FeedbackBackend: Send + Sync {
    async fn register(&self, username: &str, password: &str) -> Result<(), BackendError>;

    /// Returns a bearer token.
    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError>;

    async fn submit_feedback(&self, token: &str, text: &str) -> Result<(), BackendError>;
}

/// A stored feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub username: String,
    pub text: String,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Faults {
    registrations: u32,
    logins: u32,
    submissions: u32,
}

/// In-memory backend. Accounts and tokens live in concurrent maps so the
/// backend can be shared between a driver and the test inspecting it.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    accounts: DashMap<String, String>,
    tokens: DashMap<String, String>,
    feedback: Mutex<Vec<FeedbackEntry>>,
    faults: Mutex<Faults>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `n` registrations with a 503.
    pub fn fail_next_registrations(&self, n: u32) {
        self.faults.lock().registrations = n;
    }

    /// Reject the next `n` logins with a 503.
    pub fn fail_next_logins(&self, n: u32) {
        self.faults.lock().logins = n;
    }

    /// Reject the next `n` feedback submissions with a 503.
    pub fn fail_next_submissions(&self, n: u32) {
        self.faults.lock().submissions = n;
    }

    pub fn feedback(&self) -> Vec<FeedbackEntry> {
        self.feedback.lock().clone()
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    pub fn has_account(&self, username: &str) -> bool {
        self.accounts.contains_key(username)
    }
}

fn take_fault(counter: &mut u32) -> bool {
    if *counter > 0 {
        *counter -= 1;
        true
    } else {
        false
    }
}

#[async_trait]
impl FeedbackBackend for InMemoryBackend {
    async fn register(&self, username: &str, password: &str) -> Result<(), BackendError> {
        if take_fault(&mut self.faults.lock().registrations) {
            return Err(BackendError::Rejected(503));
        }
        if username.is_empty() || password.is_empty() {
            return Err(BackendError::Rejected(422));
        }
        if self.accounts.contains_key(username) {
            return Err(BackendError::Rejected(400));
        }
        self.accounts
            .insert(username.to_string(), password.to_string());
        debug!(username, "Registered account");
        Ok(())
    }

    async fn login(&self, username: &str, password: &str) -> Result<String, BackendError> {
        if take_fault(&mut self.faults.lock().logins) {
            return Err(BackendError::Rejected(503));
        }
        let matches = self
            .accounts
            .get(username)
            .is_some_and(|stored| stored.value() == password);
        if !matches {
            return Err(BackendError::Rejected(401));
        }
        let token = format!("tok_{}", Uuid::new_v4().simple());
        self.tokens.insert(token.clone(), username.to_string());
        Ok(token)
    }

    async fn submit_feedback(&self, token: &str, text: &str) -> Result<(), BackendError> {
        if take_fault(&mut self.faults.lock().submissions) {
            return Err(BackendError::Rejected(503));
        }
        let username = self
            .tokens
            .get(token)
            .map(|entry| entry.value().clone())
            .ok_or(BackendError::Unauthenticated)?;
        self.feedback.lock().push(FeedbackEntry {
            username,
            text: text.to_string(),
            submitted_at: Utc::now(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_login_submit() {
        let backend = InMemoryBackend::new();
        backend.register("alice", "pw").await.unwrap();
        let token = backend.login("alice", "pw").await.unwrap();
        backend.submit_feedback(&token, "Nice").await.unwrap();

        let entries = backend.feedback();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].username, "alice");
        assert_eq!(entries[0].text, "Nice");
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let backend = InMemoryBackend::new();
        backend.register("alice", "pw").await.unwrap();
        assert!(matches!(
            backend.register("alice", "other").await,
            Err(BackendError::Rejected(400))
        ));
    }

    #[tokio::test]
    async fn test_bad_credentials_and_token() {
        let backend = InMemoryBackend::new();
        backend.register("alice", "pw").await.unwrap();
        assert!(matches!(
            backend.login("alice", "wrong").await,
            Err(BackendError::Rejected(401))
        ));
        assert!(matches!(
            backend.submit_feedback("forged", "text").await,
            Err(BackendError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_injected_faults_are_consumed() {
        let backend = InMemoryBackend::new();
        backend.register("alice", "pw").await.unwrap();
        backend.fail_next_logins(1);
        assert!(backend.login("alice", "pw").await.is_err());
        assert!(backend.login("alice", "pw").await.is_ok());
    }
}
