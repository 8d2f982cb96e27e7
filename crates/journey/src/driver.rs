//! UI driver seam. A journey only ever talks to a [`UiDriver`]; whether that
//! is a browser, a headless model of the app, or a test double is up to the
//! caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::backend::FeedbackBackend;
use crate::error::JourneyError;
use crate::pages::{
    Page, DISMISS_BUTTON, FEEDBACK_TEXTAREA, PASSWORD_INPUT, SUBMIT_BUTTON, USERNAME_INPUT,
};

/// Technology-neutral UI operations.
#[async_trait]
pub trait UiDriver: Send {
    /// Drop any session, form or dialog state left by a previous journey.
    async fn reset(&mut self) -> Result<(), JourneyError>;

    async fn navigate(&mut self, page: Page) -> Result<(), JourneyError>;

    async fn fill(&mut self, selector: &str, text: &str) -> Result<(), JourneyError>;

    async fn click(&mut self, selector: &str) -> Result<(), JourneyError>;

    /// Path of the page currently shown.
    async fn current_path(&mut self) -> Result<String, JourneyError>;
}

#[derive(Debug, Clone)]
struct PendingNavigation {
    path: String,
    visible_at: Instant,
}

/// Headless model of the feedback front end. Form submissions go to a
/// [`FeedbackBackend`]; on success the app redirects exactly as the real UI
/// does (register → `/login`, login → `/home`, feedback → confirmation
/// dialog). Backend failures leave the page where it is.
pub struct HeadlessApp {
    backend: Arc<dyn FeedbackBackend>,
    base_url: String,
    navigation_delay: Duration,
    path: String,
    fields: HashMap<String, String>,
    token: Option<String>,
    confirmation_open: bool,
    pending: Option<PendingNavigation>,
}

impl HeadlessApp {
    pub fn new(backend: Arc<dyn FeedbackBackend>, base_url: impl Into<String>) -> Self {
        Self {
            backend,
            base_url: base_url.into(),
            navigation_delay: Duration::ZERO,
            path: "/".to_string(),
            fields: HashMap::new(),
            token: None,
            confirmation_open: false,
            pending: None,
        }
    }

    /// Redirects become visible only after `delay`.
    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }

    /// Full URL of the current page.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn confirmation_open(&self) -> bool {
        self.confirmation_open
    }

    fn apply_pending(&mut self) {
        if let Some(pending) = &self.pending {
            if Instant::now() >= pending.visible_at {
                self.path = pending.path.clone();
                self.fields.clear();
                self.pending = None;
            }
        }
    }

    fn redirect(&mut self, page: Page) {
        self.pending = Some(PendingNavigation {
            path: page.path().to_string(),
            visible_at: Instant::now() + self.navigation_delay,
        });
        self.apply_pending();
    }

    fn current_page(&mut self) -> Result<Page, JourneyError> {
        self.apply_pending();
        Page::from_path(&self.path)
            .ok_or_else(|| JourneyError::Driver(format!("no page at {}", self.url())))
    }

    fn field(&self, selector: &str) -> String {
        self.fields.get(selector).cloned().unwrap_or_default()
    }

    async fn submit(&mut self, page: Page) {
        match page {
            Page::Register => {
                let username = self.field(USERNAME_INPUT);
                let password = self.field(PASSWORD_INPUT);
                match self.backend.register(&username, &password).await {
                    Ok(()) => self.redirect(Page::Login),
                    Err(e) => warn!(error = %e, username = %username, "Registration failed"),
                }
            }
            Page::Login => {
                let username = self.field(USERNAME_INPUT);
                let password = self.field(PASSWORD_INPUT);
                match self.backend.login(&username, &password).await {
                    Ok(token) => {
                        self.token = Some(token);
                        self.redirect(Page::Home);
                    }
                    Err(e) => warn!(error = %e, username = %username, "Login failed"),
                }
            }
            Page::Feedback => {
                let Some(token) = self.token.clone() else {
                    warn!("Feedback submitted without a session");
                    return;
                };
                let text = self.field(FEEDBACK_TEXTAREA);
                match self.backend.submit_feedback(&token, &text).await {
                    Ok(()) => self.confirmation_open = true,
                    Err(e) => warn!(error = %e, "Feedback submission failed"),
                }
            }
            Page::Home => {}
        }
    }
}

impl std::fmt::Debug for HeadlessApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessApp")
            .field("url", &self.url())
            .field("authenticated", &self.token.is_some())
            .field("confirmation_open", &self.confirmation_open)
            .finish()
    }
}

#[async_trait]
impl UiDriver for HeadlessApp {
    async fn reset(&mut self) -> Result<(), JourneyError> {
        self.path = "/".to_string();
        self.fields.clear();
        self.token = None;
        self.confirmation_open = false;
        self.pending = None;
        Ok(())
    }

    async fn navigate(&mut self, page: Page) -> Result<(), JourneyError> {
        debug!(path = page.path(), "Navigating");
        self.pending = None;
        self.path = page.path().to_string();
        self.fields.clear();
        self.confirmation_open = false;
        Ok(())
    }

    async fn fill(&mut self, selector: &str, text: &str) -> Result<(), JourneyError> {
        let page = self.current_page()?;
        if !page.has_element(selector) {
            return Err(JourneyError::Driver(format!(
                "element {selector} not found on {}",
                page.path()
            )));
        }
        self.fields.insert(selector.to_string(), text.to_string());
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<(), JourneyError> {
        let page = self.current_page()?;
        if selector == DISMISS_BUTTON && self.confirmation_open {
            self.confirmation_open = false;
            return Ok(());
        }
        if selector == SUBMIT_BUTTON && page.has_element(selector) {
            self.submit(page).await;
            return Ok(());
        }
        Err(JourneyError::Driver(format!(
            "element {selector} not found on {}",
            page.path()
        )))
    }

    async fn current_path(&mut self) -> Result<String, JourneyError> {
        self.apply_pending();
        Ok(self.path.clone())
    }
}
