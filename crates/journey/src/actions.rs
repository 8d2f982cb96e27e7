//! UI actions: the interaction primitives a journey step issues against a
//! driver.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pages::Page;

/// An action issued against the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiAction {
    /// Navigate to a page.
    Navigate { page: Page },

    /// Type text into a field.
    Fill { selector: String, text: String },

    /// Click an element.
    Click {
        selector: String,
        description: String,
    },

    /// Block until the page is reached or the timeout elapses.
    WaitForPage { page: Page, timeout_ms: u64 },

    /// Fixed settling delay.
    Settle { duration_ms: u64 },
}

impl UiAction {
    pub fn navigate(page: Page) -> Self {
        UiAction::Navigate { page }
    }

    pub fn fill(selector: &str, text: impl Into<String>) -> Self {
        UiAction::Fill {
            selector: selector.to_string(),
            text: text.into(),
        }
    }

    pub fn click(selector: &str, description: &str) -> Self {
        UiAction::Click {
            selector: selector.to_string(),
            description: description.to_string(),
        }
    }

    /// Short description for logs and reports. Filled text is omitted.
    pub fn describe(&self) -> String {
        match self {
            UiAction::Navigate { page } => format!("navigate {}", page.path()),
            UiAction::Fill { selector, .. } => format!("fill {selector}"),
            UiAction::Click { description, .. } => format!("click {description}"),
            UiAction::WaitForPage { page, timeout_ms } => {
                format!("wait for {} ({timeout_ms}ms)", page.path())
            }
            UiAction::Settle { duration_ms } => format!("settle {duration_ms}ms"),
        }
    }
}

/// Outcome of a single executed action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRecord {
    pub success: bool,
    pub action: UiAction,
    pub duration_ms: u64,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ActionRecord {
    pub fn ok(action: UiAction, duration_ms: u64) -> Self {
        Self {
            success: true,
            action,
            duration_ms,
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn fail(action: UiAction, error: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            success: false,
            action,
            duration_ms,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::SUBMIT_BUTTON;

    #[test]
    fn test_action_serde() {
        let action = UiAction::click(SUBMIT_BUTTON, "submit");
        let json = serde_json::to_string(&action).unwrap();
        assert!(json.contains(r#""type":"click""#));
        let parsed: UiAction = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, action);
    }

    #[test]
    fn test_describe_hides_text() {
        let action = UiAction::fill("input[name=\"password\"]", "testpass123");
        assert!(!action.describe().contains("testpass123"));
        assert_eq!(
            UiAction::WaitForPage {
                page: Page::Home,
                timeout_ms: 500
            }
            .describe(),
            "wait for /home (500ms)"
        );
    }

    #[test]
    fn test_action_record() {
        let ok = ActionRecord::ok(UiAction::navigate(Page::Login), 12);
        assert!(ok.success);
        assert_eq!(ok.duration_ms, 12);

        let fail = ActionRecord::fail(UiAction::navigate(Page::Login), "element not found", 3);
        assert!(!fail.success);
        assert_eq!(fail.error.as_deref(), Some("element not found"));
    }
}
