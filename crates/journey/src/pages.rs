//! Page object models: the navigable destinations of the feedback app and
//! the named elements a journey interacts with on each.

use serde::{Deserialize, Serialize};

pub const USERNAME_INPUT: &str = r#"input[name="username"]"#;
pub const PASSWORD_INPUT: &str = r#"input[name="password"]"#;
pub const SUBMIT_BUTTON: &str = r#"button[type="submit"]"#;
pub const FEEDBACK_TEXTAREA: &str = r#"textarea[placeholder="Enter your feedback here"]"#;
pub const DISMISS_BUTTON: &str = r#"button[class*="MuiButton-root"]"#;

/// Page identifier matching the app's route structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Register,
    Login,
    Home,
    Feedback,
}

impl Page {
    /// URL path for this page.
    pub fn path(&self) -> &'static str {
        match self {
            Page::Register => "/register",
            Page::Login => "/login",
            Page::Home => "/home",
            Page::Feedback => "/feedback",
        }
    }

    pub fn from_path(path: &str) -> Option<Page> {
        match path.trim_end_matches('/') {
            "/register" => Some(Page::Register),
            "/login" => Some(Page::Login),
            "/home" => Some(Page::Home),
            "/feedback" => Some(Page::Feedback),
            _ => None,
        }
    }

    /// Interactive elements present on the page.
    pub fn elements(&self) -> Vec<PageElement> {
        match self {
            Page::Register | Page::Login => vec![
                PageElement::new("username_input", USERNAME_INPUT, ElementType::Input),
                PageElement::new("password_input", PASSWORD_INPUT, ElementType::Input),
                PageElement::new("submit_button", SUBMIT_BUTTON, ElementType::Button),
            ],
            Page::Home => vec![],
            Page::Feedback => vec![
                PageElement::new("feedback_text", FEEDBACK_TEXTAREA, ElementType::TextArea),
                PageElement::new("submit_button", SUBMIT_BUTTON, ElementType::Button),
            ],
        }
    }

    pub fn has_element(&self, selector: &str) -> bool {
        self.elements().iter().any(|e| e.selector == selector)
    }
}

/// An element on a page that can be interacted with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageElement {
    pub name: String,
    pub selector: String,
    pub element_type: ElementType,
}

impl PageElement {
    fn new(name: &str, selector: &str, element_type: ElementType) -> Self {
        Self {
            name: name.to_string(),
            selector: selector.to_string(),
            element_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    Input,
    TextArea,
    Button,
}
