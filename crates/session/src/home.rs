use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use lens_core::{UserProfile, UserRole};

use crate::client::UserClient;

/// Profile card shown on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileCard {
    pub username: String,
    pub role: UserRole,
    pub initial: String,
    pub greeting: String,
}

impl From<UserProfile> for ProfileCard {
    fn from(profile: UserProfile) -> Self {
        let initial = profile
            .username
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default();
        let greeting = format!("Welcome, {}!", profile.username);
        Self {
            username: profile.username,
            role: profile.role,
            initial,
            greeting,
        }
    }
}

/// Home view state. Fetch failures leave the view in `Loading`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum HomeView {
    Loading,
    Ready(ProfileCard),
}

impl HomeView {
    /// Load the current user. Never fails: any fetch error is logged and
    /// surfaced as `Loading`.
    pub async fn load(client: &UserClient, token: Option<&str>) -> Self {
        match client.fetch_me(token).await {
            Ok(profile) => {
                info!(username = %profile.username, role = %profile.role, "User data loaded");
                HomeView::Ready(profile.into())
            }
            Err(e) => {
                metrics::counter!("session.fetch_failed").increment(1);
                warn!(error = %e, "Error fetching user data");
                HomeView::Loading
            }
        }
    }

    /// Role of the loaded user, if any.
    pub fn role(&self) -> Option<UserRole> {
        match self {
            HomeView::Loading => None,
            HomeView::Ready(card) => Some(card.role),
        }
    }

    pub fn render_text(&self) -> String {
        match self {
            HomeView::Loading => "Loading...\n".to_string(),
            HomeView::Ready(card) => format!(
                "[{}] {}\nUsername: {}\nRole: {}\n",
                card.initial, card.greeting, card.username, card.role
            ),
        }
    }
}
