//! Journey plan: the six steps of a journey. Each step knows the state it
//! starts from, the state it lands in, and the UI actions that take it there,
//! so every step can be inspected without a driver or a clock.

use serde::{Deserialize, Serialize};

use lens_core::config::JourneyConfig;

use crate::actions::UiAction;
use crate::identity::Identity;
use crate::pages::{
    Page, DISMISS_BUTTON, FEEDBACK_TEXTAREA, PASSWORD_INPUT, SUBMIT_BUTTON, USERNAME_INPUT,
};
use crate::state_machine::JourneyState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyStep {
    Register,
    ConfirmRegistration,
    SubmitCredentials,
    ConfirmAuthentication,
    SubmitFeedback,
    Acknowledge,
}

/// Timing budget shared by all steps of a journey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTimings {
    pub navigation_timeout_ms: u64,
    pub settle_delay_ms: u64,
    pub poll_interval_ms: u64,
}

impl From<&JourneyConfig> for StepTimings {
    fn from(config: &JourneyConfig) -> Self {
        Self {
            navigation_timeout_ms: config.navigation_timeout_ms,
            settle_delay_ms: config.settle_delay_ms,
            poll_interval_ms: config.poll_interval_ms,
        }
    }
}

impl Default for StepTimings {
    fn default() -> Self {
        Self::from(&JourneyConfig::default())
    }
}

impl JourneyStep {
    pub const ALL: [JourneyStep; 6] = [
        JourneyStep::Register,
        JourneyStep::ConfirmRegistration,
        JourneyStep::SubmitCredentials,
        JourneyStep::ConfirmAuthentication,
        JourneyStep::SubmitFeedback,
        JourneyStep::Acknowledge,
    ];

    /// State the journey must be in before this step runs.
    pub fn from(&self) -> JourneyState {
        match self {
            JourneyStep::Register => JourneyState::Anonymous,
            JourneyStep::ConfirmRegistration => JourneyState::Registering,
            JourneyStep::SubmitCredentials => JourneyState::Registered,
            JourneyStep::ConfirmAuthentication => JourneyState::Authenticating,
            JourneyStep::SubmitFeedback => JourneyState::Authenticated,
            JourneyStep::Acknowledge => JourneyState::SubmittingFeedback,
        }
    }

    /// State the journey lands in once this step succeeds.
    pub fn to(&self) -> JourneyState {
        match self {
            JourneyStep::Register => JourneyState::Registering,
            JourneyStep::ConfirmRegistration => JourneyState::Registered,
            JourneyStep::SubmitCredentials => JourneyState::Authenticating,
            JourneyStep::ConfirmAuthentication => JourneyState::Authenticated,
            JourneyStep::SubmitFeedback => JourneyState::SubmittingFeedback,
            JourneyStep::Acknowledge => JourneyState::Acknowledged,
        }
    }

    pub fn trigger(&self) -> &'static str {
        match self {
            JourneyStep::Register => "register",
            JourneyStep::ConfirmRegistration => "login_page_reached",
            JourneyStep::SubmitCredentials => "submit_credentials",
            JourneyStep::ConfirmAuthentication => "home_page_reached",
            JourneyStep::SubmitFeedback => "submit_feedback",
            JourneyStep::Acknowledge => "dismiss_confirmation",
        }
    }

    /// The step that starts from `state`, if any.
    pub fn starting_at(state: JourneyState) -> Option<JourneyStep> {
        Self::ALL.into_iter().find(|step| step.from() == state)
    }

    /// UI actions that carry the journey through this step.
    pub fn actions(
        &self,
        identity: &Identity,
        feedback: &str,
        timings: &StepTimings,
    ) -> Vec<UiAction> {
        let credentials = || {
            vec![
                UiAction::fill(USERNAME_INPUT, identity.username.clone()),
                UiAction::fill(PASSWORD_INPUT, identity.password.clone()),
                UiAction::click(SUBMIT_BUTTON, "submit"),
            ]
        };
        let settle = UiAction::Settle {
            duration_ms: timings.settle_delay_ms,
        };

        match self {
            JourneyStep::Register => {
                let mut actions = vec![UiAction::navigate(Page::Register)];
                actions.extend(credentials());
                actions
            }
            JourneyStep::ConfirmRegistration => vec![UiAction::WaitForPage {
                page: Page::Login,
                timeout_ms: timings.navigation_timeout_ms,
            }],
            JourneyStep::SubmitCredentials => credentials(),
            JourneyStep::ConfirmAuthentication => vec![UiAction::WaitForPage {
                page: Page::Home,
                timeout_ms: timings.navigation_timeout_ms,
            }],
            JourneyStep::SubmitFeedback => vec![
                settle,
                UiAction::navigate(Page::Feedback),
                UiAction::fill(FEEDBACK_TEXTAREA, feedback),
                UiAction::click(SUBMIT_BUTTON, "submit feedback"),
            ],
            JourneyStep::Acknowledge => {
                vec![settle, UiAction::click(DISMISS_BUTTON, "dismiss confirmation")]
            }
        }
    }
}

impl std::fmt::Display for JourneyStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.trigger())
    }
}
