use serde::{Deserialize, Serialize};

use crate::error::JourneyError;
use crate::plan::JourneyStep;

/// Where a single user journey currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JourneyState {
    Anonymous,
    Registering,
    Registered,
    Authenticating,
    Authenticated,
    SubmittingFeedback,
    Acknowledged,
    Failed,
}

impl JourneyState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JourneyState::Acknowledged | JourneyState::Failed)
    }
}

/// Describes a single valid state transition for a journey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub from: JourneyState,
    pub to: JourneyState,
    pub trigger: String,
}

/// Guards a journey by enforcing the linear transition table. Any
/// non-terminal state may fail; nothing leaves a terminal state.
#[derive(Debug, Clone)]
pub struct JourneyStateMachine {
    pub state: JourneyState,
    pub transitions: Vec<StateTransition>,
}

impl JourneyStateMachine {
    /// Creates a new state machine starting in `Anonymous`.
    pub fn new() -> Self {
        let mut transitions: Vec<StateTransition> = JourneyStep::ALL
            .iter()
            .map(|step| StateTransition {
                from: step.from(),
                to: step.to(),
                trigger: step.trigger().to_string(),
            })
            .collect();

        for step in JourneyStep::ALL {
            transitions.push(StateTransition {
                from: step.from(),
                to: JourneyState::Failed,
                trigger: "step_failed".to_string(),
            });
        }

        Self {
            state: JourneyState::Anonymous,
            transitions,
        }
    }

    /// Returns `true` if the given transition is allowed.
    pub fn can_transition(&self, from: &JourneyState, to: &JourneyState) -> bool {
        self.transitions
            .iter()
            .any(|t| t.from == *from && t.to == *to)
    }

    /// Attempts to move the state machine to `to`.
    pub fn transition(&mut self, to: JourneyState) -> Result<(), JourneyError> {
        if self.can_transition(&self.state, &to) {
            self.state = to;
            Ok(())
        } else {
            Err(JourneyError::InvalidTransition {
                from: self.state,
                to,
            })
        }
    }
}

impl Default for JourneyStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
