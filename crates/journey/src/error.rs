use thiserror::Error;

use crate::identity::Polarity;
use crate::state_machine::JourneyState;

#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("Invalid state transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: JourneyState,
        to: JourneyState,
    },

    #[error("Timed out after {waited_ms}ms waiting for {expected}")]
    Timeout { expected: String, waited_ms: u64 },

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Requested {requested} {polarity} feedback samples but only {available} exist")]
    CatalogueExhausted {
        polarity: Polarity,
        requested: usize,
        available: usize,
    },
}
