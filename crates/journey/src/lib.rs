//! Journey orchestration: the register → login → submit feedback →
//! acknowledge flow every simulated (and real) user walks through, expressed
//! as an explicit state machine driven over a technology-neutral UI seam.
//!
//! # Modules
//! - `state_machine`: journey states and the transition table
//! - `plan`: the six journey steps with their actions
//! - `pages`: destinations and the named elements on them
//! - `actions`: UI interaction primitives
//! - `identity`: per-run user identities
//! - `catalogue`: ordered sample feedback texts per polarity
//! - `wait`: wait-for-predicate with timeout, and the settling delay
//! - `driver`: the `UiDriver` seam and the headless app model
//! - `backend`: backend seam and the in-memory backend
//! - `http`: reqwest-backed backend
//! - `orchestrator`: single journeys and sequential batches
//! - `reporter`: batch reports

pub mod actions;
pub mod backend;
pub mod catalogue;
pub mod driver;
pub mod error;
pub mod http;
pub mod identity;
pub mod orchestrator;
pub mod pages;
pub mod plan;
pub mod reporter;
pub mod state_machine;
pub mod wait;

pub use catalogue::FeedbackCatalogue;
pub use driver::{HeadlessApp, UiDriver};
pub use error::JourneyError;
pub use identity::{Identity, Polarity};
pub use orchestrator::{BatchPolicy, JourneyOrchestrator};
pub use reporter::BatchReport;
pub use state_machine::{JourneyState, JourneyStateMachine};
