//! Journey orchestrator: walks one identity through the six journey steps
//! against a [`UiDriver`], and composes journeys into strictly sequential
//! batches.

use std::num::NonZeroU32;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use lens_core::config::JourneyConfig;

use crate::actions::{ActionRecord, UiAction};
use crate::catalogue::FeedbackCatalogue;
use crate::driver::UiDriver;
use crate::error::JourneyError;
use crate::identity::{Identity, Polarity};
use crate::pages::Page;
use crate::plan::{JourneyStep, StepTimings};
use crate::reporter::BatchReport;
use crate::state_machine::{JourneyState, JourneyStateMachine};
use crate::wait::{settle, wait_until};

/// What a batch does after a journey fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    #[default]
    ContinueOnFailure,
    AbortOnFailure,
}

/// Why and where a journey stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyFailure {
    pub step: JourneyStep,
    pub identity: String,
    pub error: String,
}

/// One executed step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: JourneyStep,
    pub from: JourneyState,
    pub to: JourneyState,
    pub actions: Vec<ActionRecord>,
    pub duration_ms: u64,
    pub success: bool,
}

/// Record of a complete journey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyRun {
    pub id: Uuid,
    pub polarity: Polarity,
    pub index: usize,
    pub identity: String,
    pub final_state: JourneyState,
    pub steps: Vec<StepRecord>,
    pub failure: Option<JourneyFailure>,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl JourneyRun {
    pub fn succeeded(&self) -> bool {
        self.final_state == JourneyState::Acknowledged
    }
}

/// Drives journeys one at a time through a single driver.
pub struct JourneyOrchestrator<D: UiDriver> {
    driver: D,
    catalogue: FeedbackCatalogue,
    timings: StepTimings,
    password: String,
    suffix_upper_bound: NonZeroU32,
}

impl<D: UiDriver> JourneyOrchestrator<D> {
    pub fn new(driver: D, config: &JourneyConfig) -> Self {
        Self {
            driver,
            catalogue: FeedbackCatalogue::default(),
            timings: StepTimings::from(config),
            password: config.password.clone(),
            suffix_upper_bound: config.suffix_upper_bound,
        }
    }

    pub fn with_catalogue(mut self, catalogue: FeedbackCatalogue) -> Self {
        self.catalogue = catalogue;
        self
    }

    pub fn catalogue(&self) -> &FeedbackCatalogue {
        &self.catalogue
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Run one journey with a fresh identity, submitting the catalogue text
    /// at `index`.
    ///
    /// Only a catalogue lookup past the end is returned as `Err`; a step that
    /// fails ends the journey in `Failed` and is recorded in the run.
    pub async fn run_journey(
        &mut self,
        polarity: Polarity,
        index: usize,
    ) -> Result<JourneyRun, JourneyError> {
        let feedback = self.catalogue.text(polarity, index)?.to_string();
        let identity = Identity::generate(polarity, &self.password, self.suffix_upper_bound);
        Ok(self.run_as(identity, &feedback, index).await)
    }

    /// Run one journey for an explicit identity and feedback text.
    pub async fn run_as(&mut self, identity: Identity, feedback: &str, index: usize) -> JourneyRun {
        let started_at = Utc::now();
        let clock = tokio::time::Instant::now();
        let mut machine = JourneyStateMachine::new();
        let mut steps = Vec::new();
        let mut failure = None;

        info!(
            username = %identity.username,
            polarity = %identity.polarity,
            index,
            "Journey starting"
        );

        if let Err(e) = self.driver.reset().await {
            failure = Some(JourneyFailure {
                step: JourneyStep::Register,
                identity: identity.username.clone(),
                error: e.to_string(),
            });
        }

        while failure.is_none() {
            let Some(step) = JourneyStep::starting_at(machine.state) else {
                break;
            };
            let step_clock = tokio::time::Instant::now();
            let (actions, outcome) = self.execute_step(step, &identity, feedback).await;

            let outcome = outcome.and_then(|()| machine.transition(step.to()));
            let success = outcome.is_ok();
            steps.push(StepRecord {
                step,
                from: step.from(),
                to: if success { step.to() } else { JourneyState::Failed },
                actions,
                duration_ms: step_clock.elapsed().as_millis() as u64,
                success,
            });

            if let Err(e) = outcome {
                warn!(
                    username = %identity.username,
                    step = %step,
                    error = %e,
                    "Journey step failed"
                );
                failure = Some(JourneyFailure {
                    step,
                    identity: identity.username.clone(),
                    error: e.to_string(),
                });
            }
        }

        if failure.is_some() && !machine.state.is_terminal() {
            // Every non-terminal state has a failure edge.
            let _ = machine.transition(JourneyState::Failed);
        }

        let duration_ms = clock.elapsed().as_millis() as u64;
        if failure.is_none() {
            metrics::counter!("journey.completed").increment(1);
            info!(username = %identity.username, duration_ms, "Journey acknowledged");
        } else {
            metrics::counter!("journey.failed").increment(1);
        }

        JourneyRun {
            id: Uuid::new_v4(),
            polarity: identity.polarity,
            index,
            identity: identity.username,
            final_state: machine.state,
            steps,
            failure,
            started_at,
            completed_at: Utc::now(),
            duration_ms,
        }
    }

    /// Run `count` journeys in catalogue order, one after another.
    ///
    /// Fails fast, before anything runs, when `count` exceeds the catalogue.
    pub async fn run_batch(
        &mut self,
        polarity: Polarity,
        count: usize,
        policy: BatchPolicy,
    ) -> Result<BatchReport, JourneyError> {
        self.catalogue.ensure_capacity(polarity, count)?;
        info!(%polarity, count, ?policy, "Batch starting");

        let mut runs = Vec::with_capacity(count);
        let mut aborted = false;
        for index in 0..count {
            let run = self.run_journey(polarity, index).await?;
            let failed = !run.succeeded();
            runs.push(run);
            if failed && policy == BatchPolicy::AbortOnFailure {
                warn!(%polarity, index, "Aborting batch after failed journey");
                aborted = index + 1 < count;
                break;
            }
        }

        let report = BatchReport::generate(polarity, count, &runs, aborted);
        info!(
            %polarity,
            passed = report.passed,
            failed = report.failed,
            "Batch completed"
        );
        Ok(report)
    }

    async fn execute_step(
        &mut self,
        step: JourneyStep,
        identity: &Identity,
        feedback: &str,
    ) -> (Vec<ActionRecord>, Result<(), JourneyError>) {
        let mut records = Vec::new();
        for action in step.actions(identity, feedback, &self.timings) {
            debug!(step = %step, action = %action.describe(), "Executing action");
            let action_clock = tokio::time::Instant::now();
            let result = self.execute_action(&action).await;
            let elapsed = action_clock.elapsed().as_millis() as u64;
            match result {
                Ok(()) => records.push(ActionRecord::ok(action, elapsed)),
                Err(e) => {
                    records.push(ActionRecord::fail(action, e.to_string(), elapsed));
                    return (records, Err(e));
                }
            }
        }
        (records, Ok(()))
    }

    async fn execute_action(&mut self, action: &UiAction) -> Result<(), JourneyError> {
        match action {
            UiAction::Navigate { page } => self.driver.navigate(*page).await,
            UiAction::Fill { selector, text } => self.driver.fill(selector, text).await,
            UiAction::Click { selector, .. } => self.driver.click(selector).await,
            UiAction::WaitForPage { page, timeout_ms } => {
                self.wait_for_page(*page, Duration::from_millis(*timeout_ms)).await
            }
            UiAction::Settle { duration_ms } => {
                settle(Duration::from_millis(*duration_ms)).await;
                Ok(())
            }
        }
    }

    async fn wait_for_page(&mut self, page: Page, timeout: Duration) -> Result<(), JourneyError> {
        let poll = Duration::from_millis(self.timings.poll_interval_ms.max(1));
        wait_until(&mut self.driver, page.path(), timeout, poll, move |driver| {
            Box::pin(async move {
                let path = driver.current_path().await?;
                Ok::<_, JourneyError>(Page::from_path(&path) == Some(page))
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::backend::InMemoryBackend;
    use crate::driver::HeadlessApp;

    fn fast_config() -> JourneyConfig {
        JourneyConfig {
            navigation_timeout_ms: 100,
            settle_delay_ms: 1,
            poll_interval_ms: 5,
            ..JourneyConfig::default()
        }
    }

    fn orchestrator(backend: Arc<InMemoryBackend>) -> JourneyOrchestrator<HeadlessApp> {
        let app = HeadlessApp::new(backend, "http://localhost:3000");
        JourneyOrchestrator::new(app, &fast_config())
    }

    #[tokio::test]
    async fn test_single_journey_succeeds() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut orch = orchestrator(backend.clone());

        let run = orch.run_journey(Polarity::Negative, 0).await.unwrap();
        assert!(run.succeeded(), "failure: {:?}", run.failure);
        assert_eq!(run.final_state, JourneyState::Acknowledged);
        assert_eq!(run.steps.len(), 6);
        assert!(run.identity.starts_with("negative_user_"));

        let feedback = backend.feedback();
        assert_eq!(feedback.len(), 1);
        assert_eq!(feedback[0].username, run.identity);
        assert_eq!(feedback[0].text, "Experienced frequent crashes.");
    }

    #[tokio::test]
    async fn test_full_positive_batch() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut orch = orchestrator(backend.clone());

        let report = orch
            .run_batch(Polarity::Positive, 4, BatchPolicy::default())
            .await
            .unwrap();
        assert_eq!(report.total, 4);
        assert_eq!(report.passed, 4);
        assert_eq!(report.failed, 0);

        let texts: Vec<String> = backend.feedback().into_iter().map(|f| f.text).collect();
        let expected: Vec<String> = orch.catalogue().samples(Polarity::Positive).to_vec();
        assert_eq!(texts, expected);
    }

    #[tokio::test]
    async fn test_oversized_batch_fails_fast() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut orch = orchestrator(backend.clone());

        let err = orch
            .run_batch(Polarity::Positive, 5, BatchPolicy::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            JourneyError::CatalogueExhausted {
                requested: 5,
                available: 4,
                ..
            }
        ));
        assert_eq!(backend.account_count(), 0);
    }

    #[tokio::test]
    async fn test_journey_index_out_of_range() {
        let backend = Arc::new(InMemoryBackend::new());
        let mut orch = orchestrator(backend);
        assert!(orch.run_journey(Polarity::Mixed, 3).await.is_err());
    }

    #[tokio::test]
    async fn test_auth_timeout_fails_journey_then_next_starts_clean() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.fail_next_logins(1);
        let mut orch = orchestrator(backend.clone());

        let report = orch
            .run_batch(Polarity::Negative, 2, BatchPolicy::ContinueOnFailure)
            .await
            .unwrap();
        assert_eq!(report.passed, 1);
        assert_eq!(report.failed, 1);

        let first = &report.runs[0];
        assert_eq!(first.final_state, JourneyState::Failed);
        let failure = report.failures[0].clone();
        assert_eq!(failure.step, JourneyStep::ConfirmAuthentication);
        assert_eq!(failure.identity, first.identity);
        assert!(failure.error.contains("/home"));

        let second = &report.runs[1];
        assert_eq!(second.final_state, JourneyState::Acknowledged);
        assert_ne!(second.identity, first.identity);

        // The second journey registered its own identity from scratch.
        assert_eq!(backend.account_count(), 2);
        assert_eq!(backend.feedback().len(), 1);
    }

    #[tokio::test]
    async fn test_abort_policy_stops_batch() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.fail_next_registrations(1);
        let mut orch = orchestrator(backend.clone());

        let report = orch
            .run_batch(Polarity::Positive, 3, BatchPolicy::AbortOnFailure)
            .await
            .unwrap();
        assert!(report.aborted);
        assert_eq!(report.runs.len(), 1);
        assert_eq!(report.failures[0].step, JourneyStep::ConfirmRegistration);
    }

    #[tokio::test]
    async fn test_rejected_submission_fails_acknowledgment() {
        let backend = Arc::new(InMemoryBackend::new());
        backend.fail_next_submissions(1);
        let mut orch = orchestrator(backend);

        let run = orch.run_journey(Polarity::Positive, 0).await.unwrap();
        assert_eq!(run.final_state, JourneyState::Failed);
        let failure = run.failure.unwrap();
        assert_eq!(failure.step, JourneyStep::Acknowledge);
        let last = run.steps.last().unwrap();
        assert!(!last.success);
        assert_eq!(last.to, JourneyState::Failed);
    }

    #[tokio::test]
    async fn test_waits_through_slow_redirects() {
        let backend = Arc::new(InMemoryBackend::new());
        let app = HeadlessApp::new(backend, "http://localhost:3000")
            .with_navigation_delay(Duration::from_millis(20));
        let mut orch = JourneyOrchestrator::new(app, &fast_config());

        let run = orch.run_journey(Polarity::Mixed, 1).await.unwrap();
        assert!(run.succeeded(), "failure: {:?}", run.failure);
    }

    #[tokio::test]
    async fn test_redirect_slower_than_budget_times_out() {
        let backend = Arc::new(InMemoryBackend::new());
        let app = HeadlessApp::new(backend, "http://localhost:3000")
            .with_navigation_delay(Duration::from_millis(500));
        let mut orch = JourneyOrchestrator::new(app, &fast_config());

        let run = orch.run_journey(Polarity::Mixed, 0).await.unwrap();
        let failure = run.failure.unwrap();
        assert_eq!(failure.step, JourneyStep::ConfirmRegistration);
        assert!(failure.error.contains("Timed out"));
    }
}
