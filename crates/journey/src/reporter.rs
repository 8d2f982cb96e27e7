//! Batch reporter: summarises a sequence of journey runs into pass/fail
//! counts and a plain-text table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::Polarity;
use crate::orchestrator::{JourneyFailure, JourneyRun};
use crate::state_machine::JourneyState;

/// One line of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneySummary {
    pub run_id: uuid::Uuid,
    pub index: usize,
    pub identity: String,
    pub passed: bool,
    pub final_state: JourneyState,
    pub steps_completed: usize,
    pub duration_ms: u64,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub title: String,
    pub polarity: Polarity,
    pub generated_at: DateTime<Utc>,
    /// Journeys asked for, which may exceed `total` when the batch aborted.
    pub requested: usize,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub pass_rate: f64,
    pub total_duration_ms: u64,
    pub aborted: bool,
    pub summaries: Vec<JourneySummary>,
    pub failures: Vec<JourneyFailure>,
    pub runs: Vec<JourneyRun>,
}

impl BatchReport {
    pub fn generate(
        polarity: Polarity,
        requested: usize,
        runs: &[JourneyRun],
        aborted: bool,
    ) -> Self {
        let summaries: Vec<JourneySummary> = runs.iter().map(summarize).collect();
        let total = summaries.len();
        let passed = summaries.iter().filter(|s| s.passed).count();
        let pass_rate = if total == 0 {
            100.0
        } else {
            passed as f64 / total as f64 * 100.0
        };

        Self {
            title: format!("{polarity} feedback journeys"),
            polarity,
            generated_at: Utc::now(),
            requested,
            total,
            passed,
            failed: total - passed,
            pass_rate,
            total_duration_ms: summaries.iter().map(|s| s.duration_ms).sum(),
            aborted,
            summaries,
            failures: runs.iter().filter_map(|r| r.failure.clone()).collect(),
            runs: runs.to_vec(),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && !self.aborted
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("=== {} ===\n", self.title));
        out.push_str(&format!(
            "Generated: {}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        out.push_str(&format!(
            "Total: {} | Passed: {} | Failed: {} | Pass Rate: {:.1}%\n",
            self.total, self.passed, self.failed, self.pass_rate,
        ));
        out.push_str(&format!("Total Duration: {}ms\n", self.total_duration_ms));
        if self.aborted {
            out.push_str(&format!(
                "Aborted after {} of {} journeys\n",
                self.total, self.requested
            ));
        }
        out.push('\n');

        out.push_str(&format!(
            "  {:<4} {:<24} {:<8} {:<22} {:<10}\n",
            "#", "Identity", "Verdict", "Final State", "Duration"
        ));
        out.push_str(&format!("  {}\n", "-".repeat(70)));
        for s in &self.summaries {
            out.push_str(&format!(
                "  {:<4} {:<24} {:<8} {:<22} {}ms\n",
                s.index,
                s.identity,
                if s.passed { "PASS" } else { "FAIL" },
                format!("{:?}", s.final_state),
                s.duration_ms,
            ));
        }

        if !self.failures.is_empty() {
            out.push_str("\nFailures:\n");
            for f in &self.failures {
                out.push_str(&format!("  [{}] {} - {}\n", f.identity, f.step, f.error));
            }
        }

        out
    }
}

fn summarize(run: &JourneyRun) -> JourneySummary {
    JourneySummary {
        run_id: run.id,
        index: run.index,
        identity: run.identity.clone(),
        passed: run.succeeded(),
        final_state: run.final_state,
        steps_completed: run.steps.iter().filter(|s| s.success).count(),
        duration_ms: run.duration_ms,
        error: run.failure.as_ref().map(|f| f.error.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::JourneyStep;

    fn make_run(index: usize, failure: Option<JourneyStep>) -> JourneyRun {
        let identity = format!("positive_user_{index}");
        JourneyRun {
            id: uuid::Uuid::new_v4(),
            polarity: Polarity::Positive,
            index,
            identity: identity.clone(),
            final_state: if failure.is_some() {
                JourneyState::Failed
            } else {
                JourneyState::Acknowledged
            },
            steps: vec![],
            failure: failure.map(|step| JourneyFailure {
                step,
                identity,
                error: "Timed out after 100ms waiting for /home".into(),
            }),
            started_at: Utc::now(),
            completed_at: Utc::now(),
            duration_ms: 100,
        }
    }

    #[test]
    fn test_report_counts() {
        let runs = vec![
            make_run(0, None),
            make_run(1, Some(JourneyStep::ConfirmAuthentication)),
            make_run(2, None),
        ];
        let report = BatchReport::generate(Polarity::Positive, 3, &runs, false);
        assert_eq!(report.total, 3);
        assert_eq!(report.passed, 2);
        assert_eq!(report.failed, 1);
        assert_eq!(report.total_duration_ms, 300);
        assert!((report.pass_rate - 66.666).abs() < 1.0);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].identity, "positive_user_1");
        assert!(!report.all_passed());
    }

    #[test]
    fn test_empty_report() {
        let report = BatchReport::generate(Polarity::Mixed, 0, &[], false);
        assert_eq!(report.total, 0);
        assert_eq!(report.pass_rate, 100.0);
        assert!(report.all_passed());
    }

    #[test]
    fn test_text_render() {
        let runs = vec![
            make_run(0, None),
            make_run(1, Some(JourneyStep::ConfirmAuthentication)),
        ];
        let report = BatchReport::generate(Polarity::Positive, 4, &runs, true);
        let text = report.render_text();
        assert!(text.contains("positive feedback journeys"));
        assert!(text.contains("PASS"));
        assert!(text.contains("FAIL"));
        assert!(text.contains("Aborted after 2 of 4 journeys"));
        assert!(text.contains("[positive_user_1] home_page_reached"));
    }
}
