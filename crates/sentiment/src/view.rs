//! Analytics view model: what the admin analytics panel shows, derived from
//! a backend payload once the visibility gate has passed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use lens_core::{Analytics, UserRole};

use crate::classifier::{classify, SentimentVerdict};
use crate::gate::can_view;

pub const NO_TOPICS: &str = "No key topics available";
pub const NO_TRENDS: &str = "No emerging trends available";
pub const NO_SENTIMENT: &str = "No sentiment data available";

/// Render model for the analytics panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsView {
    pub topics: Vec<String>,
    pub trends: Vec<String>,
    /// `None` when the payload carried no sentiment descriptor.
    pub sentiment: Option<SentimentVerdict>,
}

impl AnalyticsView {
    /// Build the view, or `None` when the caller may not see analytics.
    pub fn build(role: Option<UserRole>, payload: Option<&Analytics>) -> Option<Self> {
        if !can_view(role, payload) {
            return None;
        }
        let analytics = payload?;

        let sentiment = analytics.sentiment.as_deref().filter(|s| !s.is_empty()).map(|raw| {
            debug!(descriptor = %raw, "Classifying sentiment descriptor");
            classify(Some(raw))
        });

        Some(Self {
            topics: analytics.topics.clone(),
            trends: analytics.trends.clone(),
            sentiment,
        })
    }

    /// Plain-text rendering of the panel.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Analytics Overview ===\n\n");

        out.push_str("Key Topics\n");
        push_chips(&mut out, &self.topics, NO_TOPICS);

        out.push_str("\nOverall Sentiment\n");
        match &self.sentiment {
            Some(verdict) => {
                out.push_str(&format!(
                    "  {} [{}] ({})\n",
                    verdict.label,
                    verdict.label.icon(),
                    verdict.color.hex()
                ));
                if !verdict.cleaned_text.is_empty() {
                    out.push_str(&format!("  {}\n", verdict.cleaned_text));
                }
            }
            None => out.push_str(&format!("  {NO_SENTIMENT}\n")),
        }

        out.push_str("\nEmerging Trends\n");
        push_chips(&mut out, &self.trends, NO_TRENDS);

        out
    }
}

fn push_chips(out: &mut String, items: &[String], placeholder: &str) {
    if items.is_empty() {
        out.push_str(&format!("  {placeholder}\n"));
    } else {
        out.push_str(&format!("  {}\n", items.join(" | ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{DisplayColor, SentimentLabel};

    fn payload() -> Analytics {
        Analytics {
            topics: vec!["pricing".into(), "support".into()],
            sentiment: Some("(Positive I Positive I Negative)".into()),
            trends: vec!["mobile usage".into()],
        }
    }

    #[test]
    fn test_admin_sees_full_view() {
        let analytics = payload();
        let view = AnalyticsView::build(Some(UserRole::Admin), Some(&analytics)).unwrap();
        assert_eq!(view.topics.len(), 2);
        assert_eq!(view.trends, vec!["mobile usage".to_string()]);

        let verdict = view.sentiment.unwrap();
        assert_eq!(verdict.label, SentimentLabel::Positive);
        assert_eq!(verdict.color, DisplayColor::Green);
    }

    #[test]
    fn test_non_admin_sees_nothing() {
        let analytics = payload();
        assert!(AnalyticsView::build(Some(UserRole::User), Some(&analytics)).is_none());
        assert!(AnalyticsView::build(None, Some(&analytics)).is_none());
    }

    #[test]
    fn test_missing_payload_sees_nothing() {
        assert!(AnalyticsView::build(Some(UserRole::Admin), None).is_none());
    }

    #[test]
    fn test_placeholders() {
        let analytics = Analytics::default();
        let view = AnalyticsView::build(Some(UserRole::Admin), Some(&analytics)).unwrap();
        assert!(view.sentiment.is_none());

        let text = view.render_text();
        assert!(text.contains("Analytics Overview"));
        assert!(text.contains(NO_TOPICS));
        assert!(text.contains(NO_TRENDS));
        assert!(text.contains(NO_SENTIMENT));
    }

    #[test]
    fn test_render_text_with_verdict() {
        let analytics = Analytics {
            sentiment: Some("(Negative I Negative)".into()),
            ..payload()
        };
        let view = AnalyticsView::build(Some(UserRole::Admin), Some(&analytics)).unwrap();
        let text = view.render_text();
        assert!(text.contains("Negative [sentiment_dissatisfied] (#f44336)"));
        assert!(text.contains("Negative, Negative"));
        assert!(text.contains("pricing | support"));
    }
}
