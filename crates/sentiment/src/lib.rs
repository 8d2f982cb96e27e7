//! Sentiment signal extraction for the feedback analytics panel.
//!
//! Turns the raw sentiment descriptor produced by the upstream text-analysis
//! service into a single overall label, a display color, and a cleaned
//! human-readable breakdown.
//!
//! # Modules
//! - `classifier`: marker counting, label/color mapping, descriptor cleaning
//! - `gate`: the Admin-only visibility check evaluated before any parsing
//! - `view`: the analytics render model built behind the gate

pub mod classifier;
pub mod gate;
pub mod view;

pub use classifier::{
    classify, clean_descriptor, count_markers, DisplayColor, SentimentCounts, SentimentLabel,
    SentimentVerdict,
};
pub use gate::can_view;
pub use view::AnalyticsView;
