//! Sentiment classifier: reduces a raw upstream descriptor such as
//! `"(Positive I Positive I Negative)"` to one overall verdict.
//!
//! The descriptor format is an untyped external contract. All knowledge of it
//! lives in [`count_markers`] and [`clean_descriptor`].

use serde::{Deserialize, Serialize};

const POSITIVE_MARKER: &str = "Positive";
const NEGATIVE_MARKER: &str = "Negative";
const SEGMENT_SEPARATOR: &str = " I ";

/// Overall sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Mixed,
}

/// One of the three fixed display colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayColor {
    Green,
    Red,
    Orange,
}

/// Occurrence counts of the two recognized markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub positive: usize,
    pub negative: usize,
}

/// Derived interpretation of a descriptor. Recomputed on every render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    pub label: SentimentLabel,
    pub color: DisplayColor,
    pub counts: SentimentCounts,
    pub cleaned_text: String,
}

impl SentimentLabel {
    /// Strict majority wins; ties (including 0/0) are `Mixed`.
    pub fn from_counts(counts: SentimentCounts) -> Self {
        match counts.positive.cmp(&counts.negative) {
            std::cmp::Ordering::Greater => SentimentLabel::Positive,
            std::cmp::Ordering::Less => SentimentLabel::Negative,
            std::cmp::Ordering::Equal => SentimentLabel::Mixed,
        }
    }

    pub fn color(&self) -> DisplayColor {
        match self {
            SentimentLabel::Positive => DisplayColor::Green,
            SentimentLabel::Negative => DisplayColor::Red,
            SentimentLabel::Mixed => DisplayColor::Orange,
        }
    }

    /// Icon name shown next to the label.
    pub fn icon(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "sentiment_satisfied",
            SentimentLabel::Negative => "sentiment_dissatisfied",
            SentimentLabel::Mixed => "sentiment_neutral",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Negative => "Negative",
            SentimentLabel::Mixed => "Mixed",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DisplayColor {
    pub fn hex(&self) -> &'static str {
        match self {
            DisplayColor::Green => "#4caf50",
            DisplayColor::Red => "#f44336",
            DisplayColor::Orange => "#ff9800",
        }
    }
}

/// Count case-sensitive, non-overlapping occurrences of the two markers.
pub fn count_markers(descriptor: &str) -> SentimentCounts {
    SentimentCounts {
        positive: descriptor.matches(POSITIVE_MARKER).count(),
        negative: descriptor.matches(NEGATIVE_MARKER).count(),
    }
}

/// Best-effort cosmetic cleanup of a descriptor for display.
///
/// Strips parentheses, turns pipes into ` / `, splits on ` I `, drops blank
/// segments and rejoins the trimmed rest with `, `. Never fails; empty input
/// gives an empty string.
pub fn clean_descriptor(descriptor: &str) -> String {
    descriptor
        .replace(['(', ')'], "")
        .replace('|', " / ")
        .split(SEGMENT_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Classify a descriptor. A missing descriptor is treated as empty.
pub fn classify(descriptor: Option<&str>) -> SentimentVerdict {
    let descriptor = descriptor.unwrap_or_default();
    let counts = count_markers(descriptor);
    let label = SentimentLabel::from_counts(counts);

    SentimentVerdict {
        label,
        color: label.color(),
        counts,
        cleaned_text: clean_descriptor(descriptor),
    }
}
