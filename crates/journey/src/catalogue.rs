use crate::error::JourneyError;
use crate::identity::Polarity;

const POSITIVE_SAMPLES: [&str; 4] = [
    "Great job on the recent updates!",
    "Customer service was exceptional.",
    "Love how easy it is to use the platform.",
    "Fantastic improvements in the latest version!",
];

const NEGATIVE_SAMPLES: [&str; 3] = [
    "Experienced frequent crashes.",
    "The pricing is too high for what's offered.",
    "Performance issues need to be addressed.",
];

const MIXED_SAMPLES: [&str; 3] = [
    "Great product with a few minor bugs.",
    "Excellent support, but the platform is a bit expensive.",
    "Nice interface but could use more features.",
];

/// Fixed, ordered sample feedback texts per polarity. Lookups past the end
/// fail instead of wrapping, so a batch is capped at the catalogue length.
#[derive(Debug, Clone)]
pub struct FeedbackCatalogue {
    positive: Vec<String>,
    negative: Vec<String>,
    mixed: Vec<String>,
}

impl FeedbackCatalogue {
    pub fn new(positive: Vec<String>, negative: Vec<String>, mixed: Vec<String>) -> Self {
        Self {
            positive,
            negative,
            mixed,
        }
    }

    pub fn samples(&self, polarity: Polarity) -> &[String] {
        match polarity {
            Polarity::Positive => &self.positive,
            Polarity::Negative => &self.negative,
            Polarity::Mixed => &self.mixed,
        }
    }

    pub fn len(&self, polarity: Polarity) -> usize {
        self.samples(polarity).len()
    }

    /// Sample text at `index`.
    pub fn text(&self, polarity: Polarity, index: usize) -> Result<&str, JourneyError> {
        let samples = self.samples(polarity);
        samples
            .get(index)
            .map(String::as_str)
            .ok_or(JourneyError::CatalogueExhausted {
                polarity,
                requested: index + 1,
                available: samples.len(),
            })
    }

    /// Fails when `count` journeys would run past the end of the catalogue.
    pub fn ensure_capacity(&self, polarity: Polarity, count: usize) -> Result<(), JourneyError> {
        let available = self.len(polarity);
        if count > available {
            return Err(JourneyError::CatalogueExhausted {
                polarity,
                requested: count,
                available,
            });
        }
        Ok(())
    }
}

impl Default for FeedbackCatalogue {
    fn default() -> Self {
        Self::new(
            owned(&POSITIVE_SAMPLES),
            owned(&NEGATIVE_SAMPLES),
            owned(&MIXED_SAMPLES),
        )
    }
}

fn owned(samples: &[&str]) -> Vec<String> {
    samples.iter().map(|s| s.to_string()).collect()
}
