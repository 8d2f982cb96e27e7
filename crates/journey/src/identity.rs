use std::num::NonZeroU32;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Intended polarity of the feedback a journey submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Positive,
    Negative,
    Mixed,
}

impl Polarity {
    /// Username prefix announcing the polarity.
    pub fn prefix(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive_user",
            Polarity::Negative => "negative_user",
            Polarity::Mixed => "mixed_user",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
            Polarity::Mixed => "mixed",
        }
    }
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Polarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positive" => Ok(Polarity::Positive),
            "negative" => Ok(Polarity::Negative),
            "mixed" => Ok(Polarity::Mixed),
            other => Err(format!("unknown polarity '{other}'")),
        }
    }
}

/// A single-use user identity, generated fresh for every journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub polarity: Polarity,
    pub username: String,
    pub password: String,
}

impl Identity {
    /// `{prefix}_{n}` with `n` drawn uniformly from `[0, suffix_upper_bound)`.
    pub fn generate(polarity: Polarity, password: &str, suffix_upper_bound: NonZeroU32) -> Self {
        Self::generate_with(&mut rand::thread_rng(), polarity, password, suffix_upper_bound)
    }

    pub fn generate_with<R: Rng + ?Sized>(
        rng: &mut R,
        polarity: Polarity,
        password: &str,
        suffix_upper_bound: NonZeroU32,
    ) -> Self {
        let suffix = rng.gen_range(0..suffix_upper_bound.get());
        Self {
            polarity,
            username: format!("{}_{}", polarity.prefix(), suffix),
            password: password.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bound(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    #[test]
    fn test_username_shape() {
        let identity = Identity::generate(Polarity::Negative, "testpass123", bound(100_000));
        let suffix = identity
            .username
            .strip_prefix("negative_user_")
            .expect("prefix");
        let n: u32 = suffix.parse().unwrap();
        assert!(n < 100_000);
        assert_eq!(identity.password, "testpass123");
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let generate = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            Identity::generate_with(&mut rng, Polarity::Positive, "pw", bound(1000))
        };
        let (a, b) = (generate(7), generate(7));
        assert_eq!(a, b);
        assert!(a.username.starts_with("positive_user_"));
    }

    #[test]
    fn test_unit_bound_always_yields_zero() {
        let identity = Identity::generate(Polarity::Mixed, "pw", bound(1));
        assert_eq!(identity.username, "mixed_user_0");
    }

    #[test]
    fn test_polarity_parse() {
        assert_eq!("Positive".parse::<Polarity>().unwrap(), Polarity::Positive);
        assert_eq!("mixed".parse::<Polarity>().unwrap(), Polarity::Mixed);
        assert!("neutral".parse::<Polarity>().is_err());
    }
}
