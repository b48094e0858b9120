//! Scoring primitive consumed by the sentiment stage

/// Polarity scorer treated as a black box by the pipeline.
///
/// Implementations return a value in `[-1.0, 1.0]`: positive for favorable
/// tone, negative for unfavorable, 0 for neutral. Scoring must be pure and
/// deterministic for a given text.
pub trait SentimentScorer: Send + Sync {
    /// Score the polarity of `text`
    fn score(&self, text: &str) -> f32;

    /// Get the scorer name
    fn name(&self) -> &str;
}

/// Scorer that returns the same polarity for every text
#[derive(Debug, Clone, Copy)]
pub struct FixedScorer(pub f32);

impl SentimentScorer for FixedScorer {
    fn score(&self, _text: &str) -> f32 {
        self.0
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Bring a raw scorer output into `[-1.0, 1.0]`. NaN is treated as neutral.
pub fn clamp_polarity(score: f32) -> f32 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_polarity() {
        assert_eq!(clamp_polarity(0.3), 0.3);
        assert_eq!(clamp_polarity(4.0), 1.0);
        assert_eq!(clamp_polarity(-7.5), -1.0);
        assert_eq!(clamp_polarity(f32::NAN), 0.0);
    }

    #[test]
    fn test_fixed_scorer() {
        let scorer = FixedScorer(-0.5);
        assert_eq!(scorer.score("anything"), -0.5);
        assert_eq!(scorer.name(), "fixed");
    }
}
