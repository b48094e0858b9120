//! Sentiment classification
//!
//! The label is a fixed threshold policy over an external polarity score:
//! above [`POSITIVE_THRESHOLD`] is Positive, below [`NEGATIVE_THRESHOLD`] is
//! Negative, everything in between (inclusive) is Neutral.
//!
//! [`LexiconScorer`] is the default scorer used when no other model is
//! plugged in.

use crate::classifier::{clamp_polarity, SentimentScorer};
use socialpulse_core::SentimentLabel;
use std::collections::HashMap;
use std::sync::Arc;

/// Scores strictly above this are Positive
pub const POSITIVE_THRESHOLD: f32 = 0.2;

/// Scores strictly below this are Negative
pub const NEGATIVE_THRESHOLD: f32 = -0.2;

/// Map a polarity score to its sentiment label
pub fn threshold(score: f32) -> SentimentLabel {
    if score > POSITIVE_THRESHOLD {
        SentimentLabel::Positive
    } else if score < NEGATIVE_THRESHOLD {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    }
}

/// Thresholds the output of a pluggable polarity scorer
#[derive(Clone)]
pub struct SentimentClassifier {
    scorer: Arc<dyn SentimentScorer>,
}

impl SentimentClassifier {
    pub fn new(scorer: Arc<dyn SentimentScorer>) -> Self {
        Self { scorer }
    }

    /// Classifier backed by the built-in lexicon
    pub fn lexicon() -> Self {
        Self::new(Arc::new(LexiconScorer::new()))
    }

    /// Polarity of `text`, clamped to `[-1, 1]`. Empty text scores 0 without
    /// consulting the scorer; whitespace is left to the scorer.
    pub fn score(&self, text: &str) -> f32 {
        if text.is_empty() {
            return 0.0;
        }
        clamp_polarity(self.scorer.score(text))
    }

    /// Sentiment label of `text`
    pub fn classify(&self, text: &str) -> SentimentLabel {
        threshold(self.score(text))
    }

    /// Name of the underlying scorer
    pub fn scorer_name(&self) -> &str {
        self.scorer.name()
    }
}

impl std::fmt::Debug for SentimentClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentClassifier")
            .field("scorer", &self.scorer.name())
            .finish()
    }
}

const POLARITY_LEXICON: &[(&str, f32)] = &[
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("blessed", 0.6),
    ("enjoy", 0.4),
    ("excellent", 1.0),
    ("excited", 0.4),
    ("fantastic", 0.4),
    ("fun", 0.3),
    ("glad", 0.5),
    ("good", 0.7),
    ("grateful", 0.5),
    ("great", 0.8),
    ("happy", 0.8),
    ("love", 0.5),
    ("loved", 0.7),
    ("amazing", 0.6),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("proud", 0.8),
    ("thank", 0.4),
    ("thanks", 0.4),
    ("win", 0.8),
    ("wonderful", 1.0),
    ("angry", -0.5),
    ("annoying", -0.8),
    ("anxious", -0.3),
    ("awful", -1.0),
    ("bad", -0.7),
    ("boring", -1.0),
    ("broken", -0.4),
    ("cry", -0.4),
    ("depressed", -0.6),
    ("disappointed", -0.75),
    ("exhausted", -0.4),
    ("fail", -0.5),
    ("failed", -0.5),
    ("hate", -0.8),
    ("hopeless", -0.5),
    ("horrible", -1.0),
    ("hurt", -0.5),
    ("lonely", -0.5),
    ("lost", -0.3),
    ("miserable", -1.0),
    ("pain", -0.5),
    ("poor", -0.4),
    ("sad", -0.5),
    ("sick", -0.7),
    ("stressed", -0.4),
    ("stupid", -0.8),
    ("terrible", -1.0),
    ("tired", -0.4),
    ("unhappy", -0.6),
    ("worried", -0.3),
    ("worse", -0.4),
    ("worst", -1.0),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nothing", "nobody", "cannot", "cant", "dont", "didnt", "doesnt",
    "isnt", "wasnt", "wont", "aint",
];

const INTENSIFIERS: &[(&str, f32)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.3),
    ("super", 1.3),
    ("totally", 1.2),
    ("extremely", 1.5),
    ("incredibly", 1.5),
];

/// Tokens a negation stays active for before it lapses
const NEGATION_WINDOW: usize = 3;

/// Word-polarity lexicon scorer.
///
/// The score is the mean polarity of lexicon words found in the text. An
/// intensifier scales the next polar word; a negation within
/// [`NEGATION_WINDOW`] tokens flips it and halves its magnitude.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    polarity: HashMap<&'static str, f32>,
    intensifiers: HashMap<&'static str, f32>,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            polarity: POLARITY_LEXICON.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    /// Add or override a lexicon entry
    pub fn with_word(mut self, word: &'static str, polarity: f32) -> Self {
        self.polarity.insert(word, clamp_polarity(polarity));
        self
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f32 {
        let mut values = Vec::new();
        let mut intensity = 1.0_f32;
        let mut negation_left = 0usize;

        for raw in text.split_whitespace() {
            let token: String = raw
                .chars()
                .filter(|c| c.is_alphanumeric())
                .flat_map(char::to_lowercase)
                .collect();
            if token.is_empty() {
                continue;
            }

            if NEGATIONS.contains(&token.as_str()) {
                negation_left = NEGATION_WINDOW;
                continue;
            }

            if let Some(factor) = self.intensifiers.get(token.as_str()) {
                intensity *= factor;
                continue;
            }

            if let Some(&polarity) = self.polarity.get(token.as_str()) {
                let mut value = polarity * intensity;
                if negation_left > 0 {
                    value *= -0.5;
                }
                values.push(clamp_polarity(value));
                intensity = 1.0;
                negation_left = 0;
            } else {
                intensity = 1.0;
                negation_left = negation_left.saturating_sub(1);
            }
        }

        if values.is_empty() {
            return 0.0;
        }

        clamp_polarity(values.iter().sum::<f32>() / values.len() as f32)
    }

    fn name(&self) -> &str {
        "polarity-lexicon"
    }
}
