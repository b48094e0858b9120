//! Keyword-based mental-health risk detection
//!
//! Three fixed keyword sets are checked in strict priority order: depression,
//! anxiety, burnout. The first set with any match wins; no match is
//! [`RiskLabel::NoConcern`].
//!
//! Matching is case-insensitive substring matching, not whole-word: "down"
//! matches inside "downtown".

use aho_corasick::AhoCorasick;
use socialpulse_core::{Error, Result, RiskLabel};

pub const DEPRESSION_KEYWORDS: &[&str] =
    &["depressed", "hopeless", "sad", "down", "unhappy", "suicidal"];

pub const ANXIETY_KEYWORDS: &[&str] = &["anxious", "nervous", "stressed", "worried", "panic"];

pub const BURNOUT_KEYWORDS: &[&str] = &["exhausted", "overwhelmed", "tired", "burnout"];

/// A keyword hit that decided a risk label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskMatch {
    pub label: RiskLabel,
    pub keyword: &'static str,
    pub span: (usize, usize),
}

struct KeywordSet {
    label: RiskLabel,
    keywords: &'static [&'static str],
    matcher: AhoCorasick,
}

/// Priority-ordered keyword matcher using the Aho-Corasick algorithm
pub struct RiskDetector {
    sets: Vec<KeywordSet>,
}

impl RiskDetector {
    /// Create a detector with the standard keyword sets
    pub fn new() -> Result<Self> {
        let ordered = [
            (RiskLabel::DepressionRisk, DEPRESSION_KEYWORDS),
            (RiskLabel::AnxietyRisk, ANXIETY_KEYWORDS),
            (RiskLabel::BurnoutRisk, BURNOUT_KEYWORDS),
        ];

        let sets = ordered
            .into_iter()
            .map(|(label, keywords)| {
                let matcher = AhoCorasick::builder()
                    .ascii_case_insensitive(true)
                    .build(keywords)
                    .map_err(|e| {
                        Error::internal(format!("Failed to build {label} keyword matcher: {e}"))
                    })?;
                Ok(KeywordSet {
                    label,
                    keywords,
                    matcher,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { sets })
    }

    /// Risk label of `text`
    pub fn detect(&self, text: &str) -> RiskLabel {
        self.detect_match(text)
            .map(|m| m.label)
            .unwrap_or(RiskLabel::NoConcern)
    }

    /// The keyword hit that decides the label, if any
    pub fn detect_match(&self, text: &str) -> Option<RiskMatch> {
        self.sets.iter().find_map(|set| {
            set.matcher.find(text).map(|m| RiskMatch {
                label: set.label,
                keyword: set.keywords[m.pattern().as_usize()],
                span: (m.start(), m.end()),
            })
        })
    }
}

impl Default for RiskDetector {
    fn default() -> Self {
        Self::new().expect("Failed to create risk detector")
    }
}

impl std::fmt::Debug for RiskDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskDetector")
            .field("sets", &self.sets.iter().map(|s| s.label).collect::<Vec<_>>())
            .finish()
    }
}
