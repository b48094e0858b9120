//! SocialPulse Classifiers
//!
//! Deterministic, rule-based classification of short social-media posts
//! along three dimensions:
//! - Sentiment: a fixed threshold over a pluggable polarity scorer
//! - Mental-health risk: priority-ordered keyword detection
//! - Behavior: a pure lookup over sentiment and risk
//!
//! The only I/O is the optional translation call for non-English records,
//! which runs under bounded concurrency with a timeout and degrades to
//! untranslated scoring on failure.

pub mod behavior;
pub mod classifier;
pub mod config;
pub mod filter;
pub mod normalizer;
pub mod pipeline;
pub mod risk;
pub mod sentiment;
pub mod translator;

pub use behavior::predict_behavior;
pub use classifier::{FixedScorer, SentimentScorer};
pub use config::{PipelineConfig, TranslationConfig};
pub use filter::{concatenate_text, count_by_label, filter, ResultFilter};
pub use normalizer::TextNormalizer;
pub use pipeline::{BatchReport, ClassificationPipeline, PipelineBuilder};
pub use risk::{RiskDetector, RiskMatch};
pub use sentiment::{LexiconScorer, SentimentClassifier};
pub use translator::{build_translator, CachedTranslator, HttpTranslator, Translator};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::filter::{concatenate_text, count_by_label, ResultFilter};
    pub use crate::pipeline::{BatchReport, ClassificationPipeline};
    pub use crate::classifier::SentimentScorer;
    pub use crate::translator::Translator;
    pub use crate::config::PipelineConfig;
}
