//! Mock scoring and translation components for testing
//!
//! Provides configurable implementations of the SentimentScorer and
//! Translator traits for exercising the pipeline's fallback, concurrency and
//! cancellation paths.

#![allow(dead_code)]

use async_trait::async_trait;
use socialpulse_classifiers::{SentimentScorer, Translator};
use socialpulse_core::TranslationError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Scorer driven by marker words in the text
pub struct MarkerScorer {
    default: f32,
}

impl MarkerScorer {
    pub fn new(default: f32) -> Self {
        Self { default }
    }
}

impl SentimentScorer for MarkerScorer {
    fn score(&self, text: &str) -> f32 {
        if text.contains("upbeat") {
            0.8
        } else if text.contains("gloomy") {
            -0.8
        } else {
            self.default
        }
    }

    fn name(&self) -> &str {
        "marker"
    }
}

/// What a [`MockTranslator`] does on each call
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Append the target language marker
    Succeed,
    /// Replace the text entirely
    Replace(String),
    /// Fail with the given error
    Fail(TranslationError),
    /// Fail the first N calls, then succeed
    FailFirst(usize, TranslationError),
}

/// A configurable mock translator
pub struct MockTranslator {
    behavior: MockBehavior,
    latency: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            latency: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn succeeding() -> Self {
        Self::new(MockBehavior::Succeed)
    }

    pub fn failing(error: TranslationError) -> Self {
        Self::new(MockBehavior::Fail(error))
    }

    /// Set simulated latency for each call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of times translate was called
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of calls observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: &str,
        target: &str,
    ) -> Result<String, TranslationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Succeed => Ok(format!("{text} ({target})")),
            MockBehavior::Replace(replacement) => Ok(replacement.clone()),
            MockBehavior::Fail(error) => Err(error.clone()),
            MockBehavior::FailFirst(n, error) if call < *n => Err(error.clone()),
            MockBehavior::FailFirst(..) => Ok(format!("{text} ({target})")),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
