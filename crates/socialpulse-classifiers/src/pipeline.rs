//! Classification pipeline
//!
//! Each record flows through the same fixed sequence:
//! - normalize the raw text
//! - translate it when the declared language differs from the target
//! - score and threshold sentiment on the (possibly translated) text
//! - detect risk on the normalized text
//! - derive behavior from sentiment and risk
//!
//! Records share no mutable state, so a batch runs concurrently and is
//! re-ordered by input position afterwards. Only the translation call
//! suspends; it is bounded by a semaphore and a per-call timeout, and any
//! failure degrades the record to untranslated scoring instead of failing the
//! batch.

use crate::behavior::predict_behavior;
use crate::classifier::SentimentScorer;
use crate::config::PipelineConfig;
use crate::normalizer::TextNormalizer;
use crate::risk::RiskDetector;
use crate::sentiment::{threshold, SentimentClassifier};
use crate::translator::{build_translator, Translator};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use socialpulse_core::{
    ClassificationMetadata, ClassifiedRecord, DataSource, Error, Platform, RawRecord, Result,
    SkipReason, TranslationStatus,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs the per-record classification sequence
pub struct ClassificationPipeline {
    normalizer: TextNormalizer,
    sentiment: SentimentClassifier,
    risk: RiskDetector,
    translator: Option<Arc<dyn Translator>>,
    translation_permits: Arc<Semaphore>,
    config: PipelineConfig,
}

/// Outcome of classifying a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// Classified records, in input order
    pub records: Vec<ClassifiedRecord>,

    /// Ids of records scored from untranslated text
    pub degraded: Vec<i64>,

    /// Records for which a translation call was made
    pub translation_attempts: usize,

    /// Translation calls that failed or timed out
    pub translation_failures: usize,

    /// The run was cancelled before every record finished
    pub cancelled: bool,

    /// Wall-clock time of the batch
    pub total_latency_us: u64,
}

impl BatchReport {
    fn new(records: Vec<ClassifiedRecord>, cancelled: bool, elapsed: Duration) -> Self {
        let degraded = records
            .iter()
            .filter(|r| r.is_degraded())
            .map(|r| r.id)
            .collect();
        let translation_attempts = records
            .iter()
            .filter(|r| r.metadata.translation.was_attempted())
            .count();
        let translation_failures = records
            .iter()
            .filter(|r| r.metadata.translation.was_attempted() && r.is_degraded())
            .count();

        Self {
            records,
            degraded,
            translation_attempts,
            translation_failures,
            cancelled,
            total_latency_us: elapsed.as_micros() as u64,
        }
    }

    /// True when translation was attempted and every attempt failed
    pub fn translation_outage(&self) -> bool {
        self.translation_attempts > 0 && self.translation_failures == self.translation_attempts
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<ClassifiedRecord> {
        self.records
    }
}

impl ClassificationPipeline {
    /// Create a pipeline with the lexicon scorer and the translator described
    /// by `config`
    pub fn new(config: PipelineConfig) -> Result<Self> {
        PipelineBuilder::new().config(config).build()
    }

    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Classify a single record. Never fails: absent text and translation
    /// failures both resolve to defined defaults.
    pub async fn classify(&self, record: &RawRecord) -> ClassifiedRecord {
        let start = Instant::now();

        let normalized = self.normalizer.normalize(record.text.as_deref());
        let (translated, translation) = self.translate_for_scoring(record, &normalized).await;

        let polarity = self
            .sentiment
            .score(translated.as_deref().unwrap_or(&normalized));
        let sentiment = threshold(polarity);
        let risk = self.risk.detect(&normalized);
        let behavior = predict_behavior(sentiment, risk);

        let latency_us = start.elapsed().as_micros() as u64;
        metrics::counter!("socialpulse_records_classified_total").increment(1);
        metrics::histogram!("socialpulse_record_latency_us").record(latency_us as f64);
        debug!(
            id = record.id,
            %sentiment,
            %risk,
            %behavior,
            polarity,
            "classified record"
        );

        ClassifiedRecord {
            id: record.id,
            original_text: record.text.clone(),
            sentiment,
            risk,
            behavior,
            metadata: ClassificationMetadata {
                translation,
                polarity,
                latency_us,
            },
        }
    }

    /// Classify every record, preserving input order and ids
    pub async fn classify_all(&self, records: &[RawRecord]) -> Result<BatchReport> {
        self.classify_all_with_cancel(records, &CancellationToken::new())
            .await
    }

    /// Classify records until done or until `cancel` fires.
    ///
    /// On cancellation no new records are scheduled, in-flight ones are
    /// abandoned, and the records finished so far are returned in input
    /// order with `cancelled` set.
    pub async fn classify_all_with_cancel(
        &self,
        records: &[RawRecord],
        cancel: &CancellationToken,
    ) -> Result<BatchReport> {
        let start = Instant::now();

        let mut pending = stream::iter(records.iter().enumerate())
            .map(|(index, record)| async move { (index, self.classify(record).await) })
            .buffer_unordered(self.config.max_parallel_records);

        let mut finished = Vec::with_capacity(records.len());
        let mut cancelled = false;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
                next = pending.next() => match next {
                    Some(item) => finished.push(item),
                    None => break,
                },
            }
        }

        finished.sort_unstable_by_key(|(index, _)| *index);
        let classified = finished.into_iter().map(|(_, record)| record).collect();
        let report = BatchReport::new(classified, cancelled, start.elapsed());

        info!(
            total = records.len(),
            classified = report.len(),
            degraded = report.degraded.len(),
            cancelled,
            "Batch classified in {}us",
            report.total_latency_us
        );

        if report.translation_outage() {
            warn!(
                attempts = report.translation_attempts,
                "Every translation call failed; results are untranslated"
            );
            if self.config.fail_on_translation_outage {
                return Err(Error::TranslationOutage {
                    attempts: report.translation_attempts,
                    failures: report.translation_failures,
                });
            }
        }

        Ok(report)
    }

    /// Load a platform's dataset from `source` and classify it.
    ///
    /// A dataset without a recognised text column fails here, before any
    /// record is classified.
    pub async fn classify_source(
        &self,
        source: &dyn DataSource,
        platform: Platform,
    ) -> Result<BatchReport> {
        let records = source.load(platform)?;
        self.classify_all(&records).await
    }

    /// Text to score and how it was obtained. `None` means score the
    /// normalized text as-is.
    async fn translate_for_scoring(
        &self,
        record: &RawRecord,
        normalized: &str,
    ) -> (Option<String>, TranslationStatus) {
        let target = self.config.target_language.as_str();

        let source = match record.language.as_deref() {
            Some(lang) if !lang.eq_ignore_ascii_case(target) => lang,
            _ => return (None, TranslationStatus::NotRequired),
        };
        if normalized.trim().is_empty() {
            return (None, TranslationStatus::NotRequired);
        }

        let Some(translator) = &self.translator else {
            return self.degrade(record, SkipReason::Disabled);
        };

        let Ok(_permit) = self.translation_permits.acquire().await else {
            return self.degrade(record, SkipReason::ServiceUnavailable);
        };

        let timeout = Duration::from_millis(self.config.translation.timeout_ms);
        match tokio::time::timeout(timeout, translator.translate(normalized, source, target)).await
        {
            Ok(Ok(text)) => (Some(text), TranslationStatus::Translated),
            Ok(Err(e)) => {
                warn!(id = record.id, source, "Translation failed: {e}");
                self.degrade(record, SkipReason::from(&e))
            }
            Err(_) => {
                warn!(id = record.id, source, "Translation timed out after {:?}", timeout);
                self.degrade(record, SkipReason::Timeout)
            }
        }
    }

    fn degrade(
        &self,
        record: &RawRecord,
        reason: SkipReason,
    ) -> (Option<String>, TranslationStatus) {
        metrics::counter!("socialpulse_translation_degraded_total", "reason" => reason.as_str())
            .increment(1);
        debug!(id = record.id, reason = reason.as_str(), "Scoring untranslated text");
        (None, TranslationStatus::Skipped { reason })
    }
}

/// Builder for constructing pipelines fluently
#[derive(Default)]
pub struct PipelineBuilder {
    config: PipelineConfig,
    scorer: Option<Arc<dyn SentimentScorer>>,
    translator: Option<Arc<dyn Translator>>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `scorer` instead of the built-in lexicon
    pub fn scorer(mut self, scorer: Arc<dyn SentimentScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Use `translator` instead of one built from the configuration
    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Result<ClassificationPipeline> {
        self.config.validate()?;

        let sentiment = match self.scorer {
            Some(scorer) => SentimentClassifier::new(scorer),
            None => SentimentClassifier::lexicon(),
        };

        let translator = match self.translator {
            Some(translator) => Some(translator),
            None => build_translator(&self.config.translation)?,
        };

        debug!(
            scorer = sentiment.scorer_name(),
            translator = translator.as_ref().map(|t| t.name()),
            "Built classification pipeline"
        );

        Ok(ClassificationPipeline {
            normalizer: TextNormalizer::new()?,
            sentiment,
            risk: RiskDetector::new()?,
            translator,
            translation_permits: Arc::new(Semaphore::new(self.config.translation.max_concurrency)),
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::FixedScorer;
    use async_trait::async_trait;
    use socialpulse_core::{
        BehaviorLabel, FileDataSource, RiskLabel, SchemaMapping, SentimentLabel, TranslationError,
    };
    use std::io::Write;

    struct DictionaryTranslator;

    #[async_trait]
    impl Translator for DictionaryTranslator {
        async fn translate(
            &self,
            text: &str,
            _source: &str,
            _target: &str,
        ) -> std::result::Result<String, TranslationError> {
            Ok(text.replace("feliz", "happy"))
        }

        fn name(&self) -> &str {
            "dictionary"
        }
    }

    struct DownTranslator;

    #[async_trait]
    impl Translator for DownTranslator {
        async fn translate(
            &self,
            _text: &str,
            _source: &str,
            _target: &str,
        ) -> std::result::Result<String, TranslationError> {
            Err(TranslationError::ServiceUnavailable("connection refused".into()))
        }

        fn name(&self) -> &str {
            "down"
        }
    }

    struct StalledTranslator;

    #[async_trait]
    impl Translator for StalledTranslator {
        async fn translate(
            &self,
            text: &str,
            _source: &str,
            _target: &str,
        ) -> std::result::Result<String, TranslationError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(text.to_string())
        }

        fn name(&self) -> &str {
            "stalled"
        }
    }

    fn pipeline_with_score(score: f32) -> ClassificationPipeline {
        ClassificationPipeline::builder()
            .scorer(Arc::new(FixedScorer(score)))
            .build()
            .unwrap()
    }

    fn record(id: i64, text: &str) -> RawRecord {
        RawRecord::new(id, text, Platform::Twitter)
    }

    #[tokio::test]
    async fn test_depression_regardless_of_score() {
        for score in [-0.9, 0.0, 0.9] {
            let pipeline = pipeline_with_score(score);
            let out = pipeline
                .classify(&record(1, "I feel so depressed and hopeless"))
                .await;
            assert_eq!(out.risk, RiskLabel::DepressionRisk);
            assert_eq!(out.behavior, BehaviorLabel::SupportSeeking);
        }
    }

    #[tokio::test]
    async fn test_absent_and_empty_text_defaults() {
        let pipeline = pipeline_with_score(0.9);

        for raw in [RawRecord::without_text(1, Platform::Reddit), record(2, "")] {
            let out = pipeline.classify(&raw).await;
            assert_eq!(out.sentiment, SentimentLabel::Neutral);
            assert_eq!(out.risk, RiskLabel::NoConcern);
            assert_eq!(out.behavior, BehaviorLabel::PassiveObserver);
            assert_eq!(out.metadata.polarity, 0.0);
        }
    }

    #[tokio::test]
    async fn test_polarity_drives_behavior_without_risk() {
        let out = pipeline_with_score(0.5).classify(&record(1, "nice game")).await;
        assert_eq!(out.sentiment, SentimentLabel::Positive);
        assert_eq!(out.behavior, BehaviorLabel::PositiveContributor);

        let out = pipeline_with_score(-0.5).classify(&record(1, "nice game")).await;
        assert_eq!(out.sentiment, SentimentLabel::Negative);
        assert_eq!(out.behavior, BehaviorLabel::HighlyEngaged);
    }

    #[tokio::test]
    async fn test_original_text_is_kept_verbatim() {
        let pipeline = pipeline_with_score(0.0);
        let out = pipeline.classify(&record(5, "@bob Check THIS http://x.y")).await;
        assert_eq!(out.id, 5);
        assert_eq!(out.original_text.as_deref(), Some("@bob Check THIS http://x.y"));
    }

    #[tokio::test]
    async fn test_translated_text_is_scored() {
        let pipeline = ClassificationPipeline::builder()
            .translator(Arc::new(DictionaryTranslator))
            .build()
            .unwrap();

        let raw = record(1, "Estoy feliz!").with_language("es");
        let out = pipeline.classify(&raw).await;

        assert_eq!(out.metadata.translation, TranslationStatus::Translated);
        assert_eq!(out.sentiment, SentimentLabel::Positive);
    }

    #[tokio::test]
    async fn test_same_language_is_not_translated() {
        let pipeline = ClassificationPipeline::builder()
            .translator(Arc::new(DownTranslator))
            .build()
            .unwrap();

        let out = pipeline.classify(&record(1, "hello").with_language("EN")).await;
        assert_eq!(out.metadata.translation, TranslationStatus::NotRequired);

        let out = pipeline.classify(&record(2, "!!!").with_language("es")).await;
        assert_eq!(out.metadata.translation, TranslationStatus::NotRequired);
    }

    #[tokio::test]
    async fn test_translation_failure_degrades_record() {
        let pipeline = ClassificationPipeline::builder()
            .scorer(Arc::new(FixedScorer(0.0)))
            .translator(Arc::new(DownTranslator))
            .build()
            .unwrap();

        let records = vec![
            record(1, "estoy cansado").with_language("es"),
            record(2, "so tired"),
        ];
        let report = pipeline.classify_all(&records).await.unwrap();

        assert_eq!(report.len(), 2);
        assert_eq!(report.degraded, vec![1]);
        assert_eq!(
            report.records[0].metadata.translation,
            TranslationStatus::Skipped {
                reason: SkipReason::ServiceUnavailable
            }
        );
        assert_eq!(report.records[1].risk, RiskLabel::BurnoutRisk);
        assert!(report.translation_outage());
    }

    #[tokio::test]
    async fn test_outage_is_fatal_only_when_requested() {
        let config = PipelineConfig {
            fail_on_translation_outage: true,
            ..Default::default()
        };
        let pipeline = ClassificationPipeline::builder()
            .config(config)
            .translator(Arc::new(DownTranslator))
            .build()
            .unwrap();

        let records = vec![record(1, "hola amigo").with_language("es")];
        let err = pipeline.classify_all(&records).await.unwrap_err();
        assert!(matches!(
            err,
            Error::TranslationOutage {
                attempts: 1,
                failures: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_missing_translator_is_disabled_not_outage() {
        let config = PipelineConfig {
            fail_on_translation_outage: true,
            ..Default::default()
        };
        let pipeline = ClassificationPipeline::new(config).unwrap();

        let records = vec![record(1, "bonjour").with_language("fr")];
        let report = pipeline.classify_all(&records).await.unwrap();

        assert_eq!(report.degraded, vec![1]);
        assert_eq!(report.translation_attempts, 0);
        assert!(!report.translation_outage());
    }

    #[tokio::test(start_paused = true)]
    async fn test_translation_timeout_degrades_record() {
        let mut config = PipelineConfig::default();
        config.translation.timeout_ms = 50;
        let pipeline = ClassificationPipeline::builder()
            .config(config)
            .translator(Arc::new(StalledTranslator))
            .build()
            .unwrap();

        let out = pipeline.classify(&record(1, "hola").with_language("es")).await;
        assert_eq!(
            out.metadata.translation,
            TranslationStatus::Skipped {
                reason: SkipReason::Timeout
            }
        );
    }

    #[tokio::test]
    async fn test_classify_all_preserves_order_and_ids() {
        let pipeline = pipeline_with_score(0.0);

        let records: Vec<_> = (0..50).rev().map(|i| record(i, "text")).collect();
        let report = pipeline.classify_all(&records).await.unwrap();

        let ids: Vec<_> = report.records.iter().map(|r| r.id).collect();
        let expected: Vec<_> = (0..50).rev().collect();
        assert_eq!(ids, expected);
        assert!(!report.cancelled);

        let empty = pipeline.classify_all(&[]).await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_pre_cancelled_batch_returns_no_records() {
        let pipeline = pipeline_with_score(0.0);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let records = vec![record(1, "a"), record(2, "b")];
        let report = pipeline
            .classify_all_with_cancel(&records, &cancel)
            .await
            .unwrap();

        assert!(report.cancelled);
        assert!(report.is_empty());
    }

    #[tokio::test]
    async fn test_classify_source_surfaces_schema_error() {
        let mut file = tempfile_json(r#"[{"title": "no text here"}]"#);
        file.flush().unwrap();

        let mut source = FileDataSource::new();
        source.register(Platform::Facebook, file.path(), SchemaMapping::default());

        let pipeline = pipeline_with_score(0.0);
        let err = pipeline
            .classify_source(&source, Platform::Facebook)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }

    #[tokio::test]
    async fn test_classify_source_classifies_rows() {
        let file = tempfile_json(r#"[{"text": "so anxious"}, {"text": null}]"#);

        let mut source = FileDataSource::new();
        source.register(Platform::Twitter, file.path(), SchemaMapping::default());

        let pipeline = pipeline_with_score(0.0);
        let report = pipeline
            .classify_source(&source, Platform::Twitter)
            .await
            .unwrap();

        assert_eq!(report.records[0].risk, RiskLabel::AnxietyRisk);
        assert_eq!(report.records[1].behavior, BehaviorLabel::PassiveObserver);
    }

    fn tempfile_json(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }
}
