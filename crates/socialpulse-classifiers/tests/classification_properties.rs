//! Property tests for whole-record classification

use proptest::prelude::*;
use socialpulse_classifiers::{predict_behavior, ClassificationPipeline, PipelineConfig};
use socialpulse_core::{BehaviorLabel, Platform, RawRecord, RiskLabel, TranslationStatus};

fn classify_blocking(text: &str) -> socialpulse_core::ClassifiedRecord {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let pipeline = ClassificationPipeline::new(PipelineConfig::default()).unwrap();
    runtime.block_on(pipeline.classify(&RawRecord::new(1, text, Platform::Reddit)))
}

proptest! {
    #[test]
    fn behavior_is_derived_from_sentiment_and_risk(text in ".{0,80}") {
        let out = classify_blocking(&text);
        prop_assert_eq!(out.behavior, predict_behavior(out.sentiment, out.risk));
        prop_assert_eq!(out.metadata.translation, TranslationStatus::NotRequired);
        prop_assert!((-1.0..=1.0).contains(&out.metadata.polarity));
    }

    #[test]
    fn depression_keyword_always_means_support_seeking(
        prefix in "[a-z ]{0,20}",
        suffix in "[a-z ]{0,20}",
    ) {
        let out = classify_blocking(&format!("{prefix} hopeless {suffix}"));
        prop_assert_eq!(out.risk, RiskLabel::DepressionRisk);
        prop_assert_eq!(out.behavior, BehaviorLabel::SupportSeeking);
    }

    #[test]
    fn classification_is_deterministic(text in "[a-zA-Z@:/. ]{0,60}") {
        let first = classify_blocking(&text);
        let second = classify_blocking(&text);
        prop_assert_eq!(first.sentiment, second.sentiment);
        prop_assert_eq!(first.risk, second.risk);
        prop_assert_eq!(first.behavior, second.behavior);
    }
}
