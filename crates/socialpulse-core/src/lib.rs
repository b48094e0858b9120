//! SocialPulse Core
//!
//! Core types and utilities shared across SocialPulse components.
//!
//! This crate provides:
//! - Raw and classified record types
//! - The sentiment, risk and behavior label enums
//! - Error types and result handling
//! - The ingestion boundary: per-platform schema mapping and data sources

pub mod dataset;
pub mod error;
pub mod types;

pub use dataset::{
    DataSource, DatasetFormat, DatasetRegistration, FileDataSource, ResolvedSchema,
    SchemaMapping, TextEncoding,
};
pub use error::{Error, Result, TranslationError};
pub use types::{
    BehaviorLabel, ClassificationMetadata, ClassifiedRecord, LabelDimension, Platform, RawRecord,
    RiskLabel, SentimentLabel, SkipReason, TranslationStatus,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::dataset::{DataSource, FileDataSource, SchemaMapping};
    pub use crate::error::{Error, Result, TranslationError};
    pub use crate::types::{
        BehaviorLabel, ClassifiedRecord, LabelDimension, Platform, RawRecord, RiskLabel,
        SentimentLabel, SkipReason, TranslationStatus,
    };
}
