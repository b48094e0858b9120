//! Core types for SocialPulse

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, TranslationError};

/// Folds a user-supplied label ("Depression Risk", "depression-risk") to its
/// snake_case identifier.
fn fold_label(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| match c {
            ' ' | '-' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => ($display:literal, $ident:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $display, alias = $ident)]
                $variant,
            )+
        }

        impl $name {
            /// Every value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Human-readable label
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $display,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match fold_label(s).as_str() {
                    $($ident => Ok($name::$variant),)+
                    other => Err(Error::config(format!("unknown {} label '{}'", $kind, other))),
                }
            }
        }
    };
}

label_enum! {
    /// Source platform of a record
    Platform, "platform" {
        Twitter => ("Twitter", "twitter"),
        Reddit => ("Reddit", "reddit"),
        Facebook => ("Facebook", "facebook"),
    }
}

label_enum! {
    /// Thresholded polarity of a record
    SentimentLabel, "sentiment" {
        Positive => ("Positive", "positive"),
        Negative => ("Negative", "negative"),
        Neutral => ("Neutral", "neutral"),
    }
}

label_enum! {
    /// Mental-health risk signal. Exactly one per record.
    RiskLabel, "risk" {
        DepressionRisk => ("Depression Risk", "depression_risk"),
        AnxietyRisk => ("Anxiety Risk", "anxiety_risk"),
        BurnoutRisk => ("Burnout Risk", "burnout_risk"),
        NoConcern => ("No Concern", "no_concern"),
    }
}

label_enum! {
    /// Predicted engagement behavior, derived from sentiment and risk
    BehaviorLabel, "behavior" {
        SupportSeeking => ("Support-Seeking", "support_seeking"),
        HighlyEngaged => ("Highly Engaged", "highly_engaged"),
        PositiveContributor => ("Positive Contributor", "positive_contributor"),
        PassiveObserver => ("Passive Observer", "passive_observer"),
    }
}

/// The three label dimensions a classified record carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelDimension {
    Sentiment,
    Risk,
    Behavior,
}

impl LabelDimension {
    pub const ALL: &'static [LabelDimension] = &[Self::Sentiment, Self::Risk, Self::Behavior];

    /// Display names of every label in this dimension
    pub fn labels(&self) -> Vec<&'static str> {
        match self {
            Self::Sentiment => SentimentLabel::ALL.iter().map(|l| l.as_str()).collect(),
            Self::Risk => RiskLabel::ALL.iter().map(|l| l.as_str()).collect(),
            Self::Behavior => BehaviorLabel::ALL.iter().map(|l| l.as_str()).collect(),
        }
    }
}

impl fmt::Display for LabelDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sentiment => "sentiment",
            Self::Risk => "risk",
            Self::Behavior => "behavior",
        })
    }
}

/// A single input row as supplied by the ingestion layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Caller-assigned identifier, unique within a dataset
    pub id: i64,

    /// Post body. `None` when the row has no usable text.
    pub text: Option<String>,

    /// Platform the record was collected from
    pub platform: Platform,

    /// Declared source language (ISO 639-1). `None` means the analysis language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl RawRecord {
    /// Create a record with text in the analysis language
    pub fn new(id: i64, text: impl Into<String>, platform: Platform) -> Self {
        Self {
            id,
            text: Some(text.into()),
            platform,
            language: None,
        }
    }

    /// Create a record whose text is missing
    pub fn without_text(id: i64, platform: Platform) -> Self {
        Self {
            id,
            text: None,
            platform,
            language: None,
        }
    }

    /// Declare the source language of the text
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// Whether and how translation took part in classifying a record
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranslationStatus {
    /// Text was already in the analysis language, or there was nothing to translate
    #[default]
    NotRequired,

    /// Text was translated before scoring
    Translated,

    /// Translation failed; the untranslated text was scored instead
    Skipped { reason: SkipReason },
}

impl TranslationStatus {
    /// True when the record was classified from untranslated text
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    /// True when a translation call was actually made for this record
    pub fn was_attempted(&self) -> bool {
        match self {
            Self::NotRequired => false,
            Self::Translated => true,
            Self::Skipped { reason } => *reason != SkipReason::Disabled,
        }
    }
}

/// Why a record that needed translation was scored untranslated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No translator is configured
    Disabled,
    /// The call did not finish within the configured timeout
    Timeout,
    ServiceUnavailable,
    RateLimited,
    InvalidResponse,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Timeout => "timeout",
            Self::ServiceUnavailable => "service_unavailable",
            Self::RateLimited => "rate_limited",
            Self::InvalidResponse => "invalid_response",
        }
    }
}

impl From<&TranslationError> for SkipReason {
    fn from(err: &TranslationError) -> Self {
        match err {
            TranslationError::ServiceUnavailable(_) => Self::ServiceUnavailable,
            TranslationError::RateLimited => Self::RateLimited,
            TranslationError::InvalidResponse(_) => Self::InvalidResponse,
        }
    }
}

/// Pipeline metadata attached to a classified record. Not part of the label set.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationMetadata {
    /// Translation outcome
    pub translation: TranslationStatus,

    /// Polarity score the sentiment label was thresholded from
    pub polarity: f32,

    /// Time spent classifying this record
    pub latency_us: u64,
}

/// Output of the classification pipeline for one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedRecord {
    /// Identifier of the originating raw record
    pub id: i64,

    /// Text exactly as it was supplied, before normalization
    pub original_text: Option<String>,

    pub sentiment: SentimentLabel,
    pub risk: RiskLabel,
    pub behavior: BehaviorLabel,

    #[serde(default)]
    pub metadata: ClassificationMetadata,
}

impl ClassifiedRecord {
    /// Display name of this record's label along `dimension`
    pub fn label(&self, dimension: LabelDimension) -> &'static str {
        match dimension {
            LabelDimension::Sentiment => self.sentiment.as_str(),
            LabelDimension::Risk => self.risk.as_str(),
            LabelDimension::Behavior => self.behavior.as_str(),
        }
    }

    /// True when translation was skipped for this record
    pub fn is_degraded(&self) -> bool {
        self.metadata.translation.is_degraded()
    }
}
