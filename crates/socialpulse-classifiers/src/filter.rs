//! Post-hoc filtering and aggregation of classified records

use serde::{Deserialize, Serialize};
use socialpulse_core::{
    BehaviorLabel, ClassifiedRecord, LabelDimension, RiskLabel, SentimentLabel,
};
use std::collections::{BTreeMap, HashSet};

/// Set-membership filter across the three label dimensions.
///
/// A record is kept only if its sentiment, risk and behavior are all in the
/// corresponding allowed set. The default allows every label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultFilter {
    #[serde(default = "all_sentiments")]
    pub sentiments: HashSet<SentimentLabel>,

    #[serde(default = "all_risks")]
    pub risks: HashSet<RiskLabel>,

    #[serde(default = "all_behaviors")]
    pub behaviors: HashSet<BehaviorLabel>,
}

impl Default for ResultFilter {
    fn default() -> Self {
        Self {
            sentiments: all_sentiments(),
            risks: all_risks(),
            behaviors: all_behaviors(),
        }
    }
}

impl ResultFilter {
    /// Filter that keeps everything
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sentiments(mut self, sentiments: impl IntoIterator<Item = SentimentLabel>) -> Self {
        self.sentiments = sentiments.into_iter().collect();
        self
    }

    pub fn with_risks(mut self, risks: impl IntoIterator<Item = RiskLabel>) -> Self {
        self.risks = risks.into_iter().collect();
        self
    }

    pub fn with_behaviors(mut self, behaviors: impl IntoIterator<Item = BehaviorLabel>) -> Self {
        self.behaviors = behaviors.into_iter().collect();
        self
    }

    /// Whether `record` passes on every dimension
    pub fn matches(&self, record: &ClassifiedRecord) -> bool {
        allowed(record, &self.sentiments, &self.risks, &self.behaviors)
    }

    /// Matching records, in their original relative order
    pub fn apply(&self, records: &[ClassifiedRecord]) -> Vec<ClassifiedRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

fn all_sentiments() -> HashSet<SentimentLabel> {
    SentimentLabel::ALL.iter().copied().collect()
}

fn all_risks() -> HashSet<RiskLabel> {
    RiskLabel::ALL.iter().copied().collect()
}

fn all_behaviors() -> HashSet<BehaviorLabel> {
    BehaviorLabel::ALL.iter().copied().collect()
}

/// Keep records whose labels are all allowed
pub fn filter(
    records: &[ClassifiedRecord],
    sentiments: &HashSet<SentimentLabel>,
    risks: &HashSet<RiskLabel>,
    behaviors: &HashSet<BehaviorLabel>,
) -> Vec<ClassifiedRecord> {
    records
        .iter()
        .filter(|r| allowed(r, sentiments, risks, behaviors))
        .cloned()
        .collect()
}

fn allowed(
    record: &ClassifiedRecord,
    sentiments: &HashSet<SentimentLabel>,
    risks: &HashSet<RiskLabel>,
    behaviors: &HashSet<BehaviorLabel>,
) -> bool {
    sentiments.contains(&record.sentiment)
        && risks.contains(&record.risk)
        && behaviors.contains(&record.behavior)
}

/// Space-joined original text of `records`, skipping records without text.
///
/// Input for word-frequency consumers such as word clouds.
pub fn concatenate_text(records: &[ClassifiedRecord]) -> String {
    records
        .iter()
        .filter_map(|r| r.original_text.as_deref())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Record count per label along `dimension`.
///
/// Every label of the dimension is present, with zero for unseen labels.
pub fn count_by_label(
    records: &[ClassifiedRecord],
    dimension: LabelDimension,
) -> BTreeMap<&'static str, usize> {
    let mut counts: BTreeMap<&'static str, usize> =
        dimension.labels().into_iter().map(|label| (label, 0)).collect();

    for record in records {
        *counts.entry(record.label(dimension)).or_insert(0) += 1;
    }

    counts
}
