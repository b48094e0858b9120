//! Rendering of classification results

use serde::Serialize;
use socialpulse_classifiers::{count_by_label, BatchReport};
use socialpulse_core::{ClassifiedRecord, LabelDimension, Platform, TranslationStatus};
use std::collections::BTreeMap;
use std::fmt::Write;

const TEXT_WIDTH: usize = 60;

/// Results for one platform, after filtering
#[derive(Debug, Serialize)]
pub struct PlatformReport<'a> {
    pub platform: Platform,
    pub total: usize,
    pub cancelled: bool,
    pub degraded: &'a [i64],
    pub counts: BTreeMap<String, BTreeMap<&'static str, usize>>,
    pub records: &'a [ClassifiedRecord],
}

impl<'a> PlatformReport<'a> {
    /// Counts cover the filtered records, like the exported charts
    pub fn new(
        platform: Platform,
        batch: &'a BatchReport,
        filtered: &'a [ClassifiedRecord],
    ) -> Self {
        let counts = LabelDimension::ALL
            .iter()
            .map(|&dimension| (dimension.to_string(), count_by_label(filtered, dimension)))
            .collect();

        Self {
            platform,
            total: batch.len(),
            cancelled: batch.cancelled,
            degraded: &batch.degraded,
            counts,
            records: filtered,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Human-readable report: count tables, records, degraded summary
    pub fn to_table(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "== {} ==", self.platform);
        let _ = writeln!(
            out,
            "{} classified, {} after filtering{}",
            self.total,
            self.records.len(),
            if self.cancelled { " (cancelled)" } else { "" }
        );

        for (dimension, counts) in &self.counts {
            let _ = writeln!(out);
            let _ = writeln!(out, "  {dimension}");
            for (label, count) in counts {
                let _ = writeln!(out, "    {label:<22} {count:>6}");
            }
        }

        if !self.records.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "  {:>8}  {:<9} {:<15} {:<21} text",
                "id", "sentiment", "risk", "behavior"
            );
            for record in self.records {
                let _ = writeln!(
                    out,
                    "  {:>8}  {:<9} {:<15} {:<21} {}{}",
                    record.id,
                    record.sentiment,
                    record.risk,
                    record.behavior,
                    truncate(record.original_text.as_deref().unwrap_or(""), TEXT_WIDTH),
                    translation_marker(&record.metadata.translation),
                );
            }
        }

        if !self.degraded.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "  {} record(s) scored from untranslated text: {:?}",
                self.degraded.len(),
                self.degraded
            );
        }

        out
    }
}

fn translation_marker(status: &TranslationStatus) -> &'static str {
    match status {
        TranslationStatus::NotRequired => "",
        TranslationStatus::Translated => " [translated]",
        TranslationStatus::Skipped { .. } => " [untranslated]",
    }
}

/// Single-line, character-bounded excerpt
fn truncate(text: &str, width: usize) -> String {
    let line: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if line.chars().count() <= width {
        return line;
    }
    let mut cut: String = line.chars().take(width.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use socialpulse_core::{
        BehaviorLabel, ClassificationMetadata, RiskLabel, SentimentLabel, SkipReason,
    };

    fn record(id: i64, text: Option<&str>, translation: TranslationStatus) -> ClassifiedRecord {
        ClassifiedRecord {
            id,
            original_text: text.map(str::to_string),
            sentiment: SentimentLabel::Negative,
            risk: RiskLabel::BurnoutRisk,
            behavior: BehaviorLabel::SupportSeeking,
            metadata: ClassificationMetadata {
                translation,
                ..Default::default()
            },
        }
    }

    fn batch(records: Vec<ClassifiedRecord>, degraded: Vec<i64>) -> BatchReport {
        BatchReport {
            records,
            degraded,
            translation_attempts: 1,
            translation_failures: 1,
            cancelled: false,
            total_latency_us: 10,
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("line one\nline two", 40), "line one line two");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate("ñññññññññ", 5).chars().count(), 5);
    }

    #[test]
    fn test_table_lists_counts_records_and_degraded() {
        let skipped = TranslationStatus::Skipped {
            reason: SkipReason::Timeout,
        };
        let records = vec![
            record(1, Some("so tired"), TranslationStatus::NotRequired),
            record(2, Some("muy cansado"), skipped),
            record(3, None, TranslationStatus::NotRequired),
        ];
        let batch = batch(records.clone(), vec![2]);

        let report = PlatformReport::new(Platform::Reddit, &batch, &records[..2]);
        let table = report.to_table();

        assert!(table.starts_with("== Reddit ==\n3 classified, 2 after filtering\n"));
        assert!(table.contains("Burnout Risk                2"));
        assert!(table.contains("No Concern                  0"));
        assert!(table.contains("muy cansado [untranslated]"));
        assert!(table.contains("1 record(s) scored from untranslated text: [2]"));
    }

    #[test]
    fn test_json_has_every_dimension() {
        let records = vec![record(7, Some("hi"), TranslationStatus::Translated)];
        let batch = batch(records.clone(), vec![]);

        let json = PlatformReport::new(Platform::Twitter, &batch, &records)
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["platform"], "Twitter");
        assert_eq!(value["total"], 1);
        assert_eq!(value["counts"]["risk"]["Burnout Risk"], 1);
        assert_eq!(value["counts"]["sentiment"]["Positive"], 0);
        assert_eq!(value["counts"]["behavior"].as_object().unwrap().len(), 4);
        assert_eq!(value["records"][0]["id"], 7);
    }
}
