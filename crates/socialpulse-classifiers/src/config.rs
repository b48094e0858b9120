//! Configuration for the classification pipeline

use serde::{Deserialize, Serialize};
use socialpulse_core::{Error, Result};
use std::path::Path;

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Language the scorer and keyword sets are tuned for
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation service settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Records classified concurrently within a batch
    #[serde(default = "default_parallel_records")]
    pub max_parallel_records: usize,

    /// Return an error instead of degraded results when every translation
    /// call in a batch fails
    #[serde(default)]
    pub fail_on_translation_outage: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_language: default_target_language(),
            translation: TranslationConfig::default(),
            max_parallel_records: default_parallel_records(),
            fail_on_translation_outage: false,
        }
    }
}

/// Translation service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Enable translation when an endpoint is configured
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of a LibreTranslate-compatible service
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Maximum in-flight translation calls
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-call timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Cache translations per (text, source, target)
    #[serde(default = "default_true")]
    pub cache: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            api_key: None,
            max_concurrency: default_max_concurrency(),
            timeout_ms: default_timeout_ms(),
            cache: true,
        }
    }
}

impl PipelineConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(Error::config("target_language must not be empty"));
        }
        if self.max_parallel_records == 0 {
            return Err(Error::config("max_parallel_records must be at least 1"));
        }
        if self.translation.max_concurrency == 0 {
            return Err(Error::config("translation.max_concurrency must be at least 1"));
        }
        if self.translation.timeout_ms == 0 {
            return Err(Error::config("translation.timeout_ms must be positive"));
        }
        Ok(())
    }
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_parallel_records() -> usize {
    num_cpus::get().max(1)
}

fn default_max_concurrency() -> usize {
    4
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_yaml() {
        let yaml = r#"
target_language: en
max_parallel_records: 8
fail_on_translation_outage: true
translation:
  endpoint: http://localhost:5000
  max_concurrency: 2
  timeout_ms: 1500
  cache: false
"#;

        let config = PipelineConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.max_parallel_records, 8);
        assert!(config.fail_on_translation_outage);
        assert!(config.translation.enabled);
        assert_eq!(config.translation.endpoint.as_deref(), Some("http://localhost:5000"));
        assert_eq!(config.translation.max_concurrency, 2);
        assert_eq!(config.translation.timeout_ms, 1500);
        assert!(!config.translation.cache);
    }

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = PipelineConfig::from_yaml("{}").unwrap();
        assert_eq!(config.target_language, "en");
        assert_eq!(config.translation, TranslationConfig::default());
        assert!(config.max_parallel_records >= 1);
        assert!(!config.fail_on_translation_outage);
    }

    #[test]
    fn test_validation_rejects_zero_concurrency() {
        let err = PipelineConfig::from_yaml("translation:\n  max_concurrency: 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = PipelineConfig::from_yaml("max_parallel_records: 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let err = PipelineConfig::from_yaml("max_parallel_records: [1, 2]").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }
}
