//! Application configuration

use crate::cli::CommonArgs;
use serde::{Deserialize, Serialize};
use socialpulse_classifiers::{PipelineConfig, ResultFilter};
use socialpulse_core::{
    DatasetFormat, DatasetRegistration, FileDataSource, Platform, SchemaMapping, TextEncoding,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Classification pipeline settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Dataset file per platform
    #[serde(default)]
    pub datasets: HashMap<Platform, DatasetConfig>,

    /// Labels to keep in the report
    #[serde(default)]
    pub filter: ResultFilter,
}

/// One platform's dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// JSON array, JSON Lines or CSV file. Relative paths are resolved
    /// against the config file's directory.
    pub path: PathBuf,

    /// File layout; taken from the extension when omitted
    #[serde(default)]
    pub format: Option<DatasetFormat>,

    /// Encoding of CSV files
    #[serde(default)]
    pub encoding: TextEncoding,

    #[serde(flatten)]
    pub schema: SchemaMapping,
}

impl AppConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, args: &CommonArgs) -> anyhow::Result<Self> {
        let path = Path::new(config_path);

        // Try to load from file, or use defaults
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("No config file at {config_path}, using defaults");
            Self::default()
        };

        config.apply_overrides(args);
        config.pipeline.validate()?;
        Ok(config)
    }

    /// Parse a config file, anchoring relative dataset paths to its directory
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yaml::from_str(&content)?;

        if let Some(base) = path.parent() {
            for dataset in config.datasets.values_mut() {
                if dataset.path.is_relative() {
                    dataset.path = base.join(&dataset.path);
                }
            }
        }

        Ok(config)
    }

    fn apply_overrides(&mut self, args: &CommonArgs) {
        let translation = &mut self.pipeline.translation;
        if let Some(endpoint) = &args.translate_endpoint {
            translation.endpoint = Some(endpoint.clone());
            translation.enabled = true;
        }
        if args.no_translate {
            translation.enabled = false;
        }

        if let Some(language) = &args.target_language {
            self.pipeline.target_language = language.clone();
        }
        if let Some(parallel) = args.parallel {
            self.pipeline.max_parallel_records = parallel;
        }
        if args.fail_on_outage {
            self.pipeline.fail_on_translation_outage = true;
        }
    }

    /// Register every configured dataset with a fresh data source
    pub fn data_source(&self) -> FileDataSource {
        let mut source = FileDataSource::new();
        for (platform, dataset) in &self.datasets {
            let mut registration = DatasetRegistration::new(&dataset.path, dataset.schema.clone())
                .with_encoding(dataset.encoding);
            if let Some(format) = dataset.format {
                registration = registration.with_format(format);
            }
            source.register_dataset(*platform, registration);
        }
        source
    }
}
