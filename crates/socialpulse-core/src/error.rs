//! Error types for SocialPulse

/// Result type alias using SocialPulse's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for SocialPulse operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Dataset has no recognised text field. Fatal for that dataset.
    #[error("schema error: {0}")]
    Schema(String),

    /// Dataset could not be read or a row is malformed
    #[error("dataset error: {0}")]
    Dataset(String),

    /// Every attempted translation in a batch failed
    #[error("translation service unreachable: {failures} of {attempts} calls failed")]
    TranslationOutage { attempts: usize, failures: usize },

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML errors
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Create a new dataset error
    pub fn dataset(msg: impl Into<String>) -> Self {
        Self::Dataset(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Failure of the external translation capability.
///
/// Always recoverable at the record level: the pipeline falls back to the
/// untranslated text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    /// Service is down, unreachable, or answered with a server error
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Service refused the call because of its rate limit
    #[error("rate limited")]
    RateLimited,

    /// Service answered but the body could not be understood
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
