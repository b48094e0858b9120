//! Translation capability
//!
//! The pipeline translates non-English text before scoring it. The service is
//! an external, I/O-bound dependency: failures are reported as
//! [`TranslationError`] and handled by the caller's fallback policy.

use crate::config::TranslationConfig;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use socialpulse_core::{Error, Result, TranslationError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Trait for translation services
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `source` to `target` (ISO 639-1 codes)
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> std::result::Result<String, TranslationError>;

    /// Get the translator name
    fn name(&self) -> &str;
}

#[derive(Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// Client for a LibreTranslate-compatible `POST /translate` endpoint
#[derive(Debug, Clone)]
pub struct HttpTranslator {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpTranslator {
    /// Create a client for the service rooted at `endpoint`
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: format!("{}/translate", endpoint.trim_end_matches('/')),
            api_key,
        })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> std::result::Result<String, TranslationError> {
        let request = TranslateRequest {
            q: text,
            source,
            target,
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslationError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(TranslationError::RateLimited);
        }
        if status.is_server_error() {
            return Err(TranslationError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::InvalidResponse(format!("HTTP {status}: {body}")));
        }

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponse(e.to_string()))?;

        debug!(source, target, "translated {} chars", text.len());
        Ok(body.translated_text)
    }

    fn name(&self) -> &str {
        "http"
    }
}

type CacheKey = (String, String, String);

/// Read-through cache in front of another translator.
///
/// Each distinct (text, source, target) key is computed at most once even
/// under concurrent lookups; waiters share the first successful result.
/// Failures are not cached.
pub struct CachedTranslator<T> {
    inner: T,
    entries: Mutex<HashMap<CacheKey, Arc<OnceCell<String>>>>,
}

impl<T: Translator> CachedTranslator<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of successfully cached translations
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|cell| cell.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached translation
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Translator> Translator for CachedTranslator<T> {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> std::result::Result<String, TranslationError> {
        let key = (text.to_string(), source.to_string(), target.to_string());
        let cell = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        let result = cell
            .get_or_try_init(|| self.inner.translate(text, source, target))
            .await
            .cloned();

        if result.is_err() {
            // A failed call leaves the slot empty; drop it unless another
            // caller has since filled or replaced it.
            let mut entries = self.entries.lock();
            if entries
                .get(&key)
                .is_some_and(|stored| Arc::ptr_eq(stored, &cell) && !stored.initialized())
            {
                entries.remove(&key);
            }
        }

        result
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Build the translator described by `config`.
///
/// Returns `None` when translation is disabled or no endpoint is configured.
pub fn build_translator(config: &TranslationConfig) -> Result<Option<Arc<dyn Translator>>> {
    let endpoint = match config.endpoint.as_deref() {
        Some(endpoint) if config.enabled => endpoint,
        _ => {
            info!("Translation disabled; non-English records will be scored untranslated");
            return Ok(None);
        }
    };

    let http = HttpTranslator::new(
        endpoint,
        config.api_key.clone(),
        Duration::from_millis(config.timeout_ms),
    )?;
    info!(endpoint = %endpoint, cache = config.cache, "Translation enabled");

    let translator: Arc<dyn Translator> = if config.cache {
        Arc::new(CachedTranslator::new(http))
    } else {
        Arc::new(http)
    };

    Ok(Some(translator))
}
