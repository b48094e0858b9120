//! Text normalization
//!
//! Strips URLs, @-mentions and every character outside `[a-zA-Z ]`, then
//! lower-cases. The rules are applied until the text stops changing, so
//! `normalize(normalize(x)) == normalize(x)` holds even for inputs where a
//! removal exposes a new URL-like token (e.g. `"HTTPfoo"` or `"ht!tp"`).

use regex::Regex;
use socialpulse_core::{Error, Result};

/// Removes noise from raw post text
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    url_regex: Regex,
    mention_regex: Regex,
    non_alpha_regex: Regex,
}

impl TextNormalizer {
    /// Create a new normalizer
    pub fn new() -> Result<Self> {
        Ok(Self {
            url_regex: Regex::new(r"http\S+")
                .map_err(|e| Error::internal(format!("Failed to compile URL regex: {}", e)))?,
            mention_regex: Regex::new(r"@\w+")
                .map_err(|e| Error::internal(format!("Failed to compile mention regex: {}", e)))?,
            non_alpha_regex: Regex::new(r"[^a-zA-Z ]")
                .map_err(|e| Error::internal(format!("Failed to compile alphabet regex: {}", e)))?,
        })
    }

    /// Normalize possibly-absent text. Absent text becomes the empty string.
    pub fn normalize(&self, text: Option<&str>) -> String {
        let Some(text) = text else {
            return String::new();
        };

        let mut current = self.pass(text);
        loop {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    fn pass(&self, text: &str) -> String {
        let text = self.url_regex.replace_all(text, "");
        let text = self.mention_regex.replace_all(&text, "");
        let text = self.non_alpha_regex.replace_all(&text, "");
        text.to_lowercase()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new().expect("Failed to create text normalizer")
    }
}
