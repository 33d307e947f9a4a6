//! Gateway configuration: which languages are served and how.

use super::parallel::ParallelPolicy;
use crate::core::errors::{OCRError, OcrResult};
use serde::{Deserialize, Serialize};

/// Environment variable listing the configured language keys.
pub const LANGUAGES_ENV: &str = "OCR_LANGS";

/// Languages served when [`LANGUAGES_ENV`] is not set.
pub const DEFAULT_LANGUAGES: &str = "en,french,arabic";

/// Splits a comma-separated language list.
///
/// Entries are trimmed, blank entries are dropped and repeated keys keep only
/// their first occurrence.
pub fn parse_languages(list: &str) -> Vec<String> {
    let mut languages: Vec<String> = Vec::new();
    for language in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !languages.iter().any(|l| l == language) {
            languages.push(language.to_string());
        }
    }
    languages
}

/// Startup configuration of the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Language keys to construct engines for, in priority-free order.
    pub languages: Vec<String>,
    /// Scheduling of engines within one request.
    #[serde(default)]
    pub parallel: ParallelPolicy,
}

impl GatewayConfig {
    /// Builds a configuration from a comma-separated language list.
    pub fn from_language_list(list: &str) -> OcrResult<Self> {
        let languages = parse_languages(list);
        if languages.is_empty() {
            return Err(OCRError::invalid_field(
                "languages",
                "at least one language key",
                format!("'{list}'"),
            ));
        }
        Ok(Self {
            languages,
            parallel: ParallelPolicy::default(),
        })
    }

    /// Reads [`LANGUAGES_ENV`], falling back to [`DEFAULT_LANGUAGES`].
    pub fn from_env() -> OcrResult<Self> {
        let list = std::env::var(LANGUAGES_ENV).unwrap_or_else(|_| DEFAULT_LANGUAGES.to_string());
        Self::from_language_list(&list)
    }

    /// Replaces the parallel policy.
    pub fn with_parallel(mut self, parallel: ParallelPolicy) -> Self {
        self.parallel = parallel;
        self
    }
}
