//! OCR processing logic shared between CLI and server modes.

use crate::config::EngineConfig;
use polyglot_ocr::arbitration::{Detection, OcrGateway, Selection};
use polyglot_ocr::core::OCRError;
use polyglot_ocr::engines::build_pool;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("Failed to load image: {0}")]
    ImageLoad(String),

    #[error("Failed to download image: {0}")]
    Download(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Failed to configure thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Engine setup failed: {0}")]
    Engine(#[from] OCRError),

    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Query parameters of the OCR endpoint
#[derive(Debug, Default, Deserialize)]
pub struct OcrQuery {
    /// Comma-separated language keys; all configured languages when absent
    pub langs: Option<String>,
    /// Non-zero to merge the outputs of all languages
    pub merge: Option<i64>,
}

/// Response from OCR processing
#[derive(Debug, Serialize)]
pub struct OcrResponse {
    /// Winning language, "mixed" when merged, null when no engine ran
    pub lang: Option<String>,
    /// Quality score, -1.0 when no engine ran
    pub score: f32,
    pub text: String,
    pub lines: Vec<Detection>,
}

impl From<Selection> for OcrResponse {
    fn from(selection: Selection) -> Self {
        Self {
            score: selection.wire_score(),
            lang: selection.language,
            text: selection.text,
            lines: selection.detections,
        }
    }
}

/// Error body returned with 4xx/5xx responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Install the rayon pool sized by `--threads`, if one was requested
pub fn install_thread_pool(config: &EngineConfig) -> Result<(), OcrError> {
    let parallel = &config.gateway.parallel;
    if parallel.install_global_thread_pool()? {
        info!(threads = ?parallel.max_threads, "Configured rayon thread pool");
    }
    Ok(())
}

/// Build the engine pool and wrap it in a gateway
pub fn build_gateway(config: &EngineConfig) -> Result<OcrGateway, OcrError> {
    let start = Instant::now();
    let pool = build_pool(config.backend, &config.models_dir, &config.gateway.languages)?;
    info!(
        languages = ?pool.languages(),
        init_ms = start.elapsed().as_secs_f64() * 1000.0,
        "Engine pool ready"
    );
    Ok(OcrGateway::new(pool, config.gateway.parallel.clone()))
}

/// Download bytes from a URL
pub async fn download_bytes(url: &str) -> Result<Vec<u8>, OcrError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| OcrError::Download(format!("Failed to fetch URL: {}", e)))?;

    if !response.status().is_success() {
        return Err(OcrError::Download(format!(
            "HTTP error: {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| OcrError::Download(format!("Failed to read response body: {}", e)))?;

    Ok(bytes.to_vec())
}
