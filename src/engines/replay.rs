//! Engine that replays recorded detections.
//!
//! A replay engine ignores the image and returns the detections it was
//! created with. Recordings are JSON arrays in the same format the gateway
//! returns in `lines`, which makes it possible to run the whole service,
//! clients included, without any model files.

use crate::arbitration::Detection;
use crate::core::errors::{OCRError, OcrResult};
use crate::core::traits::RecognitionEngine;
use image::RgbImage;
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the recording path for `language` inside `dir`.
pub fn recording_path(dir: &Path, language: &str) -> PathBuf {
    dir.join(format!("{language}.json"))
}

#[derive(Debug, Clone)]
pub struct ReplayEngine {
    name: String,
    detections: Vec<Detection>,
}

impl ReplayEngine {
    pub fn new(name: impl Into<String>, detections: Vec<Detection>) -> Self {
        Self {
            name: name.into(),
            detections,
        }
    }

    /// Parses a JSON recording.
    pub fn from_json(name: impl Into<String>, json: &str) -> OcrResult<Self> {
        let detections: Vec<Detection> = serde_json::from_str(json)?;
        Ok(Self::new(name, detections))
    }

    /// Loads the recording for `language` from `dir`.
    pub fn from_dir(dir: &Path, language: &str) -> OcrResult<Self> {
        let path = recording_path(dir, language);
        if !path.exists() {
            return Err(OCRError::config_error_detailed(
                "replay engine",
                format!("recording not found: {}", path.display()),
            ));
        }
        let json = fs::read_to_string(&path)?;
        Self::from_json(format!("replay:{language}"), &json)
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }
}

impl RecognitionEngine for ReplayEngine {
    fn recognize(&self, _image: &RgbImage) -> OcrResult<Vec<Detection>> {
        Ok(self.detections.clone())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
