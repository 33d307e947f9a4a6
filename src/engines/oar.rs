//! Recognition backend built on the `oar-ocr` ONNX pipeline.
//!
//! Each language gets its own model directory:
//!
//! ```text
//! <models>/<language>/det.onnx
//! <models>/<language>/rec.onnx
//! <models>/<language>/dict.txt
//! ```

use crate::arbitration::Detection;
use crate::core::errors::{OCRError, OcrResult};
use crate::core::traits::RecognitionEngine;
use crate::processors::Point;
use image::RgbImage;
use oar_ocr::oarocr::{OAROCR, OAROCRBuilder, OAROCRResult};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Model files for one language.
#[derive(Debug, Clone)]
pub struct OarModelPaths {
    pub det_model: PathBuf,
    pub rec_model: PathBuf,
    pub dict_path: PathBuf,
}

impl OarModelPaths {
    /// Standard layout under `<models_dir>/<language>/`.
    pub fn for_language(models_dir: &Path, language: &str) -> Self {
        let dir = models_dir.join(language);
        Self {
            det_model: dir.join("det.onnx"),
            rec_model: dir.join("rec.onnx"),
            dict_path: dir.join("dict.txt"),
        }
    }

    fn validate(&self) -> OcrResult<()> {
        for (what, path) in [
            ("Detection model", &self.det_model),
            ("Recognition model", &self.rec_model),
            ("Dictionary file", &self.dict_path),
        ] {
            if !path.exists() {
                return Err(OCRError::config_error_detailed(
                    "oar engine",
                    format!("{what} not found: {}", path.display()),
                ));
            }
        }
        Ok(())
    }
}

pub struct OarEngine {
    name: String,
    ocr: OAROCR,
}

impl fmt::Debug for OarEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OarEngine").field("name", &self.name).finish()
    }
}

impl OarEngine {
    /// Builds the pipeline for `language` from its model files.
    pub fn new(language: &str, paths: &OarModelPaths) -> OcrResult<Self> {
        paths.validate()?;

        let ocr = OAROCRBuilder::new(&paths.det_model, &paths.rec_model, &paths.dict_path)
            .build()
            .map_err(|e| OCRError::config_error_detailed("oar engine", e.to_string()))?;

        Ok(Self {
            name: format!("oar:{language}"),
            ocr,
        })
    }

    fn to_detections(result: OAROCRResult) -> Vec<Detection> {
        result
            .text_regions
            .into_iter()
            .filter_map(|region| {
                let polygon: Vec<Point> = region
                    .bounding_box
                    .points
                    .iter()
                    .map(|p| Point::new(p.x, p.y))
                    .collect();
                let text = region.text.as_deref().unwrap_or_default().to_string();
                let score = region.confidence.unwrap_or(0.0);
                match Detection::try_new(text, score, polygon) {
                    Ok(detection) => Some(detection),
                    Err(e) => {
                        debug!(error = %e, "Dropping region without polygon");
                        None
                    }
                }
            })
            .collect()
    }
}

impl RecognitionEngine for OarEngine {
    fn recognize(&self, image: &RgbImage) -> OcrResult<Vec<Detection>> {
        let results = self
            .ocr
            .predict(vec![image.clone()])
            .map_err(|e| OCRError::recognition_error(&self.name, "predict", e.to_string()))?;

        let result = results.into_iter().next().ok_or_else(|| {
            OCRError::recognition_error(&self.name, "predict", "no results returned")
        })?;

        Ok(Self::to_detections(result))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
