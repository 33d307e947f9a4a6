//! Recognition backends.
//!
//! - [`ReplayEngine`] returns recorded detections and needs no models.
//! - `OarEngine` (feature `oar`) runs the `oar-ocr` ONNX pipeline.

#[cfg(feature = "oar")]
pub mod oar;
pub mod replay;
#[cfg(test)]
pub(crate) mod stub;

#[cfg(feature = "oar")]
pub use oar::{OarEngine, OarModelPaths};
pub use replay::ReplayEngine;

use crate::core::errors::{OCRError, OcrResult};
use crate::core::registry::EnginePool;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

/// Which backend the engines of a pool are built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineBackend {
    Replay,
    Oar,
}

impl FromStr for EngineBackend {
    type Err = OCRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "replay" => Ok(Self::Replay),
            "oar" => Ok(Self::Oar),
            other => Err(OCRError::invalid_field("backend", "'replay' or 'oar'", format!("'{other}'"))),
        }
    }
}

/// Constructs and warms up one engine per language.
///
/// `models_dir` holds `<language>.json` recordings for the replay backend or
/// `<language>/` model directories for the oar backend. Any engine that cannot
/// be constructed or warmed up aborts startup.
pub fn build_pool(
    backend: EngineBackend,
    models_dir: &Path,
    languages: &[String],
) -> OcrResult<EnginePool> {
    let mut builder = EnginePool::builder();

    for language in languages {
        info!(language = %language, backend = ?backend, "Loading engine");
        match backend {
            EngineBackend::Replay => {
                let engine = ReplayEngine::from_dir(models_dir, language)?;
                builder.register_shared(language.clone(), std::sync::Arc::new(engine))?;
            }
            #[cfg(feature = "oar")]
            EngineBackend::Oar => {
                let paths = OarModelPaths::for_language(models_dir, language);
                let engine = OarEngine::new(language, &paths)?;
                builder.register_shared(language.clone(), std::sync::Arc::new(engine))?;
            }
            #[cfg(not(feature = "oar"))]
            EngineBackend::Oar => {
                return Err(OCRError::config_error_detailed(
                    "engine backend",
                    "'oar' requested but the 'oar' feature is not enabled",
                ));
            }
        }
    }

    builder.build()
}
