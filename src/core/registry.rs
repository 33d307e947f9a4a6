//! Engine registry keyed by language.
//!
//! The registry has a strict two-phase lifecycle:
//!
//! - **Construction**: an [`EnginePoolBuilder`] owns the engines exclusively
//!   while they are registered and warmed up.
//! - **Serving**: [`EnginePoolBuilder::build`] returns an immutable
//!   [`EnginePool`] that is shared read-only across requests, so lookups need
//!   no locking.

use crate::arbitration::Detection;
use crate::core::errors::{OCRError, OcrResult};
use crate::core::traits::RecognitionEngine;
use image::RgbImage;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Shared handle to a recognition engine.
pub type SharedEngine = Arc<dyn RecognitionEngine>;

/// Collects engines before the pool starts serving.
#[derive(Debug, Default)]
pub struct EnginePoolBuilder {
    languages: Vec<String>,
    engines: HashMap<String, SharedEngine>,
}

impl EnginePoolBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `engine` under `language`.
    ///
    /// Registering the same language twice is a configuration error.
    pub fn register(
        mut self,
        language: impl Into<String>,
        engine: impl RecognitionEngine + 'static,
    ) -> OcrResult<Self> {
        self.register_shared(language, Arc::new(engine))?;
        Ok(self)
    }

    /// Registers an already shared engine under `language`.
    pub fn register_shared(
        &mut self,
        language: impl Into<String>,
        engine: SharedEngine,
    ) -> OcrResult<()> {
        let language = language.into();
        if self.engines.contains_key(&language) {
            return Err(OCRError::config_error_detailed(
                "engine pool",
                format!("language '{language}' registered twice"),
            ));
        }
        self.languages.push(language.clone());
        self.engines.insert(language, engine);
        Ok(())
    }

    /// Warms every engine up and freezes the pool.
    ///
    /// Fails on the first engine whose warm-up fails; a pool is never built
    /// with an engine that could not run once.
    pub fn build(self) -> OcrResult<EnginePool> {
        for language in &self.languages {
            let engine = &self.engines[language];
            let start = Instant::now();
            engine.warm_up().map_err(|e| {
                OCRError::recognition_error(engine.name(), format!("warm-up for '{language}'"), e)
            })?;
            info!(
                language = %language,
                engine = engine.name(),
                warm_up_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Engine ready"
            );
        }

        Ok(EnginePool {
            languages: self.languages,
            engines: self.engines,
        })
    }
}

/// Immutable mapping from language key to a ready recognition engine.
#[derive(Debug)]
pub struct EnginePool {
    languages: Vec<String>,
    engines: HashMap<String, SharedEngine>,
}

impl EnginePool {
    /// Starts building a pool.
    pub fn builder() -> EnginePoolBuilder {
        EnginePoolBuilder::new()
    }

    /// Configured language keys, in registration order.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Returns true if an engine is registered for `language`.
    pub fn contains(&self, language: &str) -> bool {
        self.engines.contains_key(language)
    }

    /// Runs the engine for `language` on `image`.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no engine is registered for `language`; callers skip
    /// such languages rather than failing the request.
    pub fn recognize(&self, image: &RgbImage, language: &str) -> OcrResult<Option<Vec<Detection>>> {
        match self.engines.get(language) {
            Some(engine) => engine.recognize(image).map(Some),
            None => Ok(None),
        }
    }
}
