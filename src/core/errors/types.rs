//! Core error types for the OCR gateway.
//!
//! This module defines the error type shared by the engine pool, the
//! recognition backends and the arbitration pipeline.

use thiserror::Error;

/// Convenient result alias used across the crate.
pub type OcrResult<T> = Result<T, OCRError>;

/// Enum representing the errors that can occur in the gateway.
///
/// Decoding, configuration and backend failures all surface through this type.
/// Per-language recognition failures are reported with [`OCRError::Recognition`]
/// so that callers can tell which engine produced them.
#[derive(Error, Debug)]
pub enum OCRError {
    /// Error occurred while decoding or loading an image.
    #[error("image load")]
    ImageLoad(#[source] image::ImageError),

    /// Error occurred inside a recognition engine.
    #[error("recognition failed in engine '{engine}': {context}")]
    Recognition {
        /// The name of the engine that failed.
        engine: String,
        /// Additional context about the failure.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),

    /// Error reading or writing JSON.
    #[error("json")]
    Json(#[from] serde_json::Error),
}

impl From<image::ImageError> for OCRError {
    /// Converts an image::ImageError to OCRError::ImageLoad.
    fn from(error: image::ImageError) -> Self {
        Self::ImageLoad(error)
    }
}

impl OCRError {
    /// Creates a configuration error with context and details.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use polyglot_ocr::core::errors::OCRError;
    /// let err = OCRError::config_error_detailed(
    ///     "engine pool",
    ///     "language 'en' registered twice"
    /// );
    /// assert!(matches!(err, OCRError::ConfigError { .. }));
    /// ```
    pub fn config_error_detailed(context: impl Into<String>, details: impl Into<String>) -> Self {
        Self::ConfigError {
            message: format!("{}: {}", context.into(), details.into()),
        }
    }

    /// Creates a configuration error for invalid field values.
    pub fn invalid_field(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::ConfigError {
            message: format!(
                "invalid value for field '{}': expected {}, got {}",
                field.into(),
                expected.into(),
                actual.into()
            ),
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Wraps an error raised by a recognition engine.
    pub fn recognition_error(
        engine: impl Into<String>,
        context: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Recognition {
            engine: engine.into(),
            context: context.into(),
            source: source.into(),
        }
    }
}
