//! Error handling for the OCR gateway.

mod types;

pub use types::{OCRError, OcrResult};
