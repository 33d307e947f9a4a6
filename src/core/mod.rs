//! The core module of the OCR gateway.
//!
//! This module contains the fundamental components shared by the arbitration
//! pipeline and the recognition backends:
//! - Configuration management
//! - Error handling
//! - The engine trait and the language-keyed engine registry

pub mod config;
pub mod errors;
pub mod registry;
pub mod traits;

pub use config::{GatewayConfig, ParallelPolicy};
pub use errors::{OCRError, OcrResult};
pub use registry::{EnginePool, EnginePoolBuilder, SharedEngine};
pub use traits::RecognitionEngine;
