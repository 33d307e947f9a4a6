//! Configuration types for the OCR server and CLI.

use polyglot_ocr::core::GatewayConfig;
use polyglot_ocr::engines::EngineBackend;
use std::path::PathBuf;

/// Configuration for building the engine pool
#[derive(Clone)]
pub struct EngineConfig {
    pub gateway: GatewayConfig,
    pub backend: EngineBackend,
    pub models_dir: PathBuf,
}

/// Configuration for the HTTP server
#[derive(Clone)]
pub struct ServerConfig {
    pub engines: EngineConfig,
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}
