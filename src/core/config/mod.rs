//! Configuration management for the OCR gateway.
//!
//! This module provides the startup configuration (served languages) and the
//! parallel processing policy used when a request fans out to several engines.

pub mod gateway;
pub mod parallel;

pub use gateway::{DEFAULT_LANGUAGES, GatewayConfig, LANGUAGES_ENV, parse_languages};
pub use parallel::ParallelPolicy;
