//! Utility functions for the OCR gateway.
//!
//! This module provides image loading helpers and logging setup.

pub mod image;

pub use self::image::{load_image_from_bytes, load_image_from_path};

/// Initializes the tracing subscriber for logging.
///
/// The filter is read from `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
