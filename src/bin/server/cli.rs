//! CLI mode for OCR processing.

use crate::config::EngineConfig;
use crate::ocr::{build_gateway, download_bytes, install_thread_pool, OcrError, OcrResponse};
use polyglot_ocr::arbitration::{OcrGateway, RecognitionRequest, Selection};
use polyglot_ocr::utils::{load_image_from_bytes, load_image_from_path};
use image::RgbImage;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Process an image downloaded from a URL
pub async fn process_url(
    url: &str,
    config: &EngineConfig,
    request: &RecognitionRequest,
    output_format: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let start = Instant::now();

    info!("Downloading image from URL...");
    let bytes = download_bytes(url).await?;
    info!(
        "Downloaded {} bytes in {:.2}ms",
        bytes.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    let image =
        load_image_from_bytes(&bytes).map_err(|e| OcrError::ImageLoad(e.to_string()))?;
    process_image(&image, config, request, output_format)?;

    Ok(())
}

/// Process a local image file
pub fn process_file(
    path: &Path,
    config: &EngineConfig,
    request: &RecognitionRequest,
    output_format: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Loading image from file...");
    let image = load_image_from_path(path).map_err(|e| OcrError::ImageLoad(e.to_string()))?;
    process_image(&image, config, request, output_format)?;

    Ok(())
}

fn process_image(
    image: &RgbImage,
    config: &EngineConfig,
    request: &RecognitionRequest,
    output_format: &str,
) -> Result<(), OcrError> {
    let gateway = prepare_gateway(config)?;

    info!("Processing image ({}x{})...", image.width(), image.height());
    let ocr_start = Instant::now();
    let selection = gateway.recognize(image, request);
    let processing_time = ocr_start.elapsed();
    info!("OCR completed in {:.2}ms", processing_time.as_secs_f64() * 1000.0);

    output_result(selection, output_format, processing_time.as_secs_f64() * 1000.0)
}

/// Apply the thread settings, then build and warm up the engines
fn prepare_gateway(config: &EngineConfig) -> Result<OcrGateway, OcrError> {
    install_thread_pool(config)?;
    info!("Initializing engine pool...");
    build_gateway(config)
}

/// Output the OCR result in the specified format
fn output_result(
    selection: Selection,
    format: &str,
    processing_time_ms: f64,
) -> Result<(), OcrError> {
    match format {
        "json" => {
            let response = OcrResponse::from(selection);
            let json = serde_json::to_string(&response)?;
            println!("{}", json);
        }
        "text" => {
            println!("{}", selection.text);
        }
        _ => {
            println!("\n=== OCR Results ===");
            println!("Processing time: {:.2}ms", processing_time_ms);
            print!("{}", selection);
            println!();

            if selection.detections.is_empty() {
                println!("No text detected.");
            } else {
                println!("--- Full Text ---");
                println!("{}", selection.text);
            }
        }
    }

    Ok(())
}
