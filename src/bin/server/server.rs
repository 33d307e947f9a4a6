//! HTTP server for OCR processing.

use crate::config::ServerConfig;
use crate::ocr::{build_gateway, install_thread_pool, ErrorResponse, OcrError, OcrQuery, OcrResponse};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use polyglot_ocr::arbitration::{OcrGateway, RecognitionRequest};
use polyglot_ocr::core::OCRError;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Multipart field carrying the uploaded image
const IMAGE_FIELD: &str = "image";

/// Application state shared across handlers
struct AppState {
    gateway: OcrGateway,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    langs: Vec<String>,
}

/// Run the HTTP server
pub async fn run_server(
    config: ServerConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    install_thread_pool(&config.engines)?;

    // Engines are built and warmed up before the listener accepts traffic
    info!("Initializing engine pool...");
    let engines = config.engines.clone();
    let gateway = tokio::task::spawn_blocking(move || build_gateway(&engines)).await??;
    info!("Engine pool initialized successfully");

    let app = build_router(gateway, config.max_upload_bytes);

    // Parse address
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    info!("Server listening on http://{}", addr);
    info!("Endpoints:");
    info!("  GET  /health     - Health check");
    info!("  POST /ocr        - OCR processing");
    info!("  POST /api/v1/ocr - OCR processing (versioned API)");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Build the application router around a ready gateway
fn build_router(gateway: OcrGateway, max_upload_bytes: usize) -> Router {
    let state = Arc::new(AppState { gateway });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/ocr", post(ocr_handler))
        .route("/api/v1/ocr", post(ocr_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        langs: state.gateway.languages().to_vec(),
    })
}

/// OCR processing endpoint
async fn ocr_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<OcrQuery>,
    mut multipart: Multipart,
) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let request = RecognitionRequest::from_query(query.langs.as_deref(), query.merge);
    info!(
        request_id = %request_id,
        languages = ?request.languages,
        mode = ?request.mode,
        "Processing OCR request"
    );

    let start = Instant::now();

    let bytes = match read_image_field(&mut multipart).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Failed to read upload");
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let gateway = state.gateway.clone();
    let result =
        tokio::task::spawn_blocking(move || gateway.recognize_bytes(&bytes, &request)).await;

    let selection = match result {
        Ok(Ok(selection)) => selection,
        Ok(Err(OCRError::ImageLoad(e))) => {
            error!(request_id = %request_id, error = %e, "Failed to decode image");
            return error_response(StatusCode::BAD_REQUEST, "Could not decode image");
        }
        Ok(Err(e)) => {
            error!(request_id = %request_id, error = %e, "OCR processing failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("OCR processing failed: {}", e),
            );
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "OCR task did not complete");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "OCR task did not complete");
        }
    };

    info!(
        request_id = %request_id,
        lang = ?selection.language,
        score = selection.wire_score(),
        lines = selection.detections.len(),
        total_ms = start.elapsed().as_secs_f64() * 1000.0,
        "OCR completed"
    );

    (StatusCode::OK, Json(OcrResponse::from(selection))).into_response()
}

/// Read the bytes of the `image` field, skipping any other fields
async fn read_image_field(multipart: &mut Multipart) -> Result<Vec<u8>, OcrError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| OcrError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some(IMAGE_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| OcrError::ImageLoad(format!("Failed to read upload: {}", e)))?;
            return Ok(bytes.to_vec());
        }
    }

    Err(OcrError::BadRequest(format!(
        "Missing multipart field '{}'",
        IMAGE_FIELD
    )))
}

fn error_response(status: StatusCode, detail: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(detail))).into_response()
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use image::{ImageFormat, RgbImage};
    use polyglot_ocr::arbitration::Detection;
    use polyglot_ocr::core::{EnginePool, ParallelPolicy};
    use polyglot_ocr::engines::ReplayEngine;
    use polyglot_ocr::processors::Point;
    use serde_json::{json, Value};
    use std::io::Cursor;
    use tower::ServiceExt;

    const BOUNDARY: &str = "polyglot-test-boundary";

    fn quad(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    fn app() -> Router {
        let en = ReplayEngine::new(
            "en",
            vec![Detection::try_new("Hi", 0.8, quad(0.0, 0.0, 10.0, 5.0)).unwrap()],
        );
        let french = ReplayEngine::new(
            "french",
            vec![
                Detection::try_new("Salut", 0.6, quad(0.5, 0.0, 10.5, 5.0)).unwrap(),
                Detection::try_new("monde", 0.9, quad(0.0, 20.0, 30.0, 25.0)).unwrap(),
            ],
        );
        let pool = EnginePool::builder()
            .register("en", en)
            .unwrap()
            .register("french", french)
            .unwrap()
            .build()
            .unwrap();
        build_router(OcrGateway::new(pool, ParallelPolicy::default()), 1024 * 1024)
    }

    fn png_bytes() -> Vec<u8> {
        let mut encoded = Cursor::new(Vec::new());
        RgbImage::new(16, 16)
            .write_to(&mut encoded, ImageFormat::Png)
            .unwrap();
        encoded.into_inner()
    }

    fn multipart_body(field: &str, payload: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"upload.png\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn post_ocr(uri: &str, body: Vec<u8>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_lists_languages() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"ok": true, "langs": ["en", "french"]}));
    }

    #[tokio::test]
    async fn test_single_language_end_to_end() {
        let (status, body) = post_ocr("/ocr?langs=en", multipart_body("image", &png_bytes())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "lang": "en",
                "score": 0.8,
                "text": "Hi",
                "lines": [{
                    "text": "Hi",
                    "score": 0.8,
                    "box": [[0.0, 0.0], [10.0, 0.0], [10.0, 5.0], [0.0, 5.0]]
                }]
            })
        );
    }

    #[tokio::test]
    async fn test_merge_mode_on_versioned_route() {
        let (status, body) =
            post_ocr("/api/v1/ocr?merge=1", multipart_body("image", &png_bytes())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["lang"], "mixed");
        // "Salut" overlaps "Hi" but scores lower, "monde" is a new region.
        assert_eq!(body["text"], "Hi\nmonde");
        assert_eq!(body["lines"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_languages_return_sentinel() {
        let (status, body) =
            post_ocr("/ocr?langs=klingon", multipart_body("image", &png_bytes())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"lang": null, "score": -1.0, "text": "", "lines": []})
        );
    }

    #[tokio::test]
    async fn test_undecodable_image_is_bad_request() {
        let (status, body) = post_ocr("/ocr", multipart_body("image", b"not an image")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Could not decode image");
    }

    #[tokio::test]
    async fn test_missing_image_field_is_bad_request() {
        let (status, body) = post_ocr("/ocr", multipart_body("file", &png_bytes())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().contains("image"));
    }
}
