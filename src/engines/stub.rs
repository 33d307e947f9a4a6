//! In-memory engine used by unit tests.

use crate::arbitration::Detection;
use crate::core::errors::{OCRError, OcrResult};
use crate::core::traits::RecognitionEngine;
use crate::processors::Point;
use image::RgbImage;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Returns an axis-aligned quad from `(x0, y0)` to `(x1, y1)`.
pub(crate) fn quad(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point> {
    vec![
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]
}

/// Builds a detection over an axis-aligned quad.
pub(crate) fn detection(text: &str, score: f32, rect: (f32, f32, f32, f32)) -> Detection {
    Detection::try_new(text, score, quad(rect.0, rect.1, rect.2, rect.3)).unwrap()
}

#[derive(Debug)]
pub(crate) struct StubEngine {
    output: Result<Vec<Detection>, String>,
    // Calls before this index succeed with no detections.
    fail_from_call: usize,
    calls: AtomicUsize,
    last_size: Mutex<Option<(u32, u32)>>,
}

impl StubEngine {
    /// Engine that always returns `detections`.
    pub(crate) fn new(detections: Vec<Detection>) -> Self {
        Self {
            output: Ok(detections),
            fail_from_call: 0,
            calls: AtomicUsize::new(0),
            last_size: Mutex::new(None),
        }
    }

    /// Engine returning one line per entry, stacked 20px apart.
    pub(crate) fn lines(lines: &[(&str, f32)]) -> Self {
        let detections = lines
            .iter()
            .enumerate()
            .map(|(i, (text, score))| {
                let y = i as f32 * 20.0;
                detection(text, *score, (0.0, y, 100.0, y + 10.0))
            })
            .collect();
        Self::new(detections)
    }

    /// Engine that always fails.
    pub(crate) fn failing(message: &str) -> Self {
        Self {
            output: Err(message.to_string()),
            fail_from_call: 0,
            calls: AtomicUsize::new(0),
            last_size: Mutex::new(None),
        }
    }

    /// Engine that survives warm-up and fails on every later call.
    pub(crate) fn failing_after_warm_up(message: &str) -> Self {
        Self {
            fail_from_call: 1,
            ..Self::failing(message)
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_image_size(&self) -> Option<(u32, u32)> {
        *self.last_size.lock().unwrap()
    }
}

impl RecognitionEngine for StubEngine {
    fn recognize(&self, image: &RgbImage) -> OcrResult<Vec<Detection>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_size.lock().unwrap() = Some(image.dimensions());
        if call < self.fail_from_call {
            return Ok(Vec::new());
        }
        match &self.output {
            Ok(detections) => Ok(detections.clone()),
            Err(message) => Err(OCRError::recognition_error(
                "stub",
                "recognize",
                message.clone(),
            )),
        }
    }

    fn name(&self) -> &str {
        "stub"
    }
}
