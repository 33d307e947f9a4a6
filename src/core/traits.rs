//! Traits defining the seams between the gateway and its recognition backends.

use crate::arbitration::Detection;
use crate::core::errors::OcrResult;
use image::RgbImage;
use std::fmt::Debug;

/// Side length of the blank image used to warm an engine up.
pub const WARM_UP_IMAGE_SIZE: u32 = 12;

/// A text-recognition backend bound to one language.
///
/// Implementations are shared across concurrent requests and are only ever
/// read from during recognition.
pub trait RecognitionEngine: Debug + Send + Sync {
    /// Recognizes text in `image`, returning detections in engine order.
    fn recognize(&self, image: &RgbImage) -> OcrResult<Vec<Detection>>;

    /// Runs one throwaway recognition so that lazy initialization inside the
    /// backend happens before the first real request.
    fn warm_up(&self) -> OcrResult<()> {
        let blank = RgbImage::new(WARM_UP_IMAGE_SIZE, WARM_UP_IMAGE_SIZE);
        self.recognize(&blank).map(|_| ())
    }

    /// Name used in logs and error messages.
    fn name(&self) -> &str;
}
