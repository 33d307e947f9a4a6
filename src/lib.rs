//! # polyglot-ocr
//!
//! A gateway that fronts one text-recognition engine per language, routes an
//! image to one or several of them and combines their outputs.
//!
//! Two combination modes are supported:
//!
//! - **Single-best**: every requested engine runs, each output is scored by
//!   its length-weighted confidence and the best engine's output is kept.
//! - **Merge**: the detections of all engines are unioned; regions that
//!   overlap by more than 0.5 IoU are deduplicated, keeping the more
//!   confident recognition.
//!
//! Either way the result is sorted into reading order (top to bottom, then
//! left to right) and its text joined line by line.
//!
//! ## Quick start
//!
//! ```rust
//! use polyglot_ocr::arbitration::{Mode, OcrGateway, RecognitionRequest};
//! use polyglot_ocr::core::{EnginePool, ParallelPolicy};
//! use polyglot_ocr::engines::ReplayEngine;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let en = ReplayEngine::from_json(
//!     "en",
//!     r#"[{"text": "Hi", "score": 0.8, "box": [[0, 0], [10, 0], [10, 5], [0, 5]]}]"#,
//! )?;
//! let pool = EnginePool::builder().register("en", en)?.build()?;
//! let gateway = OcrGateway::new(pool, ParallelPolicy::default());
//!
//! let image = image::RgbImage::new(32, 32);
//! let request = RecognitionRequest::default().with_mode(Mode::SingleBest);
//! let selection = gateway.recognize(&image, &request);
//! assert_eq!(selection.language.as_deref(), Some("en"));
//! assert_eq!(selection.text, "Hi");
//! # Ok(())
//! # }
//! ```

pub mod arbitration;
pub mod core;
pub mod engines;
pub mod processors;
pub mod utils;
