//! Request-level entry point tying the engine pool to the arbitration modes.

use super::merge::merge_runs;
use super::result::Selection;
use super::runner::run_engines;
use super::selector::select_best;
use crate::core::config::ParallelPolicy;
use crate::core::errors::OcrResult;
use crate::core::registry::EnginePool;
use crate::utils::load_image_from_bytes;
use image::RgbImage;
use std::sync::Arc;

/// How the outputs of several engines are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Keep the complete output of the best-scoring engine.
    #[default]
    SingleBest,
    /// Union the detections of every engine.
    Merge,
}

/// Which engines to run and how to combine them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognitionRequest {
    /// Requested language keys; `None` means every configured language.
    pub languages: Option<Vec<String>>,
    pub mode: Mode,
}

impl RecognitionRequest {
    /// Builds a request from the `langs` and `merge` query parameters.
    ///
    /// `langs` is a comma-separated list; an absent or empty string selects
    /// every configured language, while a list of only blank entries selects
    /// none. Any non-zero `merge` selects merge mode.
    pub fn from_query(langs: Option<&str>, merge: Option<i64>) -> Self {
        let languages = langs
            .filter(|list| !list.is_empty())
            .map(split_requested_languages);
        let mode = match merge {
            Some(flag) if flag != 0 => Mode::Merge,
            _ => Mode::SingleBest,
        };
        Self { languages, mode }
    }

    pub fn with_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.languages = Some(languages.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }
}

/// Splits a requested language list, keeping repeated keys.
///
/// Each occurrence of a key runs its engine once more.
pub fn split_requested_languages(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Shared, read-only gateway over a warmed-up engine pool.
#[derive(Debug, Clone)]
pub struct OcrGateway {
    pool: Arc<EnginePool>,
    policy: ParallelPolicy,
}

impl OcrGateway {
    pub fn new(pool: EnginePool, policy: ParallelPolicy) -> Self {
        Self {
            pool: Arc::new(pool),
            policy,
        }
    }

    /// Configured language keys.
    pub fn languages(&self) -> &[String] {
        self.pool.languages()
    }

    /// Runs the requested engines on `image` and combines their output.
    pub fn recognize(&self, image: &RgbImage, request: &RecognitionRequest) -> Selection {
        let languages = request
            .languages
            .as_deref()
            .unwrap_or_else(|| self.pool.languages());
        let runs = run_engines(&self.pool, image, languages, &self.policy);

        match request.mode {
            Mode::SingleBest => select_best(runs),
            Mode::Merge => merge_runs(runs),
        }
    }

    /// Decodes `bytes` and recognizes the resulting image.
    ///
    /// Decoding happens before any engine runs; an undecodable image fails
    /// the whole request.
    pub fn recognize_bytes(&self, bytes: &[u8], request: &RecognitionRequest) -> OcrResult<Selection> {
        let image = load_image_from_bytes(bytes)?;
        Ok(self.recognize(&image, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::OCRError;
    use crate::arbitration::Detection;
    use crate::engines::stub::{StubEngine, detection};
    use crate::processors::Point;

    fn gateway() -> OcrGateway {
        let pool = EnginePool::builder()
            .register("en", StubEngine::lines(&[("hello", 0.9)]))
            .unwrap()
            .register(
                "french",
                StubEngine::new(vec![detection("bonjour", 0.95, (0.0, 0.0, 100.0, 10.0))]),
            )
            .unwrap()
            .build()
            .unwrap();
        OcrGateway::new(pool, ParallelPolicy::default())
    }

    #[test]
    fn test_from_query_defaults() {
        let request = RecognitionRequest::from_query(None, None);
        assert_eq!(request, RecognitionRequest::default());
        assert_eq!(RecognitionRequest::from_query(Some(""), Some(0)).languages, None);
    }

    #[test]
    fn test_from_query_blank_entries_select_no_engine() {
        let request = RecognitionRequest::from_query(Some(" , "), None);
        assert_eq!(request.languages, Some(Vec::new()));

        let selection = gateway().recognize(&RgbImage::new(4, 4), &request);
        assert_eq!(selection, Selection::none());
        assert_eq!(selection.wire_score(), -1.0);
    }

    #[test]
    fn test_from_query_keeps_repeated_languages() {
        let request = RecognitionRequest::from_query(Some("en, en"), Some(1));
        assert_eq!(request.languages, Some(vec!["en".to_string(), "en".to_string()]));
    }

    #[test]
    fn test_repeated_language_runs_once_per_occurrence() {
        // A single-point region has zero area, so no later copy ever overlaps it.
        let dot = Detection::try_new("dot", 0.7, vec![Point::new(3.0, 3.0)]).unwrap();
        let pool = EnginePool::builder()
            .register("en", StubEngine::new(vec![dot]))
            .unwrap()
            .build()
            .unwrap();
        let gateway = OcrGateway::new(pool, ParallelPolicy::default());

        let request = RecognitionRequest::from_query(Some("en,en"), Some(1));
        let selection = gateway.recognize(&RgbImage::new(4, 4), &request);
        assert_eq!(selection.detections.len(), 2);
        assert_eq!(selection.text, "dot\ndot");
    }

    #[test]
    fn test_from_query_merge_flag() {
        assert_eq!(RecognitionRequest::from_query(None, Some(1)).mode, Mode::Merge);
        assert_eq!(RecognitionRequest::from_query(None, Some(2)).mode, Mode::Merge);
        assert_eq!(RecognitionRequest::from_query(None, Some(0)).mode, Mode::SingleBest);
    }

    #[test]
    fn test_from_query_languages() {
        let request = RecognitionRequest::from_query(Some("french, en"), None);
        assert_eq!(request.languages, Some(vec!["french".to_string(), "en".to_string()]));
    }

    #[test]
    fn test_single_best_over_all_configured() {
        let selection = gateway().recognize(&RgbImage::new(4, 4), &RecognitionRequest::default());
        assert_eq!(selection.language.as_deref(), Some("french"));
        assert_eq!(selection.text, "bonjour");
    }

    #[test]
    fn test_restricted_languages() {
        let request = RecognitionRequest::default().with_languages(["en"]);
        let selection = gateway().recognize(&RgbImage::new(4, 4), &request);
        assert_eq!(selection.language.as_deref(), Some("en"));
    }

    #[test]
    fn test_all_requested_languages_unknown() {
        let gateway = gateway();
        let image = RgbImage::new(4, 4);

        let single = RecognitionRequest::default().with_languages(["klingon"]);
        assert_eq!(gateway.recognize(&image, &single), Selection::none());

        let merged = single.with_mode(Mode::Merge);
        let selection = gateway.recognize(&image, &merged);
        assert_eq!(selection.language.as_deref(), Some("mixed"));
        assert_eq!(selection.score, Some(0.0));
    }

    #[test]
    fn test_merge_unions_overlapping_lines() {
        // "hello" (0,0)-(100,10) and "bonjour" cover the same region.
        let request = RecognitionRequest::default().with_mode(Mode::Merge);
        let selection = gateway().recognize(&RgbImage::new(4, 4), &request);
        assert_eq!(selection.detections.len(), 1);
        assert_eq!(selection.text, "bonjour");
    }

    #[test]
    fn test_undecodable_bytes_fail_before_recognition() {
        let err = gateway()
            .recognize_bytes(b"definitely not an image", &RecognitionRequest::default())
            .unwrap_err();
        assert!(matches!(err, OCRError::ImageLoad(_)));
    }
}
