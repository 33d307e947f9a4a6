//! Result types for the arbitration pipeline.
//!
//! [`Detection`] is the unit every engine produces and every stage consumes.
//! [`Selection`] is the unified output of both the single-best and the merge
//! modes. The reading-order helpers in this module are the final step of
//! either mode.

use crate::core::errors::{OCRError, OcrResult};
use crate::processors::{BoundingBox, Point};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Language label reported for merged results.
pub const MIXED_LANGUAGE: &str = "mixed";

/// Score reported on the wire when no engine produced a result.
pub const NO_RESULT_SCORE: f32 = -1.0;

/// A single recognized text region.
///
/// The polygon is kept exactly as the engine emitted it: usually four
/// corners, neither axis-aligned nor in a canonical winding order. It is
/// never empty, which both [`Detection::try_new`] and deserialization enforce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDetection")]
pub struct Detection {
    text: String,
    score: f32,
    #[serde(rename = "box")]
    polygon: Vec<Point>,
}

#[derive(Deserialize)]
struct RawDetection {
    text: String,
    score: f32,
    #[serde(rename = "box")]
    polygon: Vec<Point>,
}

impl TryFrom<RawDetection> for Detection {
    type Error = OCRError;

    fn try_from(raw: RawDetection) -> Result<Self, Self::Error> {
        Detection::try_new(raw.text, raw.score, raw.polygon)
    }
}

impl Detection {
    /// Creates a detection, rejecting an empty polygon.
    pub fn try_new(text: impl Into<String>, score: f32, polygon: Vec<Point>) -> OcrResult<Self> {
        if polygon.is_empty() {
            return Err(OCRError::invalid_input("detection box must have at least one point"));
        }
        Ok(Self {
            text: text.into(),
            score,
            polygon,
        })
    }

    /// The recognized text, possibly empty.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The recognition confidence.
    pub fn score(&self) -> f32 {
        self.score
    }

    /// The polygon corners in engine order.
    pub fn polygon(&self) -> &[Point] {
        &self.polygon
    }

    /// Number of characters in the recognized text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Axis-aligned bounds of the polygon.
    pub fn bounding_box(&self) -> BoundingBox {
        // Construction guarantees at least one point.
        debug_assert!(!self.polygon.is_empty());
        BoundingBox::from_points(&self.polygon)
            .unwrap_or_else(|| BoundingBox::from_coords(0.0, 0.0, 0.0, 0.0))
    }
}

/// Compares two detections by reading order: top edge first, then left edge.
pub fn reading_order(a: &Detection, b: &Detection) -> Ordering {
    let a_box = a.bounding_box();
    let b_box = b.bounding_box();

    // Total order, so NaN coordinates sort last instead of breaking the sort.
    a_box
        .y_min
        .total_cmp(&b_box.y_min)
        .then_with(|| a_box.x_min.total_cmp(&b_box.x_min))
}

/// Sorts detections top-to-bottom, then left-to-right.
///
/// The sort is stable, so detections with identical keys keep their
/// relative order.
pub fn sort_reading_order(detections: &mut [Detection]) {
    detections.sort_by(reading_order);
}

/// Joins the text of each detection with a single newline.
pub fn concatenated_text(detections: &[Detection]) -> String {
    detections.iter().map(Detection::text).join("\n")
}

/// Output of an arbitration run.
///
/// `language` is the winning engine in single-best mode, [`MIXED_LANGUAGE`]
/// in merge mode, and `None` when no engine ran. `score` is `None` only in
/// that last case.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub language: Option<String>,
    pub score: Option<f32>,
    pub detections: Vec<Detection>,
    pub text: String,
}

impl Selection {
    /// Result of a single-best run in which no requested engine was available.
    pub fn none() -> Self {
        Self {
            language: None,
            score: None,
            detections: Vec::new(),
            text: String::new(),
        }
    }

    /// Orders `detections` for reading and assembles the final result.
    pub fn assemble(
        language: Option<String>,
        score: Option<f32>,
        mut detections: Vec<Detection>,
    ) -> Self {
        sort_reading_order(&mut detections);
        let text = concatenated_text(&detections);
        Self {
            language,
            score,
            detections,
            text,
        }
    }

    /// Returns true if no engine contributed to this result.
    pub fn is_empty_run(&self) -> bool {
        self.score.is_none()
    }

    /// Score as exchanged with clients, where "no engine ran" is `-1.0`.
    pub fn wire_score(&self) -> f32 {
        self.score.unwrap_or(NO_RESULT_SCORE)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.language, self.score) {
            (Some(language), Some(score)) => {
                writeln!(f, "Language: {language} (score: {score:.3})")?
            }
            _ => writeln!(f, "Language: none (no engine available)")?,
        }
        writeln!(f, "Text regions: {}", self.detections.len())?;

        for (index, detection) in self.detections.iter().enumerate() {
            let bbox = detection.bounding_box();
            writeln!(
                f,
                "  [{}] '{}' (confidence: {:.3}) at [{:.0}, {:.0}] - [{:.0}, {:.0}]",
                index + 1,
                detection.text(),
                detection.score(),
                bbox.x_min,
                bbox.y_min,
                bbox.x_max,
                bbox.y_max
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &str, x: f32, y: f32) -> Detection {
        Detection::try_new(
            text,
            0.9,
            vec![
                Point::new(x, y),
                Point::new(x + 10.0, y),
                Point::new(x + 10.0, y + 5.0),
                Point::new(x, y + 5.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_sort_reading_order_top_then_left() {
        let mut detections = vec![at("c", 5.0, 50.0), at("b", 20.0, 10.0), at("a", 5.0, 10.0)];
        sort_reading_order(&mut detections);
        let texts: Vec<_> = detections.iter().map(Detection::text).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn test_sort_reading_order_is_stable_for_equal_keys() {
        let mut detections = vec![at("first", 5.0, 10.0), at("second", 5.0, 10.0)];
        sort_reading_order(&mut detections);
        assert_eq!(detections[0].text(), "first");
        assert_eq!(detections[1].text(), "second");
    }

    #[test]
    fn test_sort_uses_minimum_over_all_corners() {
        // Rotated box whose first corner is not the top-left one.
        let rotated = Detection::try_new(
            "rotated",
            0.5,
            vec![
                Point::new(30.0, 12.0),
                Point::new(40.0, 3.0),
                Point::new(50.0, 12.0),
                Point::new(40.0, 20.0),
            ],
        )
        .unwrap();
        let mut detections = vec![at("flat", 0.0, 5.0), rotated];
        sort_reading_order(&mut detections);
        assert_eq!(detections[0].text(), "rotated");
    }

    #[test]
    fn test_sort_reading_order_with_nan_coordinates() {
        let nan = Detection::try_new("nan", 0.5, vec![Point::new(f32::NAN, f32::NAN)]).unwrap();
        let mut detections = vec![
            at("c", 0.0, 30.0),
            nan.clone(),
            at("a", 0.0, 10.0),
            nan,
            at("b", 0.0, 20.0),
        ];
        sort_reading_order(&mut detections);
        let texts: Vec<_> = detections.iter().map(Detection::text).collect();
        assert_eq!(texts, ["a", "b", "c", "nan", "nan"]);
    }

    #[test]
    fn test_concatenated_text_keeps_empty_lines() {
        let detections = vec![at("one", 0.0, 0.0), at("", 0.0, 10.0), at("three", 0.0, 20.0)];
        assert_eq!(concatenated_text(&detections), "one\n\nthree");
        assert_eq!(concatenated_text(&[]), "");
    }

    #[test]
    fn test_empty_polygon_is_rejected() {
        assert!(Detection::try_new("x", 1.0, Vec::new()).is_err());
        let parsed: Result<Detection, _> =
            serde_json::from_str(r#"{"text": "x", "score": 1.0, "box": []}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_detection_wire_format() {
        let detection = Detection::try_new(
            "Hi",
            0.8,
            vec![
                Point::new(0.0, 0.0),
                Point::new(10.0, 0.0),
                Point::new(10.0, 5.0),
                Point::new(0.0, 5.0),
            ],
        )
        .unwrap();
        let value = serde_json::to_value(&detection).unwrap();
        assert_eq!(value["text"], "Hi");
        assert_eq!(value["box"][2], serde_json::json!([10.0, 5.0]));

        let back: Detection = serde_json::from_value(value).unwrap();
        assert_eq!(back, detection);
    }

    #[test]
    fn test_wire_score_of_empty_run() {
        let none = Selection::none();
        assert!(none.is_empty_run());
        assert_eq!(none.wire_score(), -1.0);
        assert_eq!(none.text, "");
    }

    #[test]
    fn test_char_count_counts_scalars() {
        assert_eq!(at("مرحبا", 0.0, 0.0).char_count(), 5);
        assert_eq!(at("héllo", 0.0, 0.0).char_count(), 5);
    }
}
