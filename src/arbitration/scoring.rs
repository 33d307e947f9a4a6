//! Quality scoring for a set of recognized lines.

use super::result::Detection;

/// Computes the length-weighted mean confidence of `detections`.
///
/// Each detection contributes its score weighted by its character count, so
/// an engine that recognizes more of the text outranks one that confidently
/// reads only a fragment. Returns `0.0` when there is no text at all, which
/// also ranks an all-empty result below any non-empty one.
pub fn score_detections(detections: &[Detection]) -> f32 {
    let total_chars: usize = detections.iter().map(Detection::char_count).sum();
    if total_chars == 0 {
        return 0.0;
    }

    let weighted: f32 = detections
        .iter()
        .map(|d| d.char_count() as f32 * d.score())
        .sum();
    weighted / total_chars as f32
}
