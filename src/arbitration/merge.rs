//! Cross-engine merging of detections.
//!
//! Detections from every engine are folded into one [`MergedSet`]. A new
//! detection is matched against the existing entries in insertion order and
//! the first entry overlapping it by more than [`MERGE_IOU_THRESHOLD`] claims
//! it; the higher-scoring of the two is kept. The first sufficient match wins
//! even when a later entry overlaps more, so the outcome depends on the
//! order engines and detections are fed in.

use super::result::{Detection, MIXED_LANGUAGE, Selection};
use super::runner::EngineRun;
use super::scoring::score_detections;
use tracing::debug;

/// IoU above which two detections are treated as the same region.
pub const MERGE_IOU_THRESHOLD: f32 = 0.5;

/// What happened to a detection offered to a [`MergedSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No entry overlapped; the detection became a new entry.
    Appended,
    /// The entry at this index overlapped and scored lower, so it was replaced.
    Replaced(usize),
    /// The entry at this index overlapped and scored at least as high.
    Kept(usize),
}

/// Order-preserving set of regions, each claimed by one detection.
#[derive(Debug, Clone, Default)]
pub struct MergedSet {
    entries: Vec<Detection>,
}

impl MergedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offers `detection` to the set.
    pub fn insert(&mut self, detection: Detection) -> MergeOutcome {
        let bbox = detection.bounding_box();

        let matched = self
            .entries
            .iter()
            .position(|entry| entry.bounding_box().iou(&bbox) > MERGE_IOU_THRESHOLD);

        match matched {
            Some(index) if detection.score() > self.entries[index].score() => {
                self.entries[index] = detection;
                MergeOutcome::Replaced(index)
            }
            Some(index) => MergeOutcome::Kept(index),
            None => {
                self.entries.push(detection);
                MergeOutcome::Appended
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[Detection] {
        &self.entries
    }

    pub fn into_detections(self) -> Vec<Detection> {
        self.entries
    }
}

/// Unions the detections of all runs into one "mixed" selection.
///
/// Runs are consumed in the given order. The result is sorted for reading
/// and scored with the same length-weighted measure as single engines; with
/// no runs it is an empty selection scoring `0.0`.
pub fn merge_runs(runs: Vec<EngineRun>) -> Selection {
    let mut merged = MergedSet::new();

    for run in runs {
        let offered = run.detections.len();
        let mut appended = 0;
        let mut replaced = 0;
        for detection in run.detections {
            match merged.insert(detection) {
                MergeOutcome::Appended => appended += 1,
                MergeOutcome::Replaced(_) => replaced += 1,
                MergeOutcome::Kept(_) => {}
            }
        }
        debug!(
            language = %run.language,
            offered,
            appended,
            replaced,
            "Merged engine output"
        );
    }

    let detections = merged.into_detections();
    let score = score_detections(&detections);
    Selection::assemble(Some(MIXED_LANGUAGE.to_string()), Some(score), detections)
}
