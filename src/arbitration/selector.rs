//! Single-best selection: keep the full output of the highest-scoring engine.

use super::result::Selection;
use super::runner::EngineRun;
use super::scoring::score_detections;
use tracing::debug;

/// Picks the run with the highest quality score.
///
/// A later run replaces the current best only when its score is strictly
/// greater, so exact ties keep the first run seen. Returns
/// [`Selection::none`] when `runs` is empty.
pub fn select_best(runs: Vec<EngineRun>) -> Selection {
    let mut best: Option<(EngineRun, f32)> = None;

    for run in runs {
        let score = score_detections(&run.detections);
        debug!(language = %run.language, score, "Scored engine output");

        let replace = match &best {
            Some((_, best_score)) => score > *best_score,
            None => true,
        };
        if replace {
            best = Some((run, score));
        }
    }

    match best {
        Some((run, score)) => Selection::assemble(Some(run.language), Some(score), run.detections),
        None => Selection::none(),
    }
}
