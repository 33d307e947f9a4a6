//! Per-language fan-out over the engine pool.

use super::result::Detection;
use crate::core::config::ParallelPolicy;
use crate::core::registry::EnginePool;
use image::RgbImage;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, warn};

/// Detections produced by one engine for one request.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRun {
    pub language: String,
    pub detections: Vec<Detection>,
}

/// Runs the engine of every requested language on `image`.
///
/// Languages without an engine are skipped. An engine that fails is skipped
/// as well, after logging a warning; there are no retries. The returned runs
/// are in request order whether or not the engines ran concurrently, since
/// the merge step depends on that order.
pub fn run_engines(
    pool: &EnginePool,
    image: &RgbImage,
    languages: &[String],
    policy: &ParallelPolicy,
) -> Vec<EngineRun> {
    let available: Vec<&String> = languages
        .iter()
        .filter(|language| {
            let present = pool.contains(language);
            if !present {
                debug!(language = %language, "No engine for requested language, skipping");
            }
            present
        })
        .collect();

    let run_one = |language: &&String| run_engine(pool, image, language);

    let runs: Vec<Option<EngineRun>> = if policy.parallel_languages && available.len() > 1 {
        available.par_iter().map(run_one).collect()
    } else {
        available.iter().map(run_one).collect()
    };

    runs.into_iter().flatten().collect()
}

fn run_engine(pool: &EnginePool, image: &RgbImage, language: &str) -> Option<EngineRun> {
    let start = Instant::now();
    match pool.recognize(image, language) {
        Ok(Some(detections)) => {
            debug!(
                language = %language,
                detections = detections.len(),
                elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Engine finished"
            );
            Some(EngineRun {
                language: language.to_string(),
                detections,
            })
        }
        Ok(None) => None,
        Err(e) => {
            warn!(language = %language, error = %e, "Engine failed, skipping its contribution");
            None
        }
    }
}
