//! The multi-engine arbitration pipeline.
//!
//! A request fans out to one engine per language ([`run_engines`]); the
//! per-language outputs are then either arbitrated, keeping the best-scoring
//! engine ([`select_best`]), or merged region by region ([`merge_runs`]).
//! Both paths end in a reading-ordered [`Selection`].
//!
//! # Main APIs
//!
//! - [`OcrGateway`] - request-level entry point over a warmed-up engine pool

pub mod gateway;
pub mod merge;
pub mod result;
pub mod runner;
pub mod scoring;
pub mod selector;

pub use gateway::{Mode, OcrGateway, RecognitionRequest, split_requested_languages};
pub use merge::{MERGE_IOU_THRESHOLD, MergeOutcome, MergedSet, merge_runs};
pub use result::*;
pub use runner::{EngineRun, run_engines};
pub use scoring::score_detections;
pub use selector::select_best;
