//! Offline silence analysis for the Gap Killer.
//!
//! Analysis is best-effort enrichment: a track that cannot be analyzed just
//! ends up with no silent intervals.

mod analyzer;
mod detect;

pub use analyzer::{RmsSilenceAnalyzer, SilenceAnalyzer, analyze_or_empty};
pub use detect::{
    MIN_SILENCE_RANGE_MS, SilenceParams, THRESHOLD_RANGE_DB, WINDOW_MS, detect_silence,
};
