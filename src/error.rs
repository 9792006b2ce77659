//! Error types for segue.
//!
//! Per-track failures are recovered locally by the scheduler (a track that
//! cannot be loaded is skipped, a track that cannot be analyzed simply has no
//! silences), so these types mostly travel as far as a `warn!` line.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A playback engine could not open or play a source.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
}

/// Silence analysis failed for a source.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to open {} for analysis: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to decode {} for analysis: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },
}
