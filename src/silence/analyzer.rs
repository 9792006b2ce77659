use std::fs::File;
use std::path::Path;

use rodio::{Decoder, Source};
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::library::SilentInterval;

use super::detect::{SilenceParams, detect_silence};

pub trait SilenceAnalyzer: Send {
    fn analyze(
        &self,
        source: &Path,
        params: SilenceParams,
    ) -> Result<Vec<SilentInterval>, AnalysisError>;
}

/// Run `analyzer`, turning any failure into "no silences".
pub fn analyze_or_empty(
    analyzer: &dyn SilenceAnalyzer,
    source: &Path,
    params: SilenceParams,
) -> Vec<SilentInterval> {
    match analyzer.analyze(source, params) {
        Ok(found) => {
            debug!(path = %source.display(), intervals = found.len(), "silence analysis done");
            found
        }
        Err(e) => {
            warn!("silence analysis skipped: {e}");
            Vec::new()
        }
    }
}

/// Decodes the whole source with rodio and scans it window by window.
#[derive(Debug, Default, Clone, Copy)]
pub struct RmsSilenceAnalyzer;

impl SilenceAnalyzer for RmsSilenceAnalyzer {
    fn analyze(
        &self,
        source: &Path,
        params: SilenceParams,
    ) -> Result<Vec<SilentInterval>, AnalysisError> {
        let file = File::open(source).map_err(|e| AnalysisError::Open {
            path: source.to_path_buf(),
            source: e,
        })?;
        let decoder = Decoder::try_from(file).map_err(|e| AnalysisError::Decode {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;

        let channels = decoder.channels();
        let sample_rate = decoder.sample_rate();
        Ok(detect_silence(decoder, channels, sample_rate, params))
    }
}
