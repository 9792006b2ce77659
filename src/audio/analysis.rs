//! Silence analysis off the audio thread.
//!
//! Jobs go to a single worker thread; results come back as
//! [`AudioCmd::Silences`] through the audio thread's own command channel, so
//! the scheduler only ever sees them on its control thread.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, trace};

use crate::library::Track;
use crate::silence::{SilenceAnalyzer, SilenceParams, analyze_or_empty};

use super::types::AudioCmd;

#[derive(Debug)]
struct Job {
    generation: u64,
    epoch: u64,
    index: usize,
    path: PathBuf,
    params: SilenceParams,
}

pub struct AnalysisQueue {
    jobs: Sender<Job>,
    /// Bumped on every submit; jobs from older submits are skipped.
    generation: Arc<AtomicU64>,
    _worker: JoinHandle<()>,
}

impl AnalysisQueue {
    pub fn spawn(analyzer: Box<dyn SilenceAnalyzer>, results: Sender<AudioCmd>) -> Self {
        let (jobs, rx) = mpsc::channel::<Job>();
        let generation = Arc::new(AtomicU64::new(0));
        let current = generation.clone();

        let worker = thread::spawn(move || {
            for job in rx {
                if job.generation != current.load(Ordering::Acquire) {
                    trace!(index = job.index, "superseded analysis skipped");
                    continue;
                }
                let intervals = analyze_or_empty(analyzer.as_ref(), &job.path, job.params);
                let sent = results.send(AudioCmd::Silences {
                    epoch: job.epoch,
                    index: job.index,
                    intervals,
                });
                if sent.is_err() {
                    break;
                }
            }
            debug!("analysis worker finished");
        });

        Self {
            jobs,
            generation,
            _worker: worker,
        }
    }

    /// Queue every track for analysis, starting with `first` and wrapping
    /// around. Anything still pending from an earlier submit is dropped.
    pub fn submit(&self, epoch: u64, tracks: &[Track], first: usize, params: SilenceParams) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let len = tracks.len();
        debug!(epoch, len, "queueing silence analysis");
        for offset in 0..len {
            let index = (first + offset) % len;
            let job = Job {
                generation,
                epoch,
                index,
                path: tracks[index].path.clone(),
                params,
            };
            if self.jobs.send(job).is_err() {
                break;
            }
        }
    }
}
