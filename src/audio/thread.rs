use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use rodio::OutputStreamBuilder;
use tracing::{error, info};

use crate::config::Settings;
use crate::engine::RodioEngine;
use crate::scheduler::{CrossfadeScheduler, SchedulerSettings};
use crate::silence::RmsSilenceAnalyzer;

use super::analysis::AnalysisQueue;
use super::driver::{Driver, Timing};
use super::types::{AudioCmd, PlaybackHandle};

/// Open the default output device and run the scheduler on a dedicated
/// thread until it is told to quit.
///
/// `results` is a sender into the thread's own command channel; the silence
/// worker posts its results through it.
pub(super) fn spawn_audio_thread(
    settings: Settings,
    rx: Receiver<AudioCmd>,
    results: Sender<AudioCmd>,
    playback_info: PlaybackHandle,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                error!("no audio output device: {e}");
                if let Ok(mut info) = playback_info.lock() {
                    info.shut_down = true;
                }
                return;
            }
        };
        // rodio logs to stderr when the stream is dropped, which would land
        // on top of the status line.
        stream.log_on_drop(false);

        let mixer = stream.mixer().clone();
        let scheduler = CrossfadeScheduler::new(
            RodioEngine::new(mixer.clone()),
            RodioEngine::new(mixer),
            SchedulerSettings::from(&settings),
        );

        let analysis = settings
            .gap_killer
            .analyze_on_load
            .then(|| AnalysisQueue::spawn(Box::new(RmsSilenceAnalyzer), results));

        info!("audio thread started");
        Driver::new(
            scheduler,
            playback_info,
            Timing::from(&settings.audio),
            analysis,
        )
        .run(rx);
        info!("audio thread stopped");
    })
}
