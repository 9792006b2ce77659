//! Commands into the audio thread and the snapshot it publishes.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::library::{SilentInterval, Track};
use crate::scheduler::TransitionState;

#[derive(Debug)]
pub enum AudioCmd {
    /// Replace the queue and start playing at `start`.
    SetQueue { tracks: Vec<Track>, start: usize },
    Play,
    Pause,
    TogglePause,
    /// Skip to the next track without a crossfade.
    Next,
    /// Go back one track without a crossfade.
    Prev,
    /// Stop both lanes; the queue position is kept.
    Stop,
    /// Crossfade length in seconds; clamped by the scheduler.
    SetCrossfade(f32),
    /// New detection parameters; the queue is analyzed again.
    SetSilenceParams {
        threshold_db: f32,
        min_silence_ms: u64,
    },
    EnableGapKiller(bool),
    /// Analysis result for queue entry `index`, computed under `epoch`.
    Silences {
        epoch: u64,
        index: usize,
        intervals: Vec<SilentInterval>,
    },
    /// Fade out over `fade_out_ms` milliseconds and end the audio thread.
    Quit { fade_out_ms: u64 },
}

/// Runtime playback information shared with the UI.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    /// Queue index of the audible track.
    pub index: Option<usize>,
    pub track: Option<Track>,
    pub queue_len: usize,
    pub elapsed: Duration,
    /// Zero when unknown.
    pub duration: Duration,
    pub playing: bool,
    pub paused: bool,
    pub transition: TransitionState,
    pub crossfade: Duration,
    pub gap_killer: bool,
    /// Set once the last track has finished; cleared by a new queue.
    pub queue_ended: bool,
    /// Set when the audio thread has exited.
    pub shut_down: bool,
}

pub type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
