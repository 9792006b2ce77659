//! `PlaybackEngine` on top of a `rodio` sink.
//!
//! Each load builds a fresh paused `Sink` on the shared output mixer; the
//! engine object itself lives as long as its lane.

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use rodio::mixer::Mixer;
use rodio::{Decoder, Sink, Source};
use tracing::{debug, warn};

use crate::error::EngineError;

use super::{EngineEvent, PlaybackEngine};

pub struct RodioEngine {
    mixer: Mixer,
    sink: Option<Sink>,
    duration: Option<Duration>,
    volume: f32,
    playing: bool,
    end_reported: bool,
}

impl RodioEngine {
    pub fn new(mixer: Mixer) -> Self {
        Self {
            mixer,
            sink: None,
            duration: None,
            volume: 1.0,
            playing: false,
            end_reported: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> Option<&Sink> {
        self.sink.as_ref()
    }
}

/// Create a paused `Sink` for `source`, returning it with the decoder's
/// reported duration.
fn create_sink(mixer: &Mixer, source: &Path) -> Result<(Sink, Option<Duration>), EngineError> {
    let file = File::open(source).map_err(|e| EngineError::Open {
        path: source.to_path_buf(),
        source: e,
    })?;

    // From a `File` the decoder knows the byte length and may seek, which
    // lets formats without a length header report a duration.
    let decoder = Decoder::try_from(file).map_err(|e| EngineError::Decode {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    let duration = decoder.total_duration();

    let sink = Sink::connect_new(mixer);
    sink.pause();
    sink.append(decoder);
    Ok((sink, duration))
}

impl PlaybackEngine for RodioEngine {
    fn load(&mut self, source: &Path) -> Result<(), EngineError> {
        self.stop();
        let (sink, duration) = create_sink(&self.mixer, source)?;
        sink.set_volume(self.volume);
        debug!(path = %source.display(), ?duration, "sink ready");
        self.sink = Some(sink);
        self.duration = duration;
        Ok(())
    }

    fn play(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
        }
        self.playing = false;
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.duration = None;
        self.playing = false;
        self.end_reported = false;
    }

    fn seek(&mut self, position_ms: u64) {
        if let Some(s) = self.sink.as_ref() {
            if let Err(e) = s.try_seek(Duration::from_millis(position_ms)) {
                warn!(position_ms, "seek failed: {e}");
            }
        }
    }

    fn position_ms(&self) -> u64 {
        self.sink
            .as_ref()
            .map_or(0, |s| s.get_pos().as_millis() as u64)
    }

    fn duration_ms(&self) -> u64 {
        self.duration.map_or(0, |d| d.as_millis() as u64)
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(volume);
        }
    }

    fn is_loaded(&self) -> bool {
        self.sink.is_some()
    }

    fn poll_events(&mut self) -> Vec<EngineEvent> {
        // rodio has no end-of-stream callback; an emptied sink is the signal.
        match self.sink.as_ref() {
            Some(s) if self.playing && !self.end_reported && s.empty() => {
                self.end_reported = true;
                vec![EngineEvent::EndOfMedia]
            }
            _ => Vec::new(),
        }
    }
}
