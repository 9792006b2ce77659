use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::Settings;

use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// Handle to the audio thread. Commands are fire-and-forget; state is read
/// back through [`PlaybackHandle`].
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    playback: PlaybackHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new(settings: &Settings) -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let playback_info: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let audio_handle =
            spawn_audio_thread(settings.clone(), rx, tx.clone(), playback_info.clone());

        Self {
            tx,
            playback: playback_info,
            join: Mutex::new(Some(audio_handle)),
        }
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    /// Fade out, then wait for the audio thread to finish.
    pub fn quit_softly(&self, fade_out: Duration) {
        let _ = self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Drop for AudioPlayer {
    /// The silence worker holds a sender into the audio thread's channel, so
    /// the thread never sees a disconnect on its own; tell it to quit.
    fn drop(&mut self) {
        self.quit_softly(Duration::ZERO);
    }
}
