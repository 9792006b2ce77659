use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::AudioSettings;
use crate::engine::PlaybackEngine;
use crate::scheduler::{CrossfadeScheduler, SchedulerEvent, TransitionState};

use super::analysis::AnalysisQueue;
use super::types::{AudioCmd, PlaybackHandle};

/// Loop timing, taken from `[audio]`.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub poll: Duration,
    /// Wake-up interval while a ramp is running.
    pub fade_step: Duration,
}

impl From<&AudioSettings> for Timing {
    fn from(audio: &AudioSettings) -> Self {
        Self {
            poll: Duration::from_millis(audio.poll_interval_ms),
            fade_step: Duration::from_millis(audio.fade_step_ms),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit(Duration),
}

/// Everything the audio thread owns besides the output stream.
pub struct Driver<E> {
    scheduler: CrossfadeScheduler<E>,
    playback: PlaybackHandle,
    timing: Timing,
    analysis: Option<AnalysisQueue>,
    queue_ended: bool,
}

impl<E: PlaybackEngine> Driver<E> {
    pub fn new(
        scheduler: CrossfadeScheduler<E>,
        playback: PlaybackHandle,
        timing: Timing,
        analysis: Option<AnalysisQueue>,
    ) -> Self {
        Self {
            scheduler,
            playback,
            timing,
            analysis,
            queue_ended: false,
        }
    }

    pub fn scheduler(&self) -> &CrossfadeScheduler<E> {
        &self.scheduler
    }

    #[cfg(test)]
    pub(crate) fn scheduler_mut(&mut self) -> &mut CrossfadeScheduler<E> {
        &mut self.scheduler
    }

    /// Block on `rx` until a quit command arrives or every sender is gone.
    pub fn run(mut self, rx: Receiver<AudioCmd>) {
        self.publish();
        loop {
            let timeout = self.timeout();
            let flow = match rx.recv_timeout(timeout) {
                Ok(cmd) => self.handle(cmd, Instant::now()),
                Err(RecvTimeoutError::Timeout) => Flow::Continue,
                Err(RecvTimeoutError::Disconnected) => Flow::Quit(Duration::ZERO),
            };
            match flow {
                Flow::Continue => self.step(Instant::now()),
                Flow::Quit(fade_out) => {
                    self.finish(fade_out);
                    break;
                }
            }
        }
    }

    fn timeout(&self) -> Duration {
        if self.scheduler.fade_in_flight() {
            self.timing.fade_step
        } else {
            self.timing.poll
        }
    }

    pub fn handle(&mut self, cmd: AudioCmd, now: Instant) -> Flow {
        match cmd {
            AudioCmd::SetQueue { tracks, start } => {
                self.queue_ended = false;
                let epoch = self.scheduler.set_queue(tracks, start);
                self.analyze_queue(epoch);
            }
            AudioCmd::Play => self.scheduler.play(now),
            AudioCmd::Pause => self.scheduler.pause(now),
            AudioCmd::TogglePause => self.scheduler.toggle(now),
            AudioCmd::Next => {
                self.scheduler.next();
            }
            AudioCmd::Prev => {
                self.scheduler.previous();
            }
            AudioCmd::Stop => self.scheduler.stop(),
            AudioCmd::SetCrossfade(seconds) => {
                let applied = self.scheduler.set_crossfade_seconds(seconds);
                info!(?applied, "crossfade set");
            }
            AudioCmd::SetSilenceParams {
                threshold_db,
                min_silence_ms,
            } => {
                self.scheduler.set_silence_params(threshold_db, min_silence_ms);
                let epoch = self.scheduler.epoch();
                self.analyze_queue(epoch);
            }
            AudioCmd::EnableGapKiller(enabled) => self.scheduler.enable_gap_killer(enabled),
            AudioCmd::Silences {
                epoch,
                index,
                intervals,
            } => {
                let count = intervals.len();
                if self.scheduler.apply_silences(epoch, index, intervals) {
                    debug!(index, count, "silences applied");
                }
            }
            AudioCmd::Quit { fade_out_ms } => return Flow::Quit(Duration::from_millis(fade_out_ms)),
        }
        Flow::Continue
    }

    /// Tick the scheduler, log what it did and refresh the shared snapshot.
    pub fn step(&mut self, now: Instant) {
        self.scheduler.tick(now);
        for event in self.scheduler.take_events() {
            match event {
                SchedulerEvent::QueueEnded => {
                    info!("end of queue");
                    self.queue_ended = true;
                }
                SchedulerEvent::TrackFailed { index, reason } => {
                    warn!(index, "track failed: {reason}");
                }
                other => debug!(event = ?other, "scheduler"),
            }
        }
        self.publish();
    }

    fn analyze_queue(&self, epoch: u64) {
        let Some(analysis) = self.analysis.as_ref() else {
            return;
        };
        let queue = self.scheduler.queue();
        if queue.is_empty() {
            return;
        }
        let first = queue.current_index().unwrap_or(0);
        analysis.submit(
            epoch,
            queue.tracks(),
            first,
            self.scheduler.settings().silence,
        );
    }

    /// Fade out and keep ticking until the scheduler has stopped, or give up
    /// shortly after the fade should have ended.
    pub fn finish(&mut self, fade_out: Duration) {
        let start = Instant::now();
        debug!(?fade_out, "audio thread quitting");
        self.scheduler.fade_out(fade_out, start);

        let deadline = start + fade_out + self.timing.fade_step * 2;
        while self.scheduler.state() != TransitionState::Idle && Instant::now() < deadline {
            thread::sleep(self.timing.fade_step);
            self.scheduler.tick(Instant::now());
        }
        self.scheduler.stop();
        self.scheduler.take_events();
        self.publish();
        if let Ok(mut info) = self.playback.lock() {
            info.shut_down = true;
        }
    }

    pub fn publish(&self) {
        let s = &self.scheduler;
        if let Ok(mut info) = self.playback.lock() {
            info.index = s.current_index();
            info.track = s.current_track().cloned();
            info.queue_len = s.queue().len();
            info.elapsed = Duration::from_millis(s.position_ms());
            info.duration = Duration::from_millis(s.duration_ms());
            info.paused = s.is_paused();
            info.playing = s.state() != TransitionState::Idle && !s.is_paused();
            info.transition = s.state();
            info.crossfade = s.settings().crossfade;
            info.gap_killer = s.settings().gap_killer;
            info.queue_ended = self.queue_ended;
        }
    }
}
