use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::engine::{EngineEvent, LaneId, PlaybackEngine};
use crate::fade::{FadeController, FadeCurve, Scheduled};
use crate::library::{Queue, SilentInterval, Track};
use crate::silence::SilenceParams;

use super::lanes::LanePair;
use super::state::{
    FadeRole, FadeTag, SchedulerEvent, SchedulerSettings, TransitionState, crossfade_from_seconds,
};

/// Owns both lanes, the fade controller and the queue, and decides when
/// tracks change.
///
/// Nothing in here blocks or keeps time on its own: the owner calls
/// [`tick`](Self::tick) periodically and forwards user commands. Every
/// callback is checked against the queue epoch it was scheduled under, so
/// work left over from a replaced queue is dropped.
#[derive(Debug)]
pub struct CrossfadeScheduler<E> {
    lanes: LanePair<E>,
    fades: FadeController<FadeTag>,
    queue: Queue,
    state: TransitionState,
    paused: bool,
    /// An exit fade is running; the scheduler stops when it completes.
    exiting: bool,
    epoch: u64,
    settings: SchedulerSettings,
    /// Next track whose preload failed during this transition.
    failed_preload: Option<usize>,
    events: Vec<SchedulerEvent>,
}

impl<E: PlaybackEngine> CrossfadeScheduler<E> {
    pub fn new(lane_a: E, lane_b: E, settings: SchedulerSettings) -> Self {
        Self {
            lanes: LanePair::new(lane_a, lane_b),
            fades: FadeController::new(settings.curve),
            queue: Queue::default(),
            state: TransitionState::Idle,
            paused: false,
            exiting: false,
            epoch: 0,
            settings,
            failed_preload: None,
            events: Vec::new(),
        }
    }

    /// Replace the queue and start playing `tracks[start_index]`.
    ///
    /// This is a hard reset: ramps are cancelled, both lanes stopped, lane A
    /// becomes active and the epoch moves on. Returns the new epoch.
    pub fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) -> u64 {
        self.fades.cancel_all();
        self.lanes.stop_all();
        self.lanes.reset_roles();
        self.lanes.settle_volumes();
        self.epoch += 1;
        self.failed_preload = None;
        self.exiting = false;
        self.paused = false;
        self.queue = Queue::new(tracks, start_index);
        self.state = TransitionState::Idle;
        debug!(epoch = self.epoch, len = self.queue.len(), "queue replaced");

        if let Some(start) = self.queue.current_index() {
            self.start_at(start);
        }
        self.epoch
    }

    /// Resume after a pause, or restart the current track when idle.
    pub fn play(&mut self, now: Instant) {
        if self.state == TransitionState::Idle {
            if let Some(index) = self.queue.current_index() {
                self.state = TransitionState::Advancing;
                self.start_at(index);
            }
            return;
        }
        if !self.paused {
            return;
        }
        self.paused = false;
        for id in self.lanes.loaded() {
            self.lanes.lane_mut(id).engine_mut().play();
        }
        self.fades.resume(now);
        debug!(state = %self.state, "resumed");
    }

    pub fn pause(&mut self, now: Instant) {
        if self.state == TransitionState::Idle || self.paused {
            return;
        }
        self.paused = true;
        for id in self.lanes.loaded() {
            self.lanes.lane_mut(id).engine_mut().pause();
        }
        self.fades.suspend(now);
        debug!(state = %self.state, "paused");
    }

    pub fn toggle(&mut self, now: Instant) {
        if self.paused || self.state == TransitionState::Idle {
            self.play(now);
        } else {
            self.pause(now);
        }
    }

    /// Stop both lanes and go idle; the queue position is kept.
    pub fn stop(&mut self) {
        self.fades.cancel_all();
        self.lanes.stop_all();
        self.lanes.settle_volumes();
        self.failed_preload = None;
        self.exiting = false;
        self.paused = false;
        if self.state != TransitionState::Idle {
            debug!("stopped");
        }
        self.state = TransitionState::Idle;
    }

    /// Ramp the audible lane down to silence over `duration`, then stop.
    pub fn fade_out(&mut self, duration: Duration, now: Instant) {
        if self.state == TransitionState::Idle {
            return;
        }
        if self.paused {
            self.stop();
            return;
        }

        self.fades.cancel_all();
        if self.state == TransitionState::Fading {
            // Keep whichever side of the crossfade is louder.
            let active = self.lanes.active_id();
            let standby = self.lanes.standby_id();
            if self.lanes.lane(standby).volume() > self.lanes.lane(active).volume() {
                self.lanes.stop(active);
                self.lanes.swap_roles();
                if let Some(index) = self.lanes.active().track() {
                    self.queue.set_current(index);
                }
            } else {
                self.lanes.stop(standby);
            }
            self.state = TransitionState::Playing;
        }

        self.exiting = true;
        let lane = self.lanes.active_id();
        let from = self.lanes.lane(lane).volume();
        debug!(%lane, ?duration, "exit fade");
        let tag = self.tag(FadeRole::Exit);
        self.ramp(lane, from, 0.0, duration, now, tag);
    }

    /// Jump to the next track without a crossfade. No-op at the last track.
    pub fn next(&mut self) -> bool {
        match self.queue.next_index() {
            Some(index) => {
                self.jump_to(index);
                true
            }
            None => {
                debug!("next: already at the last track");
                false
            }
        }
    }

    /// Jump to the previous track without a crossfade. No-op at the first
    /// track.
    pub fn previous(&mut self) -> bool {
        match self.queue.prev_index() {
            Some(index) => {
                self.jump_to(index);
                true
            }
            None => {
                debug!("previous: already at the first track");
                false
            }
        }
    }

    /// Applies to the next crossfade; a running one keeps its length.
    pub fn set_crossfade_seconds(&mut self, seconds: f32) -> Duration {
        self.settings.crossfade = crossfade_from_seconds(seconds);
        debug!(crossfade = ?self.settings.crossfade, "crossfade changed");
        self.settings.crossfade
    }

    /// Store clamped detection parameters. Existing silence lists are left
    /// alone; the owner re-analyzes the queue if it wants them refreshed.
    pub fn set_silence_params(&mut self, threshold_db: f32, min_silence_ms: u64) -> SilenceParams {
        self.settings.silence = SilenceParams {
            threshold_db,
            min_silence_ms,
        }
        .clamped();
        debug!(params = ?self.settings.silence, "silence params changed");
        self.settings.silence
    }

    pub fn enable_gap_killer(&mut self, enabled: bool) {
        self.settings.gap_killer = enabled;
        for id in LaneId::ALL {
            self.lanes.lane_mut(id).set_skip_latch(None);
        }
        debug!(enabled, "gap killer toggled");
    }

    pub fn set_fade_curve(&mut self, curve: FadeCurve) {
        self.settings.curve = curve;
        self.fades.set_curve(curve);
    }

    /// Annotate queue entry `index` with silent intervals computed under
    /// `epoch`. Results for a replaced queue are dropped.
    pub fn apply_silences(
        &mut self,
        epoch: u64,
        index: usize,
        intervals: Vec<SilentInterval>,
    ) -> bool {
        if epoch != self.epoch {
            debug!(epoch, current = self.epoch, index, "stale silence analysis dropped");
            return false;
        }
        let Some(track) = self.queue.get(index) else {
            debug!(index, "silence analysis for an index outside the queue");
            return false;
        };
        let annotated = track.clone().with_silences(intervals);
        if !self.queue.replace(index, annotated) {
            return false;
        }
        for id in LaneId::ALL {
            if self.lanes.lane(id).track() == Some(index) {
                self.lanes.lane_mut(id).set_skip_latch(None);
            }
        }
        true
    }

    /// One control-loop step: drain engine events, move ramps along and
    /// deliver their completions, then look at each loaded lane's position.
    pub fn tick(&mut self, now: Instant) {
        for id in LaneId::ALL {
            let events = self.lanes.lane_mut(id).engine_mut().poll_events();
            for event in events {
                self.handle_engine_event(id, event, now);
            }
        }

        for (lane, tag) in self.fades.advance(&mut self.lanes, now) {
            self.on_fade_complete(lane, tag);
        }

        if self.state == TransitionState::Idle || self.paused {
            return;
        }
        for id in self.lanes.loaded() {
            // Handling the active lane may have unloaded the other one.
            if self.lanes.lane(id).track().is_none() {
                continue;
            }
            let position = self.lanes.lane(id).engine().position_ms();
            self.on_position(id, position, now);
        }
    }

    pub fn handle_engine_event(&mut self, lane: LaneId, event: EngineEvent, now: Instant) {
        match event {
            EngineEvent::PositionChanged(position) => self.on_position(lane, position, now),
            EngineEvent::EndOfMedia => self.on_end_of_media(lane),
            EngineEvent::Error(reason) => self.on_engine_error(lane, reason),
        }
    }

    /// Silence check first, then the crossfade trigger.
    pub fn on_position(&mut self, lane: LaneId, position_ms: u64, now: Instant) {
        if self.state == TransitionState::Idle || self.paused {
            return;
        }
        let is_active = lane == self.lanes.active_id();
        if !is_active && self.state != TransitionState::Fading {
            return;
        }
        let Some(index) = self.lanes.lane(lane).track() else {
            return;
        };

        let position = if self.settings.gap_killer {
            self.skip_silence(lane, index, position_ms)
        } else {
            position_ms
        };
        if is_active {
            self.maybe_begin_crossfade(index, position, now);
        }
    }

    pub fn on_fade_complete(&mut self, lane: LaneId, tag: FadeTag) {
        if tag.epoch != self.epoch {
            debug!(%lane, ?tag, current = self.epoch, "stale fade completion dropped");
            return;
        }
        match tag.role {
            FadeRole::In => {
                let current = self.state == TransitionState::Fading
                    && lane == self.lanes.standby_id()
                    && self.queue.current_index() == Some(tag.from_index);
                if current {
                    self.finish_transition();
                } else {
                    debug!(%lane, ?tag, state = %self.state, "fade-in completion no longer applies");
                }
            }
            // The outgoing lane is stopped when the fade-in lands.
            FadeRole::Out => {}
            FadeRole::Exit => {
                if self.exiting {
                    debug!("exit fade done");
                    self.stop();
                }
            }
        }
    }

    pub fn take_events(&mut self) -> Vec<SchedulerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.queue.current()
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    pub fn active_lane(&self) -> LaneId {
        self.lanes.active_id()
    }

    pub fn lane_volume(&self, lane: LaneId) -> f32 {
        self.lanes.lane(lane).volume()
    }

    pub fn engine(&self, lane: LaneId) -> &E {
        self.lanes.lane(lane).engine()
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self, lane: LaneId) -> &mut E {
        self.lanes.lane_mut(lane).engine_mut()
    }

    pub fn fade_in_flight(&self) -> bool {
        self.fades.in_flight()
    }

    /// Position of the active lane, zero when nothing is loaded.
    pub fn position_ms(&self) -> u64 {
        let active = self.lanes.active();
        if active.track().is_some() {
            active.engine().position_ms()
        } else {
            0
        }
    }

    /// Duration of the active lane's track; the track record fills in when
    /// the engine does not know.
    pub fn duration_ms(&self) -> u64 {
        let active = self.lanes.active();
        let Some(index) = active.track() else {
            return 0;
        };
        match active.engine().duration_ms() {
            0 => self.queue.get(index).map_or(0, Track::duration_ms),
            d => d,
        }
    }

    fn tag(&self, role: FadeRole) -> FadeTag {
        FadeTag {
            epoch: self.epoch,
            from_index: self.queue.current_index().unwrap_or(0),
            role,
        }
    }

    fn ramp(
        &mut self,
        lane: LaneId,
        from: f32,
        to: f32,
        duration: Duration,
        now: Instant,
        tag: FadeTag,
    ) {
        let scheduled = self
            .fades
            .schedule(&mut self.lanes, lane, from, to, duration, now, tag);
        if let Scheduled::Completed(tag) = scheduled {
            self.on_fade_complete(lane, tag);
        }
    }

    /// Load `index` into the active lane and play it. A source that fails to
    /// load is reported and the following one is tried; running off the end
    /// leaves the scheduler idle.
    fn start_at(&mut self, mut index: usize) {
        let lane = self.lanes.active_id();
        self.paused = false;
        while index < self.queue.len() {
            self.queue.set_current(index);
            let Some(path) = self.queue.get(index).map(|t| t.path.clone()) else {
                break;
            };
            match self.lanes.load(lane, index, &path) {
                Ok(()) => {
                    self.lanes.settle_volumes();
                    self.lanes.lane_mut(lane).engine_mut().play();
                    self.state = TransitionState::Playing;
                    info!(index, %lane, path = %path.display(), "track started");
                    self.events.push(SchedulerEvent::TrackStarted { index, lane });
                    return;
                }
                Err(e) => {
                    warn!(index, "skipping track: {e}");
                    self.events.push(SchedulerEvent::TrackFailed {
                        index,
                        reason: e.to_string(),
                    });
                    index += 1;
                }
            }
        }
        self.end_of_queue();
    }

    fn jump_to(&mut self, index: usize) {
        self.fades.cancel_all();
        self.lanes.stop_all();
        self.lanes.swap_roles();
        self.failed_preload = None;
        self.exiting = false;
        self.state = TransitionState::Advancing;
        debug!(index, "jumping");
        self.start_at(index);
    }

    fn end_of_queue(&mut self) {
        self.fades.cancel_all();
        self.lanes.stop_all();
        self.lanes.settle_volumes();
        self.failed_preload = None;
        self.exiting = false;
        self.paused = false;
        self.state = TransitionState::Idle;
        info!(index = ?self.queue.current_index(), "queue finished");
        self.events.push(SchedulerEvent::QueueEnded);
    }

    /// The active track ended with no crossfade running.
    fn advance_after_end(&mut self) {
        let next = self.queue.next_index().map(|next| {
            // A source that already failed to preload is not tried again.
            if self.failed_preload == Some(next) {
                next + 1
            } else {
                next
            }
        });
        match next {
            Some(index) if index < self.queue.len() => self.jump_to(index),
            _ => self.end_of_queue(),
        }
    }

    fn skip_silence(&mut self, lane: LaneId, index: usize, position_ms: u64) -> u64 {
        let hit = self
            .queue
            .get(index)
            .and_then(|track| track.silence_at(position_ms));
        let epsilon = self.settings.skip_epsilon_ms;
        let slot = self.lanes.lane_mut(lane);

        let Some((interval_index, interval)) = hit else {
            slot.set_skip_latch(None);
            return position_ms;
        };
        if slot.skip_latch() == Some(interval_index) {
            return position_ms;
        }

        let target = interval.end_ms + epsilon;
        slot.set_skip_latch(Some(interval_index));
        slot.engine_mut().seek(target);
        debug!(%lane, index, from = position_ms, to = target, "silence skipped");
        self.events.push(SchedulerEvent::SilenceSkipped {
            index,
            lane,
            from_ms: position_ms,
            to_ms: target,
        });
        target
    }

    fn maybe_begin_crossfade(&mut self, index: usize, position_ms: u64, now: Instant) {
        if self.state != TransitionState::Playing || self.exiting {
            return;
        }
        let crossfade = self.settings.crossfade;
        if crossfade.is_zero() {
            return;
        }
        let Some(next) = self.queue.next_index() else {
            return;
        };
        if self.failed_preload == Some(next) {
            return;
        }

        let duration = match self.lanes.active().engine().duration_ms() {
            0 => self.queue.get(index).map_or(0, Track::duration_ms),
            d => d,
        };
        if duration == 0 {
            return;
        }
        let remaining = duration.saturating_sub(position_ms);
        if remaining == 0 || remaining > crossfade.as_millis() as u64 {
            return;
        }
        self.begin_crossfade(index, next, now);
    }

    fn begin_crossfade(&mut self, from: usize, to: usize, now: Instant) {
        let active = self.lanes.active_id();
        let standby = self.lanes.standby_id();

        if self.lanes.lane(standby).track() != Some(to) {
            let Some(path) = self.queue.get(to).map(|t| t.path.clone()) else {
                return;
            };
            if let Err(e) = self.lanes.load(standby, to, &path) {
                warn!(index = to, "preload failed: {e}");
                self.failed_preload = Some(to);
                self.events.push(SchedulerEvent::TrackFailed {
                    index: to,
                    reason: e.to_string(),
                });
                return;
            }
        }

        let crossfade = self.settings.crossfade;
        self.lanes.set_volume(standby, 0.0);
        self.lanes.lane_mut(standby).engine_mut().play();
        self.state = TransitionState::Fading;
        info!(from, to, ?crossfade, "crossfade started");
        self.events.push(SchedulerEvent::CrossfadeStarted {
            from,
            to,
            duration: crossfade,
        });

        let out = self.tag(FadeRole::Out);
        let incoming = self.tag(FadeRole::In);
        self.ramp(active, 1.0, 0.0, crossfade, now, out);
        self.ramp(standby, 0.0, 1.0, crossfade, now, incoming);
    }

    /// Stop the outgoing lane and hand the active role to the incoming one.
    fn finish_transition(&mut self) {
        self.state = TransitionState::Advancing;
        let outgoing = self.lanes.active_id();
        self.fades.cancel(outgoing);
        self.fades.cancel(outgoing.other());
        self.lanes.stop(outgoing);
        self.lanes.swap_roles();
        self.lanes.settle_volumes();
        self.failed_preload = None;

        let incoming = self.lanes.active_id();
        match self.lanes.lane(incoming).track() {
            Some(index) => {
                self.queue.set_current(index);
                self.state = TransitionState::Playing;
                info!(index, lane = %incoming, "transition finished");
                self.events.push(SchedulerEvent::TransitionFinished {
                    index,
                    lane: incoming,
                });
            }
            None => self.end_of_queue(),
        }
    }

    fn on_end_of_media(&mut self, lane: LaneId) {
        let Some(index) = self.lanes.lane(lane).track() else {
            debug!(%lane, "end of media from an empty lane dropped");
            return;
        };
        debug!(%lane, index, state = %self.state, "end of media");
        if self.exiting {
            self.stop();
            return;
        }

        if lane == self.lanes.active_id() {
            if self.state == TransitionState::Fading {
                self.finish_transition();
            } else {
                self.advance_after_end();
            }
        } else if self.state == TransitionState::Fading {
            // The incoming track ran out before its fade-in landed.
            self.finish_transition();
            self.advance_after_end();
        } else {
            self.lanes.stop(lane);
        }
    }

    fn on_engine_error(&mut self, lane: LaneId, reason: String) {
        let Some(index) = self.lanes.lane(lane).track() else {
            debug!(%lane, "error from an empty lane dropped: {reason}");
            return;
        };
        warn!(%lane, index, "engine error: {reason}");
        self.events.push(SchedulerEvent::TrackFailed { index, reason });

        if lane == self.lanes.active_id() {
            self.on_end_of_media(lane);
            return;
        }
        if self.state == TransitionState::Fading {
            // Abort the crossfade and keep the outgoing track playing.
            self.fades.cancel(lane);
            self.fades.cancel(lane.other());
            self.lanes.stop(lane);
            self.lanes.settle_volumes();
            self.failed_preload = Some(index);
            self.state = TransitionState::Playing;
        } else {
            self.lanes.stop(lane);
        }
    }
}
