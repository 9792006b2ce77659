use std::time::{Duration, Instant};

use tracing::trace;

use crate::engine::LaneId;

use super::curve::FadeCurve;

/// Anything that can set a lane's output volume.
pub trait VolumeControl {
    fn apply_volume(&mut self, lane: LaneId, volume: f32);
}

/// Outcome of [`FadeController::schedule`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Scheduled<T> {
    /// The ramp is running; its tag is reported by `advance` when it ends.
    Running,
    /// Zero-length ramp: the target volume was applied and the ramp is
    /// already complete.
    Completed(T),
}

#[derive(Debug, Clone)]
struct Ramp<T> {
    from: f32,
    to: f32,
    duration: Duration,
    started: Instant,
    tag: T,
}

impl<T> Ramp<T> {
    fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

/// One ramp slot per lane. Each completed ramp yields its tag exactly once;
/// replaced and cancelled ramps never do.
#[derive(Debug)]
pub struct FadeController<T> {
    curve: FadeCurve,
    ramps: [Option<Ramp<T>>; 2],
    suspended_at: Option<Instant>,
}

impl<T: Copy> FadeController<T> {
    pub fn new(curve: FadeCurve) -> Self {
        Self {
            curve,
            ramps: [None, None],
            suspended_at: None,
        }
    }

    /// Applies to ramps scheduled afterwards as well as running ones.
    pub fn set_curve(&mut self, curve: FadeCurve) {
        self.curve = curve;
    }

    /// Start a ramp on `lane` from `from` to `to` over `duration`.
    ///
    /// A ramp already running on the lane is replaced without completing.
    /// With a zero duration `to` is applied immediately and the completion is
    /// returned synchronously.
    pub fn schedule<V: VolumeControl>(
        &mut self,
        out: &mut V,
        lane: LaneId,
        from: f32,
        to: f32,
        duration: Duration,
        now: Instant,
        tag: T,
    ) -> Scheduled<T> {
        let from = from.clamp(0.0, 1.0);
        let to = to.clamp(0.0, 1.0);
        self.ramps[lane.index()] = None;

        if duration.is_zero() {
            out.apply_volume(lane, to);
            return Scheduled::Completed(tag);
        }

        trace!(%lane, from, to, ?duration, "ramp scheduled");
        out.apply_volume(lane, from);
        // A ramp scheduled while suspended starts counting on resume.
        let started = self.suspended_at.unwrap_or(now);
        self.ramps[lane.index()] = Some(Ramp {
            from,
            to,
            duration,
            started,
            tag,
        });
        Scheduled::Running
    }

    /// Stop the ramp on `lane`, leaving the volume wherever it got to.
    pub fn cancel(&mut self, lane: LaneId) -> bool {
        self.ramps[lane.index()].take().is_some()
    }

    /// Drop every ramp and any suspension.
    pub fn cancel_all(&mut self) {
        self.ramps = [None, None];
        self.suspended_at = None;
    }

    pub fn is_running(&self, lane: LaneId) -> bool {
        self.ramps[lane.index()].is_some()
    }

    pub fn in_flight(&self) -> bool {
        self.ramps.iter().any(Option::is_some)
    }

    /// Freeze all ramps at their current level.
    pub fn suspend(&mut self, now: Instant) {
        if self.suspended_at.is_none() {
            self.suspended_at = Some(now);
        }
    }

    /// Continue frozen ramps as if no time had passed while suspended.
    pub fn resume(&mut self, now: Instant) {
        if let Some(at) = self.suspended_at.take() {
            let paused_for = now.saturating_duration_since(at);
            for ramp in self.ramps.iter_mut().flatten() {
                ramp.started += paused_for;
            }
        }
    }

    /// Apply the current level of every running ramp and return the tags of
    /// the ramps that reached their target.
    pub fn advance<V: VolumeControl>(&mut self, out: &mut V, now: Instant) -> Vec<(LaneId, T)> {
        if self.suspended_at.is_some() {
            return Vec::new();
        }

        let mut completed = Vec::new();
        for lane in LaneId::ALL {
            let slot = &mut self.ramps[lane.index()];
            let Some(ramp) = slot.as_ref() else {
                continue;
            };

            let t = ramp.progress(now);
            out.apply_volume(lane, self.curve.level(ramp.from, ramp.to, t));
            if t >= 1.0 {
                let tag = ramp.tag;
                *slot = None;
                completed.push((lane, tag));
            }
        }
        completed
    }
}
