use std::fmt;
use std::time::Duration;

use crate::config::Settings;
use crate::engine::LaneId;
use crate::fade::FadeCurve;
use crate::silence::SilenceParams;

/// Where the scheduler is in a track transition.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransitionState {
    /// Nothing loaded, or fully stopped.
    #[default]
    Idle,
    /// Active lane playing, standby lane empty.
    Playing,
    /// Active lane ramping down while the standby lane ramps up.
    Fading,
    /// Swapping lane roles and loading the next source.
    Advancing,
}

impl TransitionState {
    pub fn as_str(self) -> &'static str {
        match self {
            TransitionState::Idle => "idle",
            TransitionState::Playing => "playing",
            TransitionState::Fading => "fading",
            TransitionState::Advancing => "advancing",
        }
    }
}

impl fmt::Display for TransitionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FadeRole {
    /// Outgoing track ramping to silence.
    Out,
    /// Incoming track ramping to full volume; its completion ends the
    /// transition.
    In,
    /// Final fade before stopping.
    Exit,
}

/// Attached to every ramp so that a completion can be matched against the
/// queue generation and track it was scheduled for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FadeTag {
    pub epoch: u64,
    pub from_index: usize,
    pub role: FadeRole,
}

/// Things that happened inside the scheduler, drained by the audio thread.
#[derive(Debug, Clone, PartialEq)]
pub enum SchedulerEvent {
    TrackStarted {
        index: usize,
        lane: LaneId,
    },
    CrossfadeStarted {
        from: usize,
        to: usize,
        duration: Duration,
    },
    TransitionFinished {
        index: usize,
        lane: LaneId,
    },
    SilenceSkipped {
        index: usize,
        lane: LaneId,
        from_ms: u64,
        to_ms: u64,
    },
    TrackFailed {
        index: usize,
        reason: String,
    },
    QueueEnded,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerSettings {
    pub crossfade: Duration,
    pub curve: FadeCurve,
    pub gap_killer: bool,
    pub silence: SilenceParams,
    /// Distance past the end of a silent interval to seek to.
    pub skip_epsilon_ms: u64,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            crossfade: Duration::from_secs(4),
            curve: FadeCurve::Linear,
            gap_killer: true,
            silence: SilenceParams::default(),
            skip_epsilon_ms: 50,
        }
    }
}

impl From<&Settings> for SchedulerSettings {
    fn from(s: &Settings) -> Self {
        Self {
            crossfade: crossfade_from_seconds(s.audio.crossfade_seconds),
            curve: s.audio.fade_curve,
            gap_killer: s.gap_killer.enabled,
            silence: SilenceParams {
                threshold_db: s.gap_killer.threshold_db,
                min_silence_ms: s.gap_killer.min_silence_ms,
            }
            .clamped(),
            skip_epsilon_ms: s.gap_killer.skip_epsilon_ms,
        }
    }
}

/// Clamp to [0, MAX_CROSSFADE_SECONDS]; NaN and infinities become zero.
pub(crate) fn crossfade_from_seconds(seconds: f32) -> Duration {
    if !seconds.is_finite() {
        return Duration::ZERO;
    }
    Duration::from_secs_f32(seconds.clamp(0.0, super::MAX_CROSSFADE_SECONDS))
}
