//! The playback-engine seam.
//!
//! The scheduler drives two engines, one per lane, through [`PlaybackEngine`].
//! Commands are fire-and-forget; engines report back through
//! [`PlaybackEngine::poll_events`], which the scheduler drains on every tick.

use std::fmt;
use std::path::Path;

use crate::error::EngineError;

mod sink;

#[cfg(test)]
pub(crate) mod mock;

pub use sink::RodioEngine;

/// One of the two playback slots.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LaneId {
    A,
    B,
}

impl LaneId {
    pub const ALL: [LaneId; 2] = [LaneId::A, LaneId::B];

    pub fn other(self) -> Self {
        match self {
            LaneId::A => LaneId::B,
            LaneId::B => LaneId::A,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            LaneId::A => 0,
            LaneId::B => 1,
        }
    }
}

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LaneId::A => "A",
            LaneId::B => "B",
        })
    }
}

/// Something an engine noticed since the last poll.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PositionChanged(u64),
    EndOfMedia,
    Error(String),
}

pub trait PlaybackEngine {
    /// Replace whatever is loaded with `source`, paused at position zero.
    fn load(&mut self, source: &Path) -> Result<(), EngineError>;

    fn play(&mut self);

    fn pause(&mut self);

    /// Stop playback and unload the source.
    fn stop(&mut self);

    fn seek(&mut self, position_ms: u64);

    fn position_ms(&self) -> u64;

    /// Zero when unknown.
    fn duration_ms(&self) -> u64;

    /// `volume` is already clamped to [0.0, 1.0].
    fn set_volume(&mut self, volume: f32);

    fn is_loaded(&self) -> bool;

    fn poll_events(&mut self) -> Vec<EngineEvent>;
}
