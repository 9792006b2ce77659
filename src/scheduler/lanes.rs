use std::path::Path;

use crate::engine::{LaneId, PlaybackEngine};
use crate::error::EngineError;
use crate::fade::VolumeControl;

/// One playback slot: an engine plus what the scheduler knows about it.
#[derive(Debug)]
pub struct Lane<E> {
    engine: E,
    volume: f32,
    track: Option<usize>,
    /// Index of the silent interval last skipped; cleared once the position
    /// is outside every interval again.
    skip_latch: Option<usize>,
}

impl<E: PlaybackEngine> Lane<E> {
    fn new(engine: E) -> Self {
        Self {
            engine,
            volume: 0.0,
            track: None,
            skip_latch: None,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Queue index of the loaded track.
    pub fn track(&self) -> Option<usize> {
        self.track
    }

    pub(crate) fn skip_latch(&self) -> Option<usize> {
        self.skip_latch
    }

    pub(crate) fn set_skip_latch(&mut self, latch: Option<usize>) {
        self.skip_latch = latch;
    }
}

/// Two long-lived lanes plus the flag saying which one is audible.
#[derive(Debug)]
pub struct LanePair<E> {
    lanes: [Lane<E>; 2],
    active: LaneId,
}

impl<E: PlaybackEngine> LanePair<E> {
    pub fn new(a: E, b: E) -> Self {
        let mut pair = Self {
            lanes: [Lane::new(a), Lane::new(b)],
            active: LaneId::A,
        };
        pair.settle_volumes();
        pair
    }

    pub fn active_id(&self) -> LaneId {
        self.active
    }

    pub fn standby_id(&self) -> LaneId {
        self.active.other()
    }

    pub fn lane(&self, id: LaneId) -> &Lane<E> {
        &self.lanes[id.index()]
    }

    pub(crate) fn lane_mut(&mut self, id: LaneId) -> &mut Lane<E> {
        &mut self.lanes[id.index()]
    }

    pub fn active(&self) -> &Lane<E> {
        self.lane(self.active)
    }

    pub fn swap_roles(&mut self) {
        self.active = self.active.other();
    }

    /// Lane A becomes the active lane again.
    pub fn reset_roles(&mut self) {
        self.active = LaneId::A;
    }

    /// Written through to the engine, clamped to [0.0, 1.0].
    pub fn set_volume(&mut self, id: LaneId, volume: f32) {
        let volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
        let lane = self.lane_mut(id);
        lane.volume = volume;
        lane.engine.set_volume(volume);
    }

    /// Active lane at full volume, standby silent.
    pub fn settle_volumes(&mut self) {
        self.set_volume(self.active, 1.0);
        self.set_volume(self.active.other(), 0.0);
    }

    /// Load queue entry `index` into lane `id`. On failure the lane is left
    /// empty.
    pub fn load(&mut self, id: LaneId, index: usize, source: &Path) -> Result<(), EngineError> {
        let lane = self.lane_mut(id);
        lane.skip_latch = None;
        match lane.engine.load(source) {
            Ok(()) => {
                lane.track = Some(index);
                Ok(())
            }
            Err(e) => {
                lane.track = None;
                Err(e)
            }
        }
    }

    pub fn stop(&mut self, id: LaneId) {
        let lane = self.lane_mut(id);
        if lane.engine.is_loaded() {
            lane.engine.stop();
        }
        lane.track = None;
        lane.skip_latch = None;
    }

    pub fn stop_all(&mut self) {
        for id in LaneId::ALL {
            self.stop(id);
        }
    }

    /// Lanes holding a track, active first.
    pub fn loaded(&self) -> Vec<LaneId> {
        [self.active, self.active.other()]
            .into_iter()
            .filter(|&id| self.lane(id).track.is_some())
            .collect()
    }
}

impl<E: PlaybackEngine> VolumeControl for LanePair<E> {
    fn apply_volume(&mut self, lane: LaneId, volume: f32) {
        self.set_volume(lane, volume);
    }
}
