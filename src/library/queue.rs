//! The ordered list of tracks being played and the cursor into it.

use super::model::Track;

#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Vec<Track>,
    current: Option<usize>,
}

impl Queue {
    /// `start_index` is clamped into range; an empty queue has no index.
    pub fn new(tracks: Vec<Track>, start_index: usize) -> Self {
        let current = if tracks.is_empty() {
            None
        } else {
            Some(start_index.min(tracks.len() - 1))
        };
        Self { tracks, current }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<&Track> {
        self.current.and_then(|i| self.tracks.get(i))
    }

    pub fn next_index(&self) -> Option<usize> {
        self.current
            .map(|i| i + 1)
            .filter(|&i| i < self.tracks.len())
    }

    pub fn prev_index(&self) -> Option<usize> {
        self.current.and_then(|i| i.checked_sub(1))
    }

    /// Move the cursor, clamping to the last valid index.
    pub fn set_current(&mut self, index: usize) {
        if !self.tracks.is_empty() {
            self.current = Some(index.min(self.tracks.len() - 1));
        }
    }

    /// Swap in a new record for the track at `index`. The source path must
    /// match; a record for a different source is refused.
    pub fn replace(&mut self, index: usize, track: Track) -> bool {
        match self.tracks.get_mut(index) {
            Some(slot) if slot.path == track.path => {
                *slot = track;
                true
            }
            _ => false,
        }
    }
}
