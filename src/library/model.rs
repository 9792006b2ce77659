use std::path::{Path, PathBuf};
use std::time::Duration;

/// A region of a track, in milliseconds from the track start, whose loudness
/// stays below the silence threshold.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SilentInterval {
    pub start_ms: u64,
    pub end_ms: u64,
}

impl SilentInterval {
    /// Returns `None` unless `end_ms > start_ms`.
    pub fn new(start_ms: u64, end_ms: u64) -> Option<Self> {
        (end_ms > start_ms).then_some(Self { start_ms, end_ms })
    }

    /// Both bounds are inclusive.
    pub fn contains(&self, position_ms: u64) -> bool {
        self.start_ms <= position_ms && position_ms <= self.end_ms
    }
}

impl From<(u64, u64)> for SilentInterval {
    /// Inverted pairs are swapped; empty pairs produce an empty interval that
    /// `normalize_silences` drops.
    fn from((a, b): (u64, u64)) -> Self {
        Self {
            start_ms: a.min(b),
            end_ms: a.max(b),
        }
    }
}

/// Sort intervals by start, drop empty ones and merge overlapping or touching
/// neighbours.
pub fn normalize_silences(mut intervals: Vec<SilentInterval>) -> Vec<SilentInterval> {
    intervals.retain(|iv| iv.end_ms > iv.start_ms);
    intervals.sort_by_key(|iv| (iv.start_ms, iv.end_ms));

    let mut merged: Vec<SilentInterval> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match merged.last_mut() {
            Some(last) if iv.start_ms <= last.end_ms => {
                last.end_ms = last.end_ms.max(iv.end_ms);
            }
            _ => merged.push(iv),
        }
    }
    merged
}

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// `Duration::ZERO` when unknown.
    pub duration: Duration,
    silences: Vec<SilentInterval>,
}

impl Track {
    /// Build a track from a file path, using the file stem as the title.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        Self {
            path: path.to_path_buf(),
            title,
            artist: String::new(),
            album: String::new(),
            duration: Duration::ZERO,
            silences: Vec::new(),
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Replace the silence list; the intervals are normalized first.
    pub fn with_silences(mut self, silences: Vec<SilentInterval>) -> Self {
        self.silences = normalize_silences(silences);
        self
    }

    pub fn silences(&self) -> &[SilentInterval] {
        &self.silences
    }

    /// The silent interval covering `position_ms`, with its index in
    /// `silences()`.
    pub fn silence_at(&self, position_ms: u64) -> Option<(usize, SilentInterval)> {
        // Sorted and disjoint: the candidate is the last interval starting at
        // or before the position.
        let idx = self
            .silences
            .partition_point(|iv| iv.start_ms <= position_ms)
            .checked_sub(1)?;
        let iv = self.silences[idx];
        iv.contains(position_ms).then_some((idx, iv))
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}
