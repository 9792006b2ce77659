//! Recording engine for scheduler tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::EngineError;

use super::{EngineEvent, PlaybackEngine};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(PathBuf),
    Play,
    Pause,
    Stop,
    Seek(u64),
    Volume(f32),
}

/// Sources it knows have a fixed duration; sources listed in `broken` fail
/// to load. Position only moves when a test sets it or seeks.
#[derive(Debug, Default)]
pub struct MockEngine {
    pub calls: Vec<Call>,
    pub loaded: Option<PathBuf>,
    pub position: u64,
    pub duration: u64,
    pub volume: f32,
    pub playing: bool,
    pub pending: Vec<EngineEvent>,
    durations: HashMap<PathBuf, u64>,
    broken: Vec<PathBuf>,
}

impl MockEngine {
    pub fn with_library(library: &[(&str, u64)]) -> Self {
        Self {
            durations: library
                .iter()
                .map(|(p, d)| (PathBuf::from(p), *d))
                .collect(),
            ..Self::default()
        }
    }

    pub fn break_source(&mut self, path: &str) {
        self.broken.push(PathBuf::from(path));
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls.iter().filter(|c| *c == wanted).count()
    }

    pub fn loads(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Load(_)))
            .count()
    }

    pub fn seeks(&self) -> Vec<u64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Seek(ms) => Some(*ms),
                _ => None,
            })
            .collect()
    }
}

impl PlaybackEngine for MockEngine {
    fn load(&mut self, source: &Path) -> Result<(), EngineError> {
        self.calls.push(Call::Load(source.to_path_buf()));
        if self.broken.iter().any(|b| b == source) {
            self.loaded = None;
            return Err(EngineError::Decode {
                path: source.to_path_buf(),
                reason: "unsupported".to_string(),
            });
        }
        self.loaded = Some(source.to_path_buf());
        self.position = 0;
        self.duration = self.durations.get(source).copied().unwrap_or(0);
        self.playing = false;
        Ok(())
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
        self.playing = self.loaded.is_some();
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
        self.playing = false;
    }

    fn stop(&mut self) {
        self.calls.push(Call::Stop);
        self.loaded = None;
        self.position = 0;
        self.duration = 0;
        self.playing = false;
    }

    fn seek(&mut self, position_ms: u64) {
        self.calls.push(Call::Seek(position_ms));
        self.position = position_ms;
    }

    fn position_ms(&self) -> u64 {
        self.position
    }

    fn duration_ms(&self) -> u64 {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.calls.push(Call::Volume(volume));
        self.volume = volume;
    }

    fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    fn poll_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending)
    }
}
