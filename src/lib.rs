//! Playback core of a crossfading music player.
//!
//! Two playback lanes take turns: while one plays, the other preloads the
//! next track, and near the end of the current track the scheduler ramps one
//! down while ramping the other up. Silent gaps found by the analyzer are
//! skipped by seeking past them.

pub mod audio;
pub mod config;
pub mod engine;
pub mod error;
pub mod fade;
pub mod library;
pub mod scheduler;
pub mod silence;

#[cfg(test)]
pub(crate) mod testing;
