//! The audio thread.
//!
//! [`AudioPlayer`] spawns a thread that owns the output stream, both rodio
//! lanes and the [`CrossfadeScheduler`](crate::scheduler::CrossfadeScheduler).
//! The UI talks to it only through [`AudioCmd`]s and reads a
//! [`PlaybackInfo`] snapshot that the thread refreshes on every tick.

mod analysis;
mod driver;
mod player;
mod thread;
mod types;

pub use analysis::AnalysisQueue;
pub use driver::{Driver, Flow, Timing};
pub use player::AudioPlayer;
pub use types::{AudioCmd, PlaybackHandle, PlaybackInfo};
