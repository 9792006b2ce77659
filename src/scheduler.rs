//! The dual-lane crossfade scheduler.
//!
//! Two long-lived lanes take turns being the active one. On every tick the
//! scheduler skips silent regions of the loaded tracks, starts a crossfade
//! into the standby lane when the active track nears its end, and finishes
//! the transition when the fade-in completes by swapping lane roles.

mod lanes;
mod machine;
mod state;

pub use lanes::{Lane, LanePair};
pub use machine::CrossfadeScheduler;
pub use state::{FadeRole, FadeTag, SchedulerEvent, SchedulerSettings, TransitionState};

/// Upper bound for the crossfade length.
pub const MAX_CROSSFADE_SECONDS: f32 = 12.0;

#[cfg(test)]
mod tests;
