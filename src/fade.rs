//! Time-based volume ramps on the two playback lanes.
//!
//! The controller does not own a timer; the audio thread calls
//! [`FadeController::advance`] on every wakeup and the controller applies the
//! current level of each running ramp and reports the ones that finished.

mod controller;
mod curve;

pub use controller::{FadeController, Scheduled, VolumeControl};
pub use curve::FadeCurve;
