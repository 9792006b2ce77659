//! Track and queue model.
//!
//! A `Track` is one playable item together with the silent intervals found in
//! it; a `Queue` is the ordered list the scheduler plays through.

mod display;
mod model;
mod queue;

pub use display::display_from_fields;
pub use model::{SilentInterval, Track, normalize_silences};
pub use queue::Queue;
