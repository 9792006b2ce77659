//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior and helpers to load configuration from disk.

mod load;
mod schema;

pub use load::{default_config_path, default_log_dir, resolve_config_path};
pub use schema::*;
