use std::{env, path::PathBuf};

use crate::scheduler::MAX_CROSSFADE_SECONDS;
use crate::silence::{MIN_SILENCE_RANGE_MS, THRESHOLD_RANGE_DB};

use super::schema::Settings;

const POLL_INTERVAL_RANGE_MS: (u64, u64) = (50, 1000);
const FADE_STEP_RANGE_MS: (u64, u64) = (10, 500);
const MAX_SKIP_EPSILON_MS: u64 = 1000;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `SEGUE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SEGUE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Clamp out-of-range values into their valid ranges.
    ///
    /// Returns one message per adjusted field; an empty list means the
    /// settings were already valid.
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut notes = Vec::new();

        let audio = &mut self.audio;
        if !audio.crossfade_seconds.is_finite() {
            notes.push(format!(
                "audio.crossfade_seconds = {} is not a number, using 0",
                audio.crossfade_seconds
            ));
            audio.crossfade_seconds = 0.0;
        } else if !(0.0..=MAX_CROSSFADE_SECONDS).contains(&audio.crossfade_seconds) {
            let clamped = audio.crossfade_seconds.clamp(0.0, MAX_CROSSFADE_SECONDS);
            notes.push(format!(
                "audio.crossfade_seconds = {} clamped to {clamped}",
                audio.crossfade_seconds
            ));
            audio.crossfade_seconds = clamped;
        }
        clamp_u64(
            &mut audio.poll_interval_ms,
            POLL_INTERVAL_RANGE_MS,
            "audio.poll_interval_ms",
            &mut notes,
        );
        clamp_u64(
            &mut audio.fade_step_ms,
            FADE_STEP_RANGE_MS,
            "audio.fade_step_ms",
            &mut notes,
        );

        let gap = &mut self.gap_killer;
        let (lo, hi) = THRESHOLD_RANGE_DB;
        if !gap.threshold_db.is_finite() || !(lo..=hi).contains(&gap.threshold_db) {
            let clamped = if gap.threshold_db.is_finite() {
                gap.threshold_db.clamp(lo, hi)
            } else {
                -46.0
            };
            notes.push(format!(
                "gap_killer.threshold_db = {} clamped to {clamped}",
                gap.threshold_db
            ));
            gap.threshold_db = clamped;
        }
        clamp_u64(
            &mut gap.min_silence_ms,
            MIN_SILENCE_RANGE_MS,
            "gap_killer.min_silence_ms",
            &mut notes,
        );
        clamp_u64(
            &mut gap.skip_epsilon_ms,
            (0, MAX_SKIP_EPSILON_MS),
            "gap_killer.skip_epsilon_ms",
            &mut notes,
        );

        notes
    }
}

fn clamp_u64(value: &mut u64, (lo, hi): (u64, u64), name: &str, notes: &mut Vec<String>) {
    if !(lo..=hi).contains(value) {
        let clamped = (*value).clamp(lo, hi);
        notes.push(format!("{name} = {value} clamped to {clamped}"));
        *value = clamped;
    }
}

/// Resolve the config path from `SEGUE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SEGUE_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/segue/config.toml`
/// or `~/.config/segue/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("segue").join("config.toml"))
}

/// Default log directory: `$XDG_STATE_HOME/segue` or `~/.local/state/segue`.
pub fn default_log_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("segue"))
}
