use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::fade::FadeCurve;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/segue/config.toml` or `~/.config/segue/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `SEGUE__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub gap_killer: GapKillerSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Crossfade duration between consecutive tracks (seconds).
    /// Set to 0 to disable crossfade.
    pub crossfade_seconds: f32,
    /// How often the scheduler samples lane positions (milliseconds).
    pub poll_interval_ms: u64,
    /// Ramp update interval while a fade is running (milliseconds).
    pub fade_step_ms: u64,
    /// Shape of the crossfade ramps.
    pub fade_curve: FadeCurve,
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            crossfade_seconds: 4.0,
            poll_interval_ms: 200,
            fade_step_ms: 50,
            fade_curve: FadeCurve::Linear,
            quit_fade_out_ms: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GapKillerSettings {
    /// Skip detected silent regions while playing.
    pub enabled: bool,
    /// Loudness below which audio counts as silent (dBFS).
    pub threshold_db: f32,
    /// Minimum length of a silent region worth skipping (milliseconds).
    pub min_silence_ms: u64,
    /// How far past the end of a silent region to land (milliseconds).
    pub skip_epsilon_ms: u64,
    /// Analyze queued tracks in the background as soon as a queue is loaded.
    pub analyze_on_load: bool,
}

impl Default for GapKillerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold_db: -46.0,
            min_silence_ms: 500,
            skip_epsilon_ms: 50,
            analyze_on_load: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// Which track fields to show in the status line, and in what order.
    ///
    /// Example: ["artist", "title", "album"]
    pub now_playing_track_fields: Vec<TrackDisplayField>,

    /// Separator used to join `now_playing_track_fields`.
    pub now_playing_track_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            now_playing_track_fields: vec![TrackDisplayField::Display],
            now_playing_track_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Directory for the rolling log file. Defaults to the XDG state dir.
    pub directory: Option<PathBuf>,
    /// `tracing` filter directive; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            directory: None,
            filter: "info,segue=debug".to_string(),
        }
    }
}

#[derive(Debug, Copy, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    /// "Artist - Title", or just the title when the artist is unknown.
    Display,
    Title,
    Artist,
    Album,
    Filename,
    Path,
}
