use segue::config::Settings;

use crate::Args;

/// Load settings, fall back to defaults when the config cannot be read, then
/// apply command-line overrides and clamp everything into range.
///
/// Logging is not up yet when this runs, so problems come back as messages
/// for the caller to log.
pub fn load_settings(args: &Args) -> (Settings, Vec<String>) {
    let mut notes = Vec::new();
    let mut settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            // Config is optional; failures should not prevent playback.
            notes.push(format!("failed to load config, using defaults: {e}"));
            Settings::default()
        }
    };

    apply_args(&mut settings, args);
    notes.extend(settings.sanitize());
    (settings, notes)
}

pub fn apply_args(settings: &mut Settings, args: &Args) {
    if let Some(secs) = args.crossfade {
        settings.audio.crossfade_seconds = secs;
    }
    if args.no_gap_killer {
        settings.gap_killer.enabled = false;
    }
}
