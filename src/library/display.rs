use crate::config::TrackDisplayField;

use super::model::Track;

/// Build a display string for a track according to the provided `fields` and separator.
///
/// This composes metadata fields (artist, title, album, filename, path) in the
/// configured order and falls back to the title when no parts were produced.
pub fn display_from_fields(track: &Track, fields: &[TrackDisplayField], sep: &str) -> String {
    let mut parts: Vec<String> = Vec::new();

    let non_empty = |s: &str| {
        let s = s.trim();
        (!s.is_empty()).then(|| s.to_string())
    };

    for f in fields {
        match f {
            TrackDisplayField::Display => {
                // "display" means "artist - title" style.
                parts.extend(non_empty(&track.artist));
                parts.extend(non_empty(&track.title));
            }
            TrackDisplayField::Title => parts.extend(non_empty(&track.title)),
            TrackDisplayField::Artist => parts.extend(non_empty(&track.artist)),
            TrackDisplayField::Album => parts.extend(non_empty(&track.album)),
            TrackDisplayField::Filename => {
                if let Some(stem) = track.path.file_stem().and_then(|s| s.to_str()) {
                    parts.extend(non_empty(stem));
                }
            }
            TrackDisplayField::Path => parts.push(track.path.display().to_string()),
        }
    }

    if parts.is_empty() {
        track.title.clone()
    } else {
        parts.join(sep)
    }
}
