use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use tracing::{info, warn};

use segue::audio::{AudioCmd, AudioPlayer};
use segue::library::Track;

use crate::Args;

mod event_loop;
mod logging;
mod settings;


const HEADLESS_POLL: Duration = Duration::from_millis(200);

pub fn run(args: Args) -> Result<()> {
    let (settings, notes) = settings::load_settings(&args);

    if args.print_config {
        let text = toml::to_string_pretty(&settings).context("failed to serialize settings")?;
        print!("{text}");
        return Ok(());
    }

    let _log_guard = logging::init(&settings.logging, args.headless)?;
    for note in &notes {
        warn!("config: {note}");
    }

    let (tracks, start) = collect_tracks(&args.files, args.start);
    if tracks.is_empty() {
        bail!("none of the given files exist");
    }
    info!(count = tracks.len(), start, "starting playback");

    let player = AudioPlayer::new(&settings);
    player
        .send(AudioCmd::SetQueue { tracks, start })
        .context("audio thread is not running")?;

    let result = if args.headless {
        wait_for_queue_end(&player);
        Ok(())
    } else {
        event_loop::run(&player, &settings)
    };

    player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
    result
}

/// Keep the files that exist and translate `start`, an index into `files`,
/// into the queue. A missing start file moves the start to the next file
/// that exists, or to the last one when none follows.
pub(crate) fn collect_tracks(files: &[PathBuf], start: usize) -> (Vec<Track>, usize) {
    let mut tracks = Vec::with_capacity(files.len());
    let mut queue_start = None;
    for (i, path) in files.iter().enumerate() {
        if !path.is_file() {
            warn!(path = %path.display(), "not a file, skipped");
            continue;
        }
        if i >= start && queue_start.is_none() {
            queue_start = Some(tracks.len());
        }
        tracks.push(Track::from_path(path));
    }
    let start = queue_start.unwrap_or_else(|| tracks.len().saturating_sub(1));
    (tracks, start)
}

fn wait_for_queue_end(player: &AudioPlayer) {
    let handle = player.playback_handle();
    loop {
        thread::sleep(HEADLESS_POLL);
        let Ok(info) = handle.lock() else {
            return;
        };
        if info.queue_ended || info.shut_down {
            return;
        }
    }
}
