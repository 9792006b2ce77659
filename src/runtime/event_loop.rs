use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, disable_raw_mode, enable_raw_mode};
use tracing::debug;

use segue::audio::{AudioCmd, AudioPlayer, PlaybackInfo};
use segue::config::{Settings, UiSettings};
use segue::library::display_from_fields;

const INPUT_POLL: Duration = Duration::from_millis(200);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    TogglePause,
    Stop,
    Next,
    Prev,
    CrossfadeUp,
    CrossfadeDown,
    ToggleGapKiller,
    Quit,
}

pub fn key_action(key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Action::Quit);
    }
    let action = match key.code {
        KeyCode::Char(' ' | 'p') => Action::TogglePause,
        KeyCode::Char('s') => Action::Stop,
        KeyCode::Char('n' | 'l') | KeyCode::Right => Action::Next,
        KeyCode::Char('b' | 'h') | KeyCode::Left => Action::Prev,
        KeyCode::Char('+' | '=') => Action::CrossfadeUp,
        KeyCode::Char('-') => Action::CrossfadeDown,
        KeyCode::Char('g') => Action::ToggleGapKiller,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// The command an action turns into, given the current snapshot.
pub fn command_for(action: Action, info: &PlaybackInfo) -> Option<AudioCmd> {
    let crossfade = info.crossfade.as_secs_f32();
    let cmd = match action {
        Action::TogglePause => AudioCmd::TogglePause,
        Action::Stop => AudioCmd::Stop,
        Action::Next => AudioCmd::Next,
        Action::Prev => AudioCmd::Prev,
        Action::CrossfadeUp => AudioCmd::SetCrossfade((crossfade + 1.0).round()),
        Action::CrossfadeDown => AudioCmd::SetCrossfade((crossfade - 1.0).round()),
        Action::ToggleGapKiller => AudioCmd::EnableGapKiller(!info.gap_killer),
        Action::Quit => return None,
    };
    Some(cmd)
}

fn clock(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// One line describing what is playing.
pub fn status_line(info: &PlaybackInfo, ui: &UiSettings) -> String {
    let state = if info.paused {
        "paused".to_string()
    } else {
        info.transition.to_string()
    };
    let now_playing = match (&info.track, info.index) {
        (Some(track), Some(index)) => format!(
            "{}/{} {}",
            index + 1,
            info.queue_len,
            display_from_fields(
                track,
                &ui.now_playing_track_fields,
                &ui.now_playing_track_separator
            )
        ),
        _ => "-".to_string(),
    };
    let position = if info.duration.is_zero() {
        clock(info.elapsed)
    } else {
        format!("{}/{}", clock(info.elapsed), clock(info.duration))
    };
    format!(
        "[{state}] {now_playing}  {position}  xfade {:.0}s  gap-killer {}",
        info.crossfade.as_secs_f32(),
        if info.gap_killer { "on" } else { "off" }
    )
}

fn draw(out: &mut impl Write, line: &str) -> io::Result<()> {
    let width = terminal::size().map_or(80, |(w, _)| usize::from(w));
    let line: String = line.chars().take(width.saturating_sub(1)).collect();
    execute!(out, MoveToColumn(0), Clear(ClearType::CurrentLine), Print(line))?;
    out.flush()
}

fn snapshot(player: &AudioPlayer) -> PlaybackInfo {
    player
        .playback_handle()
        .lock()
        .map(|info| info.clone())
        .unwrap_or_default()
}

/// Raw-mode key loop with a single status line. Returns when the user quits
/// or the audio thread has gone away.
pub fn run(player: &AudioPlayer, settings: &Settings) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    let result = (|| -> Result<()> {
        loop {
            let info = snapshot(player);
            draw(&mut stdout, &status_line(&info, &settings.ui))?;
            if info.shut_down {
                return Ok(());
            }

            if !event::poll(INPUT_POLL)? {
                continue;
            }
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let Some(action) = key_action(key) else {
                continue;
            };
            debug!(?action, "key");
            match command_for(action, &info) {
                Some(cmd) => {
                    if player.send(cmd).is_err() {
                        return Ok(());
                    }
                }
                None => return Ok(()),
            }
        }
    })();

    disable_raw_mode()?;
    execute!(stdout, Print("\r\n"))?;
    result
}
