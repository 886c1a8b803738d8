//! Line commands for the interactive player
//!
//! One command per stdin line. Parsing is separate from execution so the
//! grammar can be tested without a running session.

use crate::error::{CliError, Result};
use cadence_core::TrackId;
use cadence_playback::{SessionCommand, SessionEvent, SessionSnapshot};

/// Help text printed by `help`
pub const HELP: &str = "\
commands:
  play | pause              resume or pause
  next | n                  next track
  prev | p                  previous track
  select <id>               play a track by id
  seek <0-100>%             jump to a position (percent of track)
  vol <0.0-1.0>             set volume
  shuffle on|off            toggle shuffle
  status                    show what is playing
  tracks                    list the catalog
  history                   list recently played tracks
  search <text>             find songs and albums by name
  playlists                 list your playlists
  add-to <playlist id>      add the current track to a playlist
  forget <n>                remove history entry n (0 = oldest)
  clear-history             forget all history
  cancel                    drop pending playback resumes
  quit                      exit";

/// A parsed input line
#[derive(Debug)]
pub enum ReplCommand {
    /// Forward to the session runtime
    Session(SessionCommand),
    Status,
    Tracks,
    History,
    /// Catalog search, words joined with single spaces
    Search(String),
    Playlists,
    /// Add the current track to the playlist with this id
    AddTo(String),
    Help,
    Quit,
}

/// Parse one input line; blank lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let command = match head.to_ascii_lowercase().as_str() {
        "play" => ReplCommand::Session(SessionCommand::Play),
        "pause" => ReplCommand::Session(SessionCommand::Pause),
        "next" | "n" => ReplCommand::Session(SessionCommand::Next),
        "prev" | "previous" | "p" => ReplCommand::Session(SessionCommand::Previous),
        "select" | "s" => {
            let id = required(head, arg, "track id")?;
            ReplCommand::Session(SessionCommand::Select(TrackId::new(id)))
        }
        "seek" => {
            let raw = required(head, arg, "percentage")?;
            ReplCommand::Session(SessionCommand::Seek(parse_percent(head, raw)?))
        }
        "vol" | "volume" => {
            let raw = required(head, arg, "volume")?;
            let volume: f32 = raw.parse().map_err(|_| invalid(head, "expected a number"))?;
            if !(0.0..=1.0).contains(&volume) {
                return Err(invalid(head, "volume must be between 0.0 and 1.0"));
            }
            ReplCommand::Session(SessionCommand::SetVolume(volume))
        }
        "shuffle" => match required(head, arg, "on|off")? {
            "on" | "true" => ReplCommand::Session(SessionCommand::SetShuffle(true)),
            "off" | "false" => ReplCommand::Session(SessionCommand::SetShuffle(false)),
            _ => return Err(invalid(head, "expected on or off")),
        },
        "forget" => {
            let raw = required(head, arg, "history position")?;
            let position = raw
                .parse()
                .map_err(|_| invalid(head, "expected a position"))?;
            ReplCommand::Session(SessionCommand::RemoveHistoryEntry(position))
        }
        "clear-history" => ReplCommand::Session(SessionCommand::ClearHistory),
        "cancel" => ReplCommand::Session(SessionCommand::CancelDeferredPlay),
        "status" => ReplCommand::Status,
        "tracks" | "ls" => ReplCommand::Tracks,
        "history" => ReplCommand::History,
        "search" | "find" => {
            let query = arg.into_iter().chain(words).collect::<Vec<_>>().join(" ");
            if query.is_empty() {
                return Err(invalid(head, "missing search text"));
            }
            ReplCommand::Search(query)
        }
        "playlists" | "pl" => ReplCommand::Playlists,
        "add-to" => ReplCommand::AddTo(required(head, arg, "playlist id")?.to_string()),
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => return Err(CliError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

/// One-line summary of the session
pub fn describe_snapshot(snapshot: &SessionSnapshot) -> String {
    let Some(track) = &snapshot.current_track else {
        return "nothing loaded".to_string();
    };

    let (em, es) = snapshot.progress.elapsed_clock();
    let (tm, ts) = snapshot.progress.total_clock();
    format!(
        "{:?}: {} - {} [{}:{:02} / {}:{:02}] vol {:.2}{}",
        snapshot.state,
        track.name,
        track.artist,
        em,
        es,
        tm,
        ts,
        snapshot.volume,
        if snapshot.shuffle { " (shuffle)" } else { "" }
    )
}

/// Text shown for an event, or `None` for events not worth printing
pub fn describe_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::StateChanged { state } => Some(format!("state: {:?}", state)),
        SessionEvent::TrackChanged { track_id, index, .. } => Some(match index {
            Some(index) => format!("track: {} (#{})", track_id, index),
            None => format!("track: {}", track_id),
        }),
        SessionEvent::VolumeChanged { volume } => Some(format!("volume: {:.2}", volume)),
        SessionEvent::ShuffleChanged { enabled } => {
            Some(format!("shuffle: {}", if *enabled { "on" } else { "off" }))
        }
        SessionEvent::PlaybackFailed { message } => Some(format!("playback failed: {}", message)),
        SessionEvent::ProgressUpdated { .. } | SessionEvent::HistoryChanged { .. } => None,
    }
}

fn required<'a>(command: &str, arg: Option<&'a str>, what: &str) -> Result<&'a str> {
    arg.ok_or_else(|| invalid(command, &format!("missing {}", what)))
}

fn parse_percent(command: &str, raw: &str) -> Result<f64> {
    let value: f64 = raw
        .trim_end_matches('%')
        .parse()
        .map_err(|_| invalid(command, "expected a percentage"))?;
    if !(0.0..=100.0).contains(&value) {
        return Err(invalid(command, "percentage must be between 0 and 100"));
    }
    Ok(value / 100.0)
}

fn invalid(command: &str, reason: &str) -> CliError {
    CliError::InvalidArgument {
        command: command.to_string(),
        reason: reason.to_string(),
    }
}
