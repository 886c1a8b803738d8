//! Core types for the playback session

use crate::history::HistoryEntry;
use cadence_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state
///
/// Derived from whether a track is loaded and whether the sink is playing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track loaded
    Idle,

    /// Track loaded, not playing
    Paused,

    /// Track loaded and playing
    Playing,
}

/// Elapsed/total time of the loaded track
///
/// Always recomputed from the sink; never the source of truth for position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    /// Seconds played
    pub elapsed_secs: f64,

    /// Track length in seconds (0 when unknown)
    pub total_secs: f64,
}

impl Progress {
    /// Build progress from sink readings
    pub fn from_sink(elapsed: Duration, total: Option<Duration>) -> Self {
        Self {
            elapsed_secs: elapsed.as_secs_f64(),
            total_secs: total.map_or(0.0, |d| d.as_secs_f64()),
        }
    }

    /// Elapsed time as (minutes, seconds)
    pub fn elapsed_clock(&self) -> (u64, u64) {
        split_clock(self.elapsed_secs)
    }

    /// Total time as (minutes, seconds)
    pub fn total_clock(&self) -> (u64, u64) {
        split_clock(self.total_secs)
    }

    /// Whole elapsed seconds, as persisted between sessions
    pub fn whole_elapsed_secs(&self) -> u64 {
        self.elapsed_secs.max(0.0).floor() as u64
    }

    /// Completion in percent (0 when the length is unknown)
    pub fn percent(&self) -> f64 {
        if self.total_secs > 0.0 {
            (self.elapsed_secs / self.total_secs * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        }
    }
}

fn split_clock(secs: f64) -> (u64, u64) {
    let whole = secs.max(0.0).floor() as u64;
    (whole / 60, whole % 60)
}

/// Configuration for the playback session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum history entries kept (default: 20)
    pub history_size: usize,

    /// Random picks tried before shuffle falls back to the next track (default: 10)
    pub shuffle_attempts: usize,

    /// Volume used when nothing usable is persisted (default: 0.7)
    pub default_volume: f32,

    /// Load the first catalog track when nothing is restored (default: true)
    pub autoload_first_track: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_size: 20,
            shuffle_attempts: 10,
            default_volume: 0.7,
            autoload_first_track: true,
        }
    }
}

/// Point-in-time copy of the session for display
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub state: PlaybackState,
    pub current_track: Option<Track>,
    pub current_index: Option<usize>,
    pub volume: f32,
    pub shuffle: bool,
    pub progress: Progress,
    pub history: Vec<HistoryEntry>,
    pub catalog_len: usize,
}
