//! Session events
//!
//! Queued by the session on every observable change and drained by whoever
//! drives it (UI, runtime loop). Events are notifications only; the session
//! state stays authoritative.

use crate::types::{PlaybackState, Progress};
use cadence_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Playback state changed
    StateChanged {
        /// The new state
        state: PlaybackState,
    },

    /// A different track was loaded
    TrackChanged {
        /// The new current track
        track_id: TrackId,
        /// Its catalog position
        index: Option<usize>,
        /// Track that was loaded before, if any
        previous_track_id: Option<TrackId>,
    },

    /// Elapsed/total time recomputed from the sink
    ProgressUpdated {
        /// Latest progress
        progress: Progress,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume
        volume: f32,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// Whether shuffle is on
        enabled: bool,
    },

    /// History gained, lost or cleared entries
    HistoryChanged {
        /// Number of entries now stored
        length: usize,
    },

    /// The sink refused to play; the session stays paused
    PlaybackFailed {
        /// Sink error message
        message: String,
    },
}
