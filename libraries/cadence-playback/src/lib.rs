//! Cadence - Playback Session
//!
//! The client-side playback controller for Cadence.
//!
//! This crate provides:
//! - Track selection (`next`, `previous`, direct selection by id)
//! - Shuffle with recent-history avoidance
//! - Bounded play history (20 entries, oldest evicted first)
//! - Persistence of volume, shuffle, history, last track and position
//! - Progress tracking and fractional seek
//! - Fire-and-forget play-count reporting
//! - A tokio runtime driver with a cloneable command handle
//!
//! # Architecture
//!
//! `PlaybackSession` is synchronous and single-owner. Its collaborators are
//! traits: the audio output ([`AudioSink`]), the key-value store and the
//! play-count notifier (from `cadence-core`). [`SessionRuntime`] owns a
//! session on one task and serialises commands, ticks and deferred resumes.
//!
//! # Example
//!
//! ```rust
//! use cadence_core::{Track, TrackId};
//! use cadence_playback::{AudioSink, PlaybackSession, PlaybackState, SessionConfig, SimulatedSink};
//! use std::collections::HashMap;
//! use std::time::Duration;
//!
//! let tracks = vec![
//!     Track::new("a", "Opening", "https://cdn.example.com/a.mp3"),
//!     Track::new("b", "Closing", "https://cdn.example.com/b.mp3"),
//! ];
//!
//! let mut sink = SimulatedSink::new().with_default_length(Duration::from_secs(180));
//! sink.set_volume(1.0);
//!
//! let store: HashMap<String, String> = HashMap::new();
//! let mut session = PlaybackSession::new(SessionConfig::default(), Box::new(sink), Box::new(store));
//! session.load_catalog(tracks);
//!
//! assert_eq!(session.state(), PlaybackState::Paused);
//!
//! session.select_track(&TrackId::new("b"));
//! session.run_deferred_plays();
//! assert_eq!(session.state(), PlaybackState::Playing);
//! assert_eq!(session.history().len(), 1);
//! ```

pub mod deferred;
mod error;
pub mod events;
pub mod history;
mod notify;
pub mod persistence;
mod runtime;
mod session;
pub mod shuffle;
pub mod sink;
pub mod types;

// Public exports
pub use deferred::{DeferredPlay, ResumeReason};
pub use error::{PlaybackError, Result};
pub use events::SessionEvent;
pub use history::{History, HistoryEntry};
pub use notify::PlayCountReporter;
pub use persistence::keys;
pub use runtime::{SessionCommand, SessionHandle, SessionRuntime};
pub use session::PlaybackSession;
pub use sink::{AudioSink, SimulatedSink, SinkEvent};
pub use types::{PlaybackState, Progress, SessionConfig, SessionSnapshot};
