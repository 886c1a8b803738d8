//! Audio output sink
//!
//! Abstracts the device that decodes and outputs audio. The session is the
//! sink's only mutator; it loads resources, starts and pauses playback,
//! seeks, and polls for time-update and end-of-track notifications.

use cadence_core::{CadenceError, Result};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// Notifications raised by a sink between polls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkEvent {
    /// Playback position moved
    TimeUpdate,

    /// The loaded resource played to its end
    Ended,
}

/// Audio output device
///
/// Implementors own decoding and output; the session only drives them.
pub trait AudioSink: Send {
    /// Load a resource, replacing whatever was loaded
    ///
    /// The sink ends up paused at position zero.
    fn load(&mut self, resource: &str) -> Result<()>;

    /// Start or resume playback of the loaded resource
    ///
    /// May be refused (no media, device policy, decode failure).
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Whether a resource is loaded
    fn has_media(&self) -> bool;

    /// Current playback position
    fn current_time(&self) -> Duration;

    /// Jump to a position
    fn set_current_time(&mut self, position: Duration);

    /// Length of the loaded resource, if known
    fn duration(&self) -> Option<Duration>;

    /// Set output volume (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32);

    /// Whether playback is paused
    fn is_paused(&self) -> bool;

    /// Collect notifications raised since the last poll
    fn poll_events(&mut self) -> Vec<SinkEvent> {
        Vec::new()
    }
}

/// Clock-driven sink that plays nothing
///
/// Position advances with [`tokio::time::Instant`] while playing, so tests
/// running on a paused tokio clock can drive it with `tokio::time::advance`.
/// Resource lengths are registered up front; unregistered resources fall back
/// to the default length (unknown unless set).
#[derive(Debug, Default)]
pub struct SimulatedSink {
    lengths: HashMap<String, Duration>,
    default_length: Option<Duration>,
    media: Option<String>,
    offset: Duration,
    started_at: Option<Instant>,
    volume: f32,
    ended_reported: bool,
}

impl SimulatedSink {
    /// Create a sink with no known resources
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            ..Self::default()
        }
    }

    /// Length used for resources that were never registered
    pub fn with_default_length(mut self, length: Duration) -> Self {
        self.default_length = Some(length);
        self
    }

    /// Register the length of a resource
    pub fn register(&mut self, resource: impl Into<String>, length: Duration) {
        self.lengths.insert(resource.into(), length);
    }

    /// Loaded resource, if any
    pub fn media(&self) -> Option<&str> {
        self.media.as_deref()
    }

    /// Last volume pushed to the sink
    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn raw_position(&self) -> Duration {
        let running = self.started_at.map_or(Duration::ZERO, |t| t.elapsed());
        self.offset + running
    }

    fn clamp_to_length(&self, position: Duration) -> Duration {
        match self.duration() {
            Some(length) => position.min(length),
            None => position,
        }
    }
}

impl AudioSink for SimulatedSink {
    fn load(&mut self, resource: &str) -> Result<()> {
        if resource.is_empty() {
            return Err(CadenceError::audio("empty resource reference"));
        }
        self.media = Some(resource.to_string());
        self.offset = Duration::ZERO;
        self.started_at = None;
        self.ended_reported = false;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.media.is_none() {
            return Err(CadenceError::audio("no media loaded"));
        }
        if self.started_at.is_none() {
            if self.ended_reported {
                // Replaying a finished resource starts over
                self.offset = Duration::ZERO;
                self.ended_reported = false;
            }
            self.started_at = Some(Instant::now());
        }
        Ok(())
    }

    fn pause(&mut self) {
        if self.started_at.is_some() {
            self.offset = self.clamp_to_length(self.raw_position());
            self.started_at = None;
        }
    }

    fn has_media(&self) -> bool {
        self.media.is_some()
    }

    fn current_time(&self) -> Duration {
        self.clamp_to_length(self.raw_position())
    }

    fn set_current_time(&mut self, position: Duration) {
        self.offset = self.clamp_to_length(position);
        self.ended_reported = false;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn duration(&self) -> Option<Duration> {
        let media = self.media.as_ref()?;
        self.lengths.get(media).copied().or(self.default_length)
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn is_paused(&self) -> bool {
        self.started_at.is_none()
    }

    fn poll_events(&mut self) -> Vec<SinkEvent> {
        if self.started_at.is_none() {
            return Vec::new();
        }

        let finished = self
            .duration()
            .is_some_and(|length| self.raw_position() >= length);

        if finished && !self.ended_reported {
            self.pause();
            self.ended_reported = true;
            vec![SinkEvent::TimeUpdate, SinkEvent::Ended]
        } else {
            vec![SinkEvent::TimeUpdate]
        }
    }
}
