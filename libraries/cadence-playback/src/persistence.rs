//! Persisted session settings
//!
//! The session owns a fixed set of keys in the key-value store. Everything is
//! read once at start-up; afterwards the session only writes. Write failures
//! are logged and swallowed so persistence never blocks playback.

use crate::history::{History, HistoryEntry};
use cadence_core::{KeyValueStore, Track};
use tracing::{debug, warn};

/// Store keys owned by the playback session
pub mod keys {
    /// Volume as a decimal string (`"0.7"`)
    pub const VOLUME: &str = "player_volume";

    /// Shuffle flag (`"true"` / `"false"`)
    pub const SHUFFLE: &str = "shuffle";

    /// JSON array of history entries
    pub const HISTORY: &str = "played_history";

    /// JSON of the last loaded track
    pub const CURRENT_TRACK: &str = "current_track";

    /// Whole seconds elapsed in the last loaded track
    pub const CURRENT_ELAPSED: &str = "current_duration";
}

/// Values restored from the store at start-up
#[derive(Debug, Clone)]
pub struct PersistedSession {
    pub volume: f32,
    pub shuffle: bool,
    pub history: History,
    pub last_track: Option<Track>,
    pub last_elapsed_secs: Option<u64>,
}

/// Session-facing wrapper around a key-value store
pub struct SessionStore {
    inner: Box<dyn KeyValueStore>,
}

impl SessionStore {
    /// Wrap a store
    pub fn new(inner: Box<dyn KeyValueStore>) -> Self {
        Self { inner }
    }

    /// Read access to the underlying store
    pub fn inner(&self) -> &dyn KeyValueStore {
        self.inner.as_ref()
    }

    /// Restore persisted values, substituting defaults for anything missing
    /// or unreadable
    pub fn load(&self, default_volume: f32, history_size: usize) -> PersistedSession {
        let volume = self
            .read(keys::VOLUME)
            .and_then(|raw| match raw.trim().parse::<f32>() {
                Ok(v) if v.is_finite() => Some(v),
                _ => {
                    warn!(value = %raw, "Ignoring unreadable persisted volume");
                    None
                }
            })
            .unwrap_or(default_volume);

        let shuffle = self.read(keys::SHUFFLE).is_some_and(|raw| raw == "true");

        let entries: Vec<HistoryEntry> = self
            .read_json(keys::HISTORY)
            .unwrap_or_default();
        let history = History::from_entries(entries, history_size);

        let last_track: Option<Track> = self.read_json(keys::CURRENT_TRACK);

        let last_elapsed_secs = self
            .read(keys::CURRENT_ELAPSED)
            .and_then(|raw| raw.trim().parse::<u64>().ok());

        debug!(
            volume,
            shuffle,
            history = history.len(),
            last_track = last_track.as_ref().map(|t| t.id.as_str()),
            "Restored session"
        );

        PersistedSession {
            volume,
            shuffle,
            history,
            last_track,
            last_elapsed_secs,
        }
    }

    /// Persist the volume
    pub fn save_volume(&mut self, volume: f32) {
        self.write(keys::VOLUME, &volume.to_string());
    }

    /// Persist the shuffle flag
    pub fn save_shuffle(&mut self, enabled: bool) {
        self.write(keys::SHUFFLE, if enabled { "true" } else { "false" });
    }

    /// Persist the full history
    pub fn save_history(&mut self, history: &History) {
        self.write_json(keys::HISTORY, &history.to_vec());
    }

    /// Persist the loaded track
    pub fn save_track(&mut self, track: &Track) {
        self.write_json(keys::CURRENT_TRACK, track);
    }

    /// Persist the elapsed position
    pub fn save_elapsed(&mut self, secs: u64) {
        self.write(keys::CURRENT_ELAPSED, &secs.to_string());
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.inner.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read session value");
                None
            }
        }
    }

    fn read_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Ignoring unreadable session value");
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.inner.set(key, value) {
            warn!(key, error = %e, "Failed to persist session value");
        }
    }

    fn write_json<T: serde::Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.write(key, &json),
            Err(e) => warn!(key, error = %e, "Failed to encode session value"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::TrackId;
    use std::collections::HashMap;

    fn store_with(entries: &[(&str, &str)]) -> SessionStore {
        let map: HashMap<String, String> = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SessionStore::new(Box::new(map))
    }

    #[test]
    fn empty_store_yields_defaults() {
        let restored = store_with(&[]).load(0.7, 20);
        assert_eq!(restored.volume, 0.7);
        assert!(!restored.shuffle);
        assert!(restored.history.is_empty());
        assert!(restored.last_track.is_none());
        assert!(restored.last_elapsed_secs.is_none());
    }

    #[test]
    fn zero_volume_is_kept() {
        let restored = store_with(&[(keys::VOLUME, "0")]).load(0.7, 20);
        assert_eq!(restored.volume, 0.0);
    }

    #[test]
    fn garbage_volume_falls_back_to_default() {
        let restored = store_with(&[(keys::VOLUME, "loud")]).load(0.7, 20);
        assert_eq!(restored.volume, 0.7);
    }

    #[test]
    fn volume_round_trips() {
        let mut store = store_with(&[]);
        store.save_volume(0.3);
        assert_eq!(store.load(0.7, 20).volume, 0.3);
    }

    #[test]
    fn shuffle_only_true_enables() {
        assert!(store_with(&[(keys::SHUFFLE, "true")]).load(0.7, 20).shuffle);
        assert!(!store_with(&[(keys::SHUFFLE, "yes")]).load(0.7, 20).shuffle);
    }

    #[test]
    fn corrupt_history_is_discarded() {
        let restored = store_with(&[(keys::HISTORY, "{not json")]).load(0.7, 20);
        assert!(restored.history.is_empty());
    }

    #[test]
    fn history_and_track_round_trip() {
        let mut store = store_with(&[]);
        let mut history = History::new(20);
        history.push(HistoryEntry::new(3, TrackId::new("d")));
        store.save_history(&history);

        let track = Track::new("d", "Dee", "https://cdn/d.mp3");
        store.save_track(&track);
        store.save_elapsed(42);

        let restored = store.load(0.7, 20);
        assert_eq!(restored.history.len(), 1);
        assert_eq!(restored.history.latest().unwrap().index, 3);
        assert_eq!(restored.last_track, Some(track));
        assert_eq!(restored.last_elapsed_secs, Some(42));
    }
}
