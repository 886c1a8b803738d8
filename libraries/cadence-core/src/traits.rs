/// Collaborator traits for the playback session
use crate::error::Result;
use crate::types::{Track, TrackId};
use async_trait::async_trait;
use std::collections::HashMap;

/// Catalog provider
///
/// Supplies the ordered collection of playable tracks. The whole catalog is
/// assumed to fit in memory; there is no pagination at this layer.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch every playable track, in catalog order
    async fn list_tracks(&self) -> Result<Vec<Track>>;
}

/// Durable string key-value store
///
/// Backs the session's persisted settings (volume, shuffle, history, last
/// track, elapsed position, auth token). Values are opaque strings; callers
/// own the encoding.
pub trait KeyValueStore: Send {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete a value (no-op if absent)
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl KeyValueStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(HashMap::get(self, key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        HashMap::remove(self, key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Play-count notifier
///
/// Receives "track X was played" notifications. Callers never await these on
/// the playback path; failures are logged and dropped.
#[async_trait]
pub trait PlayCountNotifier: Send + Sync {
    /// Increment the play count of a track
    async fn increment(&self, track_id: &TrackId) -> Result<()>;
}
