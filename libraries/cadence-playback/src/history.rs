//! Play history tracking
//!
//! Maintains a bounded, chronological record of track changes. Entries keep
//! the catalog position the track had when it was played, plus its stable id
//! so a refetched or reordered catalog still resolves to the right track.

use cadence_core::{Track, TrackId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// A single play event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Catalog position at the time of play
    pub index: usize,

    /// Stable id of the track (absent in entries written by older clients)
    #[serde(rename = "trackId", default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<TrackId>,

    /// When the track change happened
    #[serde(rename = "timestamp")]
    pub played_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Create an entry for a track played now
    pub fn new(index: usize, track_id: TrackId) -> Self {
        Self::at(index, track_id, Utc::now())
    }

    /// Create an entry with an explicit timestamp
    pub fn at(index: usize, track_id: TrackId, played_at: DateTime<Utc>) -> Self {
        Self {
            index,
            track_id: Some(track_id),
            played_at,
        }
    }

    /// Resolve this entry against a catalog snapshot
    ///
    /// Entries carrying an id resolve by id only (a vanished id resolves to
    /// nothing); entries without one fall back to the stored position.
    pub fn resolve(&self, catalog: &[Track]) -> Option<usize> {
        match &self.track_id {
            Some(id) => catalog.iter().position(|t| &t.id == id),
            None => (self.index < catalog.len()).then_some(self.index),
        }
    }

    /// "N day(s) ago" relative to `now`
    ///
    /// Days are rounded up and never reported below one.
    pub fn relative_label(&self, now: DateTime<Utc>) -> String {
        let elapsed_ms = (now - self.played_at).num_milliseconds().unsigned_abs();
        let day_ms = 24 * 60 * 60 * 1000;
        let days = elapsed_ms.div_ceil(day_ms).max(1);

        if days > 1 {
            format!("{} days ago", days)
        } else {
            format!("{} day ago", days)
        }
    }
}

/// Play history with bounded size
///
/// Oldest entries are discarded first once the cap is reached.
#[derive(Debug, Clone)]
pub struct History {
    /// History buffer (most recent = back)
    entries: VecDeque<HistoryEntry>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Rebuild history from persisted entries, keeping only the newest `max_size`
    pub fn from_entries(entries: Vec<HistoryEntry>, max_size: usize) -> Self {
        let mut history = Self::new(max_size);
        for entry in entries {
            history.push(entry);
        }
        history
    }

    /// Append an entry, evicting the oldest if full
    pub fn push(&mut self, entry: HistoryEntry) {
        if self.max_size == 0 {
            return;
        }
        while self.entries.len() >= self.max_size {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Most recent entry
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// All entries, oldest first
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Owned copy of all entries, oldest first
    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Remove the entry at `position` (0 = oldest)
    pub fn remove(&mut self, position: usize) -> Option<HistoryEntry> {
        self.entries.remove(position)
    }

    /// Catalog positions touched by the stored entries
    pub fn recent_positions(&self, catalog: &[Track]) -> HashSet<usize> {
        self.entries.iter().filter_map(|e| e.resolve(catalog)).collect()
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Get maximum history size
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(20)
    }
}
