//! Playback session - track selection, history and persistence
//!
//! The session owns every piece of mutable playback state. It mediates
//! between the catalog snapshot, the audio sink and the key-value store and
//! is driven one event at a time (user commands, sink notifications, a
//! periodic tick). Nothing here locks; callers serialise access.

use crate::{
    deferred::{DeferredPlay, ResumeReason},
    error::{PlaybackError, Result},
    events::SessionEvent,
    history::{History, HistoryEntry},
    notify::PlayCountReporter,
    persistence::SessionStore,
    shuffle,
    sink::{AudioSink, SinkEvent},
    types::{PlaybackState, Progress, SessionConfig, SessionSnapshot},
};
use cadence_core::{KeyValueStore, PlayCountNotifier, Track, TrackId};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Last track and position restored from the store, applied once the
/// catalog arrives
#[derive(Debug)]
struct PendingRestore {
    track: Track,
    elapsed_secs: Option<u64>,
}

/// Playback session controller
pub struct PlaybackSession {
    config: SessionConfig,

    // Catalog snapshot, in catalog order
    catalog: Vec<Track>,

    current_track: Option<Track>,
    // False when the sink refused the current track's resource
    media_ready: bool,
    is_playing: bool,
    volume: f32,
    shuffle: bool,
    progress: Progress,
    history: History,

    sink: Box<dyn AudioSink>,
    store: SessionStore,
    play_counts: PlayCountReporter,
    deferred: DeferredPlay,
    rng: StdRng,

    pending_events: Vec<SessionEvent>,
    pending_restore: Option<PendingRestore>,
    last_persisted_elapsed: Option<u64>,
}

impl PlaybackSession {
    /// Create a session, restoring volume, shuffle and history from `store`
    ///
    /// The last played track is held back until [`load_catalog`] can match
    /// it against the catalog.
    ///
    /// [`load_catalog`]: Self::load_catalog
    pub fn new(
        config: SessionConfig,
        mut sink: Box<dyn AudioSink>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let store = SessionStore::new(store);
        let restored = store.load(config.default_volume, config.history_size);

        sink.set_volume(restored.volume);

        let pending_restore = restored.last_track.map(|track| PendingRestore {
            track,
            elapsed_secs: restored.last_elapsed_secs,
        });

        Self {
            config,
            catalog: Vec::new(),
            current_track: None,
            media_ready: false,
            is_playing: false,
            volume: restored.volume,
            shuffle: restored.shuffle,
            progress: Progress::default(),
            history: restored.history,
            sink,
            store,
            play_counts: PlayCountReporter::disabled(),
            deferred: DeferredPlay::new(),
            rng: StdRng::from_entropy(),
            pending_events: Vec::new(),
            pending_restore,
            last_persisted_elapsed: None,
        }
    }

    /// Report play counts through `notifier`
    pub fn with_play_count_notifier(mut self, notifier: Arc<dyn PlayCountNotifier>) -> Self {
        self.play_counts = PlayCountReporter::new(notifier);
        self
    }

    /// Use a deterministic shuffle sequence
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ===== Catalog =====

    /// Install a catalog snapshot
    ///
    /// On the first load the persisted last track is restored (matched by id)
    /// and the sink is moved to the persisted position. When nothing can be
    /// restored and `autoload_first_track` is set, the first track is loaded
    /// without playing it. Later loads only replace the snapshot.
    pub fn load_catalog(&mut self, tracks: Vec<Track>) {
        info!(tracks = tracks.len(), "Catalog loaded");
        self.catalog = tracks;

        if self.current_track.is_some() {
            return;
        }

        if let Some(restore) = self.pending_restore.take() {
            if let Some(index) = self.index_of(&restore.track.id) {
                let track = self.catalog[index].clone();
                debug!(track_id = %track.id, index, "Restoring last track");
                self.load_into_sink(track);

                if let Some(secs) = restore.elapsed_secs.filter(|_| self.media_ready) {
                    self.sink.set_current_time(Duration::from_secs(secs));
                    self.last_persisted_elapsed = Some(secs);
                }
                self.refresh_progress();
                return;
            }
            debug!(track_id = %restore.track.id, "Last track no longer in catalog");
        }

        if self.config.autoload_first_track {
            if let Some(first) = self.catalog.first().cloned() {
                debug!(track_id = %first.id, "Loading first catalog track");
                self.load_into_sink(first);
                self.refresh_progress();
            }
        }
    }

    // ===== Playback Control =====

    /// Start or resume the loaded track
    ///
    /// A refused start leaves the session paused and is also reported as
    /// [`SessionEvent::PlaybackFailed`]. A track whose resource the sink
    /// refused to load is never started.
    pub fn play(&mut self) -> Result<()> {
        if self.current_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        if !self.media_ready || !self.sink.has_media() {
            self.set_playing(false);
            return Err(PlaybackError::Sink("track media not loaded".to_string()));
        }

        match self.sink.play() {
            Ok(()) => {
                self.set_playing(true);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Sink refused playback");
                self.set_playing(false);
                self.emit(SessionEvent::PlaybackFailed {
                    message: e.to_string(),
                });
                Err(PlaybackError::Sink(e.to_string()))
            }
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.current_track.is_none() {
            return;
        }
        self.sink.pause();
        self.set_playing(false);
        self.refresh_progress();
    }

    /// Advance to the next track
    ///
    /// Returns whether the track changed. Without shuffle the last track is a
    /// dead end (no wrap) and nothing is scheduled.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        self.advance(ResumeReason::Next)
    }

    /// Step back to the previous track
    ///
    /// Returns whether the track changed. A playback resume is scheduled
    /// even when the track did not change.
    pub fn previous(&mut self) -> bool {
        let len = self.catalog.len();
        let current = self.current_index();

        let target = if self.shuffle && len > 1 {
            Some(shuffle::pick_previous(&mut self.rng, len, current))
        } else {
            current.filter(|&i| i > 0).map(|i| i - 1)
        };

        let changed = match target {
            Some(index) => {
                self.change_track(index);
                true
            }
            None => {
                debug!("Already at the first track");
                false
            }
        };

        self.deferred.schedule(ResumeReason::Previous);
        changed
    }

    /// Jump to a track by id
    ///
    /// Unknown ids are ignored and leave the session untouched.
    pub fn select_track(&mut self, id: &TrackId) -> bool {
        let Some(index) = self.index_of(id) else {
            debug!(track_id = %id, "Selected track not in catalog");
            return false;
        };

        self.change_track(index);
        self.deferred.schedule(ResumeReason::Select);
        true
    }

    // ===== Seek =====

    /// Seek to a fraction (0.0 - 1.0) of the loaded track
    ///
    /// Ignored when nothing is loaded or the length is unknown or zero.
    pub fn seek(&mut self, fraction: f64) {
        if !self.media_ready || !self.sink.has_media() || !fraction.is_finite() {
            return;
        }
        let Some(total) = self.sink.duration().filter(|d| !d.is_zero()) else {
            debug!("Seek ignored, track length unknown");
            return;
        };

        let target = total.mul_f64(fraction.clamp(0.0, 1.0));
        debug!(target_secs = target.as_secs_f64(), "Seeking");
        self.sink.set_current_time(target);
        self.refresh_progress();
    }

    // ===== Volume & Shuffle =====

    /// Set volume
    ///
    /// Stored and forwarded as given; range checks belong to the caller.
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.sink.set_volume(volume);
        self.store.save_volume(volume);
        self.emit(SessionEvent::VolumeChanged { volume });
    }

    /// Toggle shuffle; the current track is left alone
    pub fn set_shuffle(&mut self, enabled: bool) {
        self.shuffle = enabled;
        self.store.save_shuffle(enabled);
        self.emit(SessionEvent::ShuffleChanged { enabled });
    }

    // ===== Sink Events & Progress =====

    /// Periodic update: process sink notifications, then refresh progress
    /// while playing
    pub fn tick(&mut self) {
        self.pump_sink_events();
        if self.is_playing {
            self.refresh_progress();
        }
    }

    /// Poll the sink and handle everything it raised
    pub fn pump_sink_events(&mut self) {
        for event in self.sink.poll_events() {
            self.handle_sink_event(event);
        }
    }

    /// React to a single sink notification
    pub fn handle_sink_event(&mut self, event: SinkEvent) {
        match event {
            SinkEvent::TimeUpdate => self.refresh_progress(),
            SinkEvent::Ended => {
                debug!("Track ended");
                self.set_playing(false);
                self.refresh_progress();
                self.advance(ResumeReason::Ended);
            }
        }
    }

    // ===== Deferred Play =====

    /// Run every scheduled resume against the track current right now
    ///
    /// Returns how many resumes were attempted. Failures are logged and
    /// reported as events; nothing is retried.
    pub fn run_deferred_plays(&mut self) -> usize {
        let reasons = self.deferred.drain();
        for reason in &reasons {
            debug!(?reason, "Resuming playback");
            if let Err(e) = self.play() {
                debug!(?reason, error = %e, "Deferred resume did not start playback");
            }
        }
        reasons.len()
    }

    /// Whether a resume is waiting to run
    pub fn has_deferred_play(&self) -> bool {
        self.deferred.is_pending()
    }

    /// Drop scheduled resumes, returning how many were dropped
    pub fn cancel_deferred_play(&mut self) -> usize {
        let dropped = self.deferred.cancel();
        if dropped > 0 {
            debug!(dropped, "Cancelled deferred playback");
        }
        dropped
    }

    // ===== History =====

    /// Remove the history entry at `position` (0 = oldest)
    pub fn remove_history_entry(&mut self, position: usize) -> Option<HistoryEntry> {
        let removed = self.history.remove(position)?;
        self.store.save_history(&self.history);
        self.emit_history_changed();
        Some(removed)
    }

    /// Forget all history
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.store.save_history(&self.history);
        self.emit_history_changed();
    }

    /// History entries paired with the catalog tracks they resolve to,
    /// oldest first; unresolvable entries are skipped
    pub fn resolved_history(&self) -> Vec<(&HistoryEntry, &Track)> {
        self.history
            .entries()
            .filter_map(|entry| {
                entry
                    .resolve(&self.catalog)
                    .map(|index| (entry, &self.catalog[index]))
            })
            .collect()
    }

    // ===== State Queries =====

    /// Current playback state
    pub fn state(&self) -> PlaybackState {
        match (&self.current_track, self.is_playing) {
            (None, _) => PlaybackState::Idle,
            (Some(_), false) => PlaybackState::Paused,
            (Some(_), true) => PlaybackState::Playing,
        }
    }

    /// Loaded track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Catalog position of the loaded track
    pub fn current_index(&self) -> Option<usize> {
        self.current_track
            .as_ref()
            .and_then(|track| self.index_of(&track.id))
    }

    /// Whether the sink is playing
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Current volume
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Whether shuffle is on
    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle
    }

    /// Last computed progress
    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Play history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Catalog snapshot
    pub fn catalog(&self) -> &[Track] {
        &self.catalog
    }

    /// Session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Underlying key-value store
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.inner()
    }

    /// Audio sink
    pub fn sink(&self) -> &dyn AudioSink {
        self.sink.as_ref()
    }

    /// Copy of the displayable state
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state(),
            current_track: self.current_track.clone(),
            current_index: self.current_index(),
            volume: self.volume,
            shuffle: self.shuffle,
            progress: self.progress,
            history: self.history.to_vec(),
            catalog_len: self.catalog.len(),
        }
    }

    // ===== Events =====

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Whether events are waiting to be drained
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn index_of(&self, id: &TrackId) -> Option<usize> {
        self.catalog.iter().position(|track| &track.id == id)
    }

    /// Shared by `next()` and end-of-track
    fn advance(&mut self, reason: ResumeReason) -> bool {
        let Some(current) = self.current_index() else {
            debug!("Next ignored, no current track in catalog");
            return false;
        };
        let len = self.catalog.len();

        let target = if self.shuffle && len > 1 {
            let recent = self.history.recent_positions(&self.catalog);
            shuffle::pick_next(
                &mut self.rng,
                len,
                current,
                &recent,
                self.config.shuffle_attempts,
            )
        } else if current + 1 < len {
            current + 1
        } else {
            debug!("Reached end of catalog");
            return false;
        };

        self.change_track(target);
        self.deferred.schedule(reason);
        true
    }

    /// Record, load and persist a track change
    ///
    /// Order: history append, sink load and track persistence, history
    /// persistence, play-count report. Resuming playback is left to the
    /// caller's deferred schedule.
    fn change_track(&mut self, index: usize) {
        let track = self.catalog[index].clone();
        info!(track_id = %track.id, index, name = %track.name, "Track changed");

        self.history.push(HistoryEntry::new(index, track.id.clone()));
        self.emit_history_changed();

        let track_id = track.id.clone();
        self.load_into_sink(track);

        self.store.save_history(&self.history);
        self.refresh_progress();

        self.play_counts.report(&track_id);
    }

    /// Make `track` current, persist it and hand its resource to the sink
    /// (paused)
    ///
    /// When the sink refuses the resource the track still becomes current,
    /// but the old media is paused and the session cannot play until a
    /// later track loads.
    fn load_into_sink(&mut self, track: Track) {
        self.media_ready = match self.sink.load(&track.audio_url) {
            Ok(()) => true,
            Err(e) => {
                warn!(track_id = %track.id, error = %e, "Sink failed to load track");
                self.sink.pause();
                self.emit(SessionEvent::PlaybackFailed {
                    message: e.to_string(),
                });
                false
            }
        };
        self.store.save_track(&track);

        let previous_track_id = self.current_track.as_ref().map(|t| t.id.clone());
        let index = self.index_of(&track.id);
        let track_id = track.id.clone();

        let was = self.state();
        self.current_track = Some(track);
        self.is_playing = false;
        self.last_persisted_elapsed = None;

        self.emit(SessionEvent::TrackChanged {
            track_id,
            index,
            previous_track_id,
        });
        if self.state() != was {
            self.emit(SessionEvent::StateChanged {
                state: self.state(),
            });
        }
    }

    /// Recompute progress from the sink and persist the whole elapsed
    /// seconds when they moved
    fn refresh_progress(&mut self) {
        let progress = if self.media_ready {
            Progress::from_sink(self.sink.current_time(), self.sink.duration())
        } else {
            Progress::default()
        };
        if progress != self.progress {
            self.progress = progress;
            self.emit(SessionEvent::ProgressUpdated { progress });
        }

        if self.current_track.is_some() {
            let whole = progress.whole_elapsed_secs();
            if self.last_persisted_elapsed != Some(whole) {
                self.store.save_elapsed(whole);
                self.last_persisted_elapsed = Some(whole);
            }
        }
    }

    fn set_playing(&mut self, playing: bool) {
        let was = self.state();
        self.is_playing = playing;
        let now = self.state();
        if now != was {
            self.emit(SessionEvent::StateChanged { state: now });
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        self.pending_events.push(event);
    }

    fn emit_history_changed(&mut self) {
        self.emit(SessionEvent::HistoryChanged {
            length: self.history.len(),
        });
    }
}
