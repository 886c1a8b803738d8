//! Async driver for a playback session
//!
//! Owns the [`PlaybackSession`] on a single task and feeds it commands, a
//! periodic tick and deferred resumes strictly one at a time. Everything else
//! talks to it through a cloneable [`SessionHandle`].

use crate::{
    error::{PlaybackError, Result},
    events::SessionEvent,
    session::PlaybackSession,
    types::SessionSnapshot,
};
use cadence_core::{Track, TrackId};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Command queue depth
const COMMAND_BUFFER: usize = 64;

/// Commands accepted by the runtime
#[derive(Debug)]
pub enum SessionCommand {
    Play,
    Pause,
    Next,
    Previous,
    Select(TrackId),
    /// Fraction of the track, 0.0 - 1.0
    Seek(f64),
    SetVolume(f32),
    SetShuffle(bool),
    LoadCatalog(Vec<Track>),
    RemoveHistoryEntry(usize),
    ClearHistory,
    CancelDeferredPlay,
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

/// Cloneable sender side of a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    /// Queue a raw command
    pub async fn send(&self, command: SessionCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| PlaybackError::RuntimeStopped)
    }

    pub async fn play(&self) -> Result<()> {
        self.send(SessionCommand::Play).await
    }

    pub async fn pause(&self) -> Result<()> {
        self.send(SessionCommand::Pause).await
    }

    pub async fn next(&self) -> Result<()> {
        self.send(SessionCommand::Next).await
    }

    pub async fn previous(&self) -> Result<()> {
        self.send(SessionCommand::Previous).await
    }

    pub async fn select(&self, id: TrackId) -> Result<()> {
        self.send(SessionCommand::Select(id)).await
    }

    pub async fn seek(&self, fraction: f64) -> Result<()> {
        self.send(SessionCommand::Seek(fraction)).await
    }

    pub async fn set_volume(&self, volume: f32) -> Result<()> {
        self.send(SessionCommand::SetVolume(volume)).await
    }

    pub async fn set_shuffle(&self, enabled: bool) -> Result<()> {
        self.send(SessionCommand::SetShuffle(enabled)).await
    }

    pub async fn load_catalog(&self, tracks: Vec<Track>) -> Result<()> {
        self.send(SessionCommand::LoadCatalog(tracks)).await
    }

    /// Current state, answered once every earlier command has been applied
    pub async fn snapshot(&self) -> Result<SessionSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| PlaybackError::RuntimeStopped)
    }

    /// Ask the runtime to stop after the commands already queued
    pub async fn shutdown(&self) -> Result<()> {
        self.send(SessionCommand::Shutdown).await
    }
}

/// Single-task owner of a playback session
pub struct SessionRuntime {
    session: PlaybackSession,
    commands: mpsc::Receiver<SessionCommand>,
    events: Option<mpsc::UnboundedSender<SessionEvent>>,
    tick_interval: Duration,
}

impl SessionRuntime {
    /// Wrap `session`; progress is refreshed every `tick_interval`
    pub fn new(session: PlaybackSession, tick_interval: Duration) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let runtime = Self {
            session,
            commands: rx,
            events: None,
            tick_interval,
        };
        (runtime, SessionHandle { commands: tx })
    }

    /// Forward session events to `events`
    pub fn with_event_sender(mut self, events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Process commands until shutdown or until every handle is dropped
    ///
    /// Returns the session so callers can inspect its final state.
    pub async fn run(mut self) -> PlaybackSession {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(tick_ms = self.tick_interval.as_millis() as u64, "Session runtime started");

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(SessionCommand::Shutdown) | None => break,
                    Some(command) => self.apply(command),
                },
                _ = ticker.tick() => self.session.tick(),
            }
            self.flush_events();

            if self.session.has_deferred_play() {
                // Resume only after the sink has seen the newly loaded media
                tokio::task::yield_now().await;
                self.session.run_deferred_plays();
                self.flush_events();
            }
        }

        info!("Session runtime stopped");
        self.session
    }

    fn apply(&mut self, command: SessionCommand) {
        debug!(?command, "Applying command");
        let session = &mut self.session;

        match command {
            SessionCommand::Play => {
                if let Err(e) = session.play() {
                    warn!(error = %e, "Play failed");
                }
            }
            SessionCommand::Pause => session.pause(),
            SessionCommand::Next => {
                session.next();
            }
            SessionCommand::Previous => {
                session.previous();
            }
            SessionCommand::Select(id) => {
                session.select_track(&id);
            }
            SessionCommand::Seek(fraction) => session.seek(fraction),
            SessionCommand::SetVolume(volume) => session.set_volume(volume),
            SessionCommand::SetShuffle(enabled) => session.set_shuffle(enabled),
            SessionCommand::LoadCatalog(tracks) => session.load_catalog(tracks),
            SessionCommand::RemoveHistoryEntry(position) => {
                session.remove_history_entry(position);
            }
            SessionCommand::ClearHistory => session.clear_history(),
            SessionCommand::CancelDeferredPlay => {
                session.cancel_deferred_play();
            }
            SessionCommand::Snapshot(reply) => {
                // Receiver may have given up; nothing to do then
                let _ = reply.send(session.snapshot());
            }
            SessionCommand::Shutdown => {}
        }
    }

    fn flush_events(&mut self) {
        let events = self.session.drain_events();
        let Some(sender) = &self.events else {
            return;
        };

        for event in events {
            if sender.send(event).is_err() {
                debug!("Event receiver dropped, no longer forwarding");
                self.events = None;
                return;
            }
        }
    }
}
