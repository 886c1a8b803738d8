//! Composition root for the interactive player
//!
//! Wires the redb store, the API client and a simulated sink into a playback
//! session running on its own task.

use crate::config::CliConfig;
use cadence_client::CadenceClient;
use anyhow::Context;
use cadence_core::{Catalog, KeyValueStore, Track};
use cadence_playback::{
    PlaybackSession, SessionEvent, SessionHandle, SessionRuntime, SimulatedSink,
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

/// A session running on a background task
pub struct RunningPlayer {
    pub handle: SessionHandle,
    pub events: mpsc::UnboundedReceiver<SessionEvent>,
    pub task: JoinHandle<PlaybackSession>,
}

/// Read the catalog the session will play from
pub async fn fetch_catalog(catalog: &dyn Catalog) -> anyhow::Result<Vec<Track>> {
    let tracks = catalog
        .list_tracks()
        .await
        .context("failed to fetch the catalog")?;
    info!(tracks = tracks.len(), "Catalog fetched");
    Ok(tracks)
}

/// Sink that knows the length of every catalog track
pub fn simulated_sink(tracks: &[Track]) -> SimulatedSink {
    let mut sink = SimulatedSink::new();
    for track in tracks {
        if let Some(length) = track.duration {
            sink.register(track.audio_url.clone(), length);
        }
    }
    sink
}

/// Build the session and start its runtime
///
/// The catalog is queued as the first command so the persisted last track
/// is restored before any user input is applied.
pub async fn start(
    config: &CliConfig,
    store: Box<dyn KeyValueStore>,
    client: CadenceClient,
    tracks: Vec<Track>,
) -> anyhow::Result<RunningPlayer> {
    let sink = simulated_sink(&tracks);
    let session = PlaybackSession::new(config.session_config(), Box::new(sink), store)
        .with_play_count_notifier(Arc::new(client));

    let (events_tx, events) = mpsc::unbounded_channel();
    let (runtime, handle) = SessionRuntime::new(session, config.tick_interval());
    let task = tokio::spawn(runtime.with_event_sender(events_tx).run());

    handle.load_catalog(tracks).await?;
    info!("Player started");

    Ok(RunningPlayer {
        handle,
        events,
        task,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cadence_core::CadenceError;
    use cadence_playback::AudioSink;
    use std::time::Duration;

    struct FixedCatalog(cadence_core::Result<Vec<Track>>);

    #[async_trait]
    impl Catalog for FixedCatalog {
        async fn list_tracks(&self) -> cadence_core::Result<Vec<Track>> {
            match &self.0 {
                Ok(tracks) => Ok(tracks.clone()),
                Err(e) => Err(CadenceError::network(e.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn catalog_is_read_through_the_trait() {
        let catalog = FixedCatalog(Ok(vec![Track::new("a", "A", "https://cdn/a.mp3")]));
        let tracks = fetch_catalog(&catalog).await.unwrap();
        assert_eq!(tracks[0].id, "a");

        let offline = FixedCatalog(Err(CadenceError::network("offline")));
        let err = fetch_catalog(&offline).await.unwrap_err();
        assert!(err.to_string().contains("failed to fetch the catalog"));
    }

    #[test]
    fn sink_learns_track_lengths() {
        let tracks = vec![
            Track::new("a", "A", "https://cdn/a.mp3").with_duration(Duration::from_secs(90)),
            Track::new("b", "B", "https://cdn/b.mp3"),
        ];
        let mut sink = simulated_sink(&tracks);

        sink.load("https://cdn/a.mp3").unwrap();
        assert_eq!(sink.duration(), Some(Duration::from_secs(90)));

        sink.load("https://cdn/b.mp3").unwrap();
        assert_eq!(sink.duration(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn player_restores_catalog_before_commands() {
        let config = CliConfig::default();
        let client = CadenceClient::new(config.client_config(None)).unwrap();
        let tracks = vec![
            Track::new("a", "A", "https://cdn/a.mp3").with_duration(Duration::from_secs(90)),
            Track::new("b", "B", "https://cdn/b.mp3").with_duration(Duration::from_secs(90)),
        ];
        let store: Box<dyn KeyValueStore> = Box::new(cadence_storage::MemoryStore::new());

        let player = start(&config, store, client, tracks).await.unwrap();
        let snapshot = player.handle.snapshot().await.unwrap();
        assert_eq!(snapshot.catalog_len, 2);
        assert_eq!(snapshot.current_index, Some(0));

        player.handle.shutdown().await.unwrap();
        player.task.await.unwrap();
    }
}
