//! Fire-and-forget play-count reporting

use cadence_core::{PlayCountNotifier, TrackId};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Sends play-count increments on detached tasks
///
/// Callers never await the outcome. Failures are logged and dropped, and they
/// never affect the track change that triggered them. Without a tokio runtime
/// the report is skipped with a warning.
#[derive(Clone, Default)]
pub struct PlayCountReporter {
    notifier: Option<Arc<dyn PlayCountNotifier>>,
}

impl PlayCountReporter {
    /// Report through `notifier`
    pub fn new(notifier: Arc<dyn PlayCountNotifier>) -> Self {
        Self {
            notifier: Some(notifier),
        }
    }

    /// Reporter that drops every report
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether a notifier is attached
    pub fn is_enabled(&self) -> bool {
        self.notifier.is_some()
    }

    /// Spawn an increment for `track_id`
    ///
    /// The returned handle exists for tests; production callers drop it.
    pub fn report(&self, track_id: &TrackId) -> Option<JoinHandle<()>> {
        let notifier = Arc::clone(self.notifier.as_ref()?);

        let Ok(runtime) = Handle::try_current() else {
            warn!(track_id = %track_id, "No async runtime, skipping play count");
            return None;
        };

        let track_id = track_id.clone();
        Some(runtime.spawn(async move {
            match notifier.increment(&track_id).await {
                Ok(()) => debug!(track_id = %track_id, "Play count incremented"),
                Err(e) => warn!(track_id = %track_id, error = %e, "Failed to increment play count"),
            }
        }))
    }
}

impl fmt::Debug for PlayCountReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlayCountReporter")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cadence_core::CadenceError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<TrackId>>,
        fail: bool,
    }

    #[async_trait]
    impl PlayCountNotifier for Recorder {
        async fn increment(&self, track_id: &TrackId) -> cadence_core::Result<()> {
            self.seen.lock().unwrap().push(track_id.clone());
            if self.fail {
                Err(CadenceError::network("offline"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn disabled_reporter_spawns_nothing() {
        let reporter = PlayCountReporter::disabled();
        assert!(reporter.report(&TrackId::new("a")).is_none());
    }

    #[test]
    fn no_runtime_skips_report() {
        let recorder = Arc::new(Recorder::default());
        let reporter = PlayCountReporter::new(recorder.clone());
        assert!(reporter.report(&TrackId::new("a")).is_none());
        assert!(recorder.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn report_reaches_notifier() {
        let recorder = Arc::new(Recorder::default());
        let reporter = PlayCountReporter::new(recorder.clone());

        reporter.report(&TrackId::new("a")).unwrap().await.unwrap();
        assert_eq!(recorder.seen.lock().unwrap().as_slice(), &[TrackId::new("a")]);
    }

    #[tokio::test]
    async fn failures_are_swallowed() {
        let recorder = Arc::new(Recorder {
            fail: true,
            ..Recorder::default()
        });
        let reporter = PlayCountReporter::new(recorder.clone());

        // The task completes normally even though the notifier failed
        reporter.report(&TrackId::new("a")).unwrap().await.unwrap();
        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
    }
}
