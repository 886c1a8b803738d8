//! Error types for the playback session

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The sink refused to start or load media
    #[error("Audio sink error: {0}")]
    Sink(String),

    /// The session runtime has shut down
    #[error("Session runtime stopped")]
    RuntimeStopped,
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
