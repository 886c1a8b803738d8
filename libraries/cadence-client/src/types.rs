//! Types for the Cadence catalog API.

use cadence_core::{Album, Playlist, Track, TrackId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for connecting to the catalog API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "http://localhost:4000")
    pub url: String,
    /// Bearer token attached to requests, if signed in
    pub token: Option<String>,
    /// Whole-request timeout
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Attach a bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// `GET /api/song/list`
#[derive(Debug, Clone, Deserialize)]
pub struct SongListResponse {
    pub success: bool,
    #[serde(default)]
    pub songs: Vec<Track>,
    /// Where the server read the list from ("cache" or "database")
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/album/list`
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumListResponse {
    pub success: bool,
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `PUT /api/song/songs/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct PlayCountResponse {
    pub success: bool,
    #[serde(rename = "playCount", default)]
    pub play_count: Option<u64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `POST /api/user/login` request body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `POST /api/user/login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /api/playlist`
///
/// Older deployments answer with a bare array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlaylistListResponse {
    Wrapped {
        playlists: Vec<Playlist>,
        #[serde(default)]
        cached: bool,
    },
    Bare(Vec<Playlist>),
}

impl PlaylistListResponse {
    /// The playlists, whichever shape they came in
    pub fn into_playlists(self) -> Vec<Playlist> {
        match self {
            Self::Wrapped { playlists, .. } | Self::Bare(playlists) => playlists,
        }
    }
}

/// `POST /api/playlist` request body
#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

/// `POST /api/playlist/add-song` request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddSongRequest<'a> {
    pub playlist_id: &'a str,
    pub song_id: &'a TrackId,
}

/// `POST /api/playlist` and `POST /api/playlist/add-song`
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub playlist: Playlist,
}

/// `GET /api/search?q=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    #[serde(default)]
    pub songs: Vec<Track>,
    #[serde(default)]
    pub albums: Vec<Album>,
}

impl SearchResults {
    /// Whether nothing matched
    pub fn is_empty(&self) -> bool {
        self.songs.is_empty() && self.albums.is_empty()
    }
}
