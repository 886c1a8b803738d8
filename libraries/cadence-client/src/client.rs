//! Main Cadence API client.

use crate::error::{ClientError, Result};
use crate::types::{
    AddSongRequest, AlbumListResponse, ClientConfig, CreatePlaylistRequest, LoginRequest,
    LoginResponse, PlayCountResponse, PlaylistListResponse, PlaylistResponse, SearchResults,
    SongListResponse,
};
use async_trait::async_trait;
use cadence_core::{Album, Catalog, PlayCountNotifier, Playlist, Track, TrackId};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

/// Client for the Cadence catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and the token.
///
/// # Example
///
/// ```ignore
/// use cadence_client::{CadenceClient, ClientConfig};
///
/// let client = CadenceClient::new(ClientConfig::new("http://localhost:4000"))?;
/// let tracks = client.fetch_tracks().await?;
/// println!("Found {} tracks", tracks.len());
/// ```
#[derive(Debug, Clone)]
pub struct CadenceClient {
    http: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl CadenceClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.url.trim().is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let parsed = Url::parse(config.url.trim())
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let base_url = config.url.trim().trim_end_matches('/').to_string();

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Cadence/{} (CLI)", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: Arc::new(RwLock::new(config.token)),
        })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Replace the bearer token (None to sign out).
    pub async fn set_token(&self, token: Option<String>) {
        *self.token.write().await = token;
    }

    /// Whether a bearer token is attached.
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// Fetch the full song catalog.
    pub async fn fetch_tracks(&self) -> Result<Vec<Track>> {
        let url = format!("{}/api/song/list", self.base_url);
        debug!(url = %url, "Fetching song list");

        let request = self.authorized(self.http.get(&url)).await;
        let response: SongListResponse = self.send_json(request, "song list").await?;

        if !response.success {
            return Err(ClientError::Rejected(
                response.message.unwrap_or_else(|| "song list unavailable".into()),
            ));
        }

        debug!(
            songs = response.songs.len(),
            source = response.source.as_deref().unwrap_or("unknown"),
            "Fetched song list"
        );
        Ok(response.songs)
    }

    /// Fetch every album.
    pub async fn fetch_albums(&self) -> Result<Vec<Album>> {
        let url = format!("{}/api/album/list", self.base_url);
        debug!(url = %url, "Fetching album list");

        let request = self.authorized(self.http.get(&url)).await;
        let response: AlbumListResponse = self.send_json(request, "album list").await?;

        if !response.success {
            return Err(ClientError::Rejected(
                response.message.unwrap_or_else(|| "album list unavailable".into()),
            ));
        }

        debug!(albums = response.albums.len(), "Fetched album list");
        Ok(response.albums)
    }

    /// Increment the play count of a song, returning the new count if the
    /// server reports it.
    pub async fn increment_play_count(&self, track_id: &TrackId) -> Result<Option<u64>> {
        let url = format!("{}/api/song/songs/{}", self.base_url, track_id);
        debug!(url = %url, track_id = %track_id, "Incrementing play count");

        let request = self.authorized(self.http.put(&url)).await;
        let response: PlayCountResponse = self.send_json(request, "play count").await?;

        if !response.success {
            return Err(ClientError::Rejected(
                response.message.unwrap_or_else(|| "play count not updated".into()),
            ));
        }
        Ok(response.play_count)
    }

    /// Sign in with email and password.
    ///
    /// On success the token is attached to subsequent requests and returned
    /// so the caller can persist it.
    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let url = format!("{}/api/user/login", self.base_url);
        debug!(url = %url, "Logging in");

        let request = self.http.post(&url).json(&LoginRequest { email, password });
        let response: LoginResponse = self.send_json(request, "login").await?;

        match (response.success, response.token) {
            (true, Some(token)) => {
                self.set_token(Some(token.clone())).await;
                info!("Logged in");
                Ok(token)
            }
            (true, None) => Err(ClientError::ParseError("login response has no token".into())),
            (false, _) => Err(ClientError::AuthFailed(
                response.message.unwrap_or_else(|| "login refused".into()),
            )),
        }
    }

    /// Search songs and albums by name (case-insensitive substring).
    pub async fn search(&self, query: &str) -> Result<SearchResults> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ClientError::Rejected("search query is empty".into()));
        }

        let url = format!("{}/api/search", self.base_url);
        debug!(url = %url, query = %query, "Searching catalog");

        let request = self.http.get(&url).query(&[("q", query)]);
        let results: SearchResults = self.send_json(request, "search results").await?;

        debug!(
            songs = results.songs.len(),
            albums = results.albums.len(),
            "Search complete"
        );
        Ok(results)
    }

    // ===== Playlists =====

    /// Fetch the signed-in user's playlists.
    pub async fn fetch_playlists(&self) -> Result<Vec<Playlist>> {
        let url = format!("{}/api/playlist", self.base_url);
        debug!(url = %url, "Fetching playlists");

        let request = self.signed_in(self.http.get(&url)).await?;
        let response: PlaylistListResponse = self.send_json(request, "playlists").await?;

        let playlists = response.into_playlists();
        debug!(playlists = playlists.len(), "Fetched playlists");
        Ok(playlists)
    }

    /// Create an empty playlist for the signed-in user.
    pub async fn create_playlist(&self, name: &str, description: Option<&str>) -> Result<Playlist> {
        let url = format!("{}/api/playlist", self.base_url);
        debug!(url = %url, name = %name, "Creating playlist");

        let request = self
            .signed_in(self.http.post(&url))
            .await?
            .json(&CreatePlaylistRequest { name, description });
        let response: PlaylistResponse = self.send_json(request, "created playlist").await?;

        info!(playlist_id = %response.playlist.id, "Playlist created");
        Ok(response.playlist)
    }

    /// Append a song to one of the signed-in user's playlists.
    ///
    /// The server refuses songs already in the playlist and playlists owned
    /// by someone else; both come back as [`ClientError::ServerError`].
    pub async fn add_to_playlist(&self, playlist_id: &str, track_id: &TrackId) -> Result<Playlist> {
        let url = format!("{}/api/playlist/add-song", self.base_url);
        debug!(
            url = %url,
            playlist_id = %playlist_id,
            track_id = %track_id,
            "Adding song to playlist"
        );

        let request = self
            .signed_in(self.http.post(&url))
            .await?
            .json(&AddSongRequest {
                playlist_id,
                song_id: track_id,
            });
        let response: PlaylistResponse = self.send_json(request, "playlist").await?;

        info!(playlist_id = %playlist_id, track_id = %track_id, "Song added to playlist");
        Ok(response.playlist)
    }

    async fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.token.read().await.as_deref() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Like `authorized`, but fails without a token
    async fn signed_in(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        match self.token.read().await.as_deref() {
            Some(token) => Ok(request.bearer_auth(token)),
            None => Err(ClientError::AuthRequired),
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, what: &str) -> Result<T> {
        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::ServerUnreachable(e.to_string())
            } else {
                ClientError::Request(e)
            }
        })?;

        Self::parse(response, what).await
    }

    async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)))
        } else if status.as_u16() == 401 {
            Err(ClientError::AuthRequired)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message: error_text,
            })
        }
    }
}

#[async_trait]
impl Catalog for CadenceClient {
    async fn list_tracks(&self) -> cadence_core::Result<Vec<Track>> {
        Ok(self.fetch_tracks().await?)
    }
}

#[async_trait]
impl PlayCountNotifier for CadenceClient {
    async fn increment(&self, track_id: &TrackId) -> cadence_core::Result<()> {
        let count = self.increment_play_count(track_id).await?;
        debug!(track_id = %track_id, play_count = ?count, "Play count updated");
        Ok(())
    }
}
