//! Cadence API Client
//!
//! HTTP client for the Cadence catalog API.
//!
//! # Features
//!
//! - **Catalog**: Fetch the song and album lists
//! - **Play counts**: Report plays (`PUT /api/song/songs/{id}`)
//! - **Playlists**: List and create the user's playlists, add songs to them
//! - **Search**: Match songs and albums by name
//! - **Authentication**: Email/password login, persisted bearer token
//!
//! `CadenceClient` implements the `Catalog` and `PlayCountNotifier` traits
//! from `cadence-core`, so it plugs straight into a playback session.
//!
//! # Example
//!
//! ```ignore
//! use cadence_client::{CadenceClient, ClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CadenceClient::new(ClientConfig::new("http://localhost:4000"))?;
//!
//!     let tracks = client.fetch_tracks().await?;
//!     println!("Found {} tracks", tracks.len());
//!
//!     if let Some(track) = tracks.first() {
//!         client.increment_play_count(&track.id).await?;
//!     }
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod error;
mod types;

// Re-export main types
pub use auth::{AuthSession, TOKEN_KEY};
pub use client::CadenceClient;
pub use error::{ClientError, Result};
pub use types::{
    AlbumListResponse, ClientConfig, LoginResponse, PlayCountResponse, PlaylistListResponse,
    PlaylistResponse, SearchResults, SongListResponse,
};
