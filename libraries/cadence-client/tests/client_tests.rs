//! Tests for the Cadence API client.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a real server connection.

use cadence_client::{AuthSession, CadenceClient, ClientConfig, ClientError, TOKEN_KEY};
use cadence_core::{Catalog, KeyValueStore, PlayCountNotifier, TrackId};
use cadence_storage::MemoryStore;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn song_list_body() -> serde_json::Value {
    json!({
        "success": true,
        "source": "database",
        "songs": [
            {
                "_id": "a1",
                "name": "First Light",
                "desc": "Aurora Set",
                "album": "Dawn",
                "image": "https://cdn.test/a1.jpg",
                "file": "https://cdn.test/a1.mp3",
                "duration": "3:27"
            },
            {
                "_id": "b2",
                "name": "Second Wind",
                "desc": "Aurora Set",
                "album": "Dawn",
                "image": "https://cdn.test/b2.jpg",
                "file": "https://cdn.test/b2.mp3",
                "duration": "4:5"
            }
        ]
    })
}

async fn client_for(server: &MockServer) -> CadenceClient {
    CadenceClient::new(ClientConfig::new(server.uri())).unwrap()
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_valid_http_url() {
        assert!(CadenceClient::new(ClientConfig::new("http://localhost:4000")).is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        match CadenceClient::new(ClientConfig::new("  ")) {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidUrl error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_ftp_scheme_rejected() {
        let result = CadenceClient::new(ClientConfig::new("ftp://example.com"));
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_garbage_url_rejected() {
        let result = CadenceClient::new(ClientConfig::new("not a url"));
        assert!(matches!(result, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = CadenceClient::new(ClientConfig::new("https://api.example.com/")).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
    }
}

// =============================================================================
// Catalog Tests
// =============================================================================

mod catalog {
    use super::*;

    #[tokio::test]
    async fn test_fetch_tracks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/song/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(song_list_body()))
            .expect(1)
            .mount(&server)
            .await;

        let tracks = client_for(&server).await.fetch_tracks().await.unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].id, "a1");
        assert_eq!(tracks[0].audio_url, "https://cdn.test/a1.mp3");
        assert_eq!(tracks[1].duration, Some(Duration::from_secs(245)));
    }

    #[tokio::test]
    async fn test_catalog_trait_delegates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/song/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(song_list_body()))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let catalog: &dyn Catalog = &client;
        assert_eq!(catalog.list_tracks().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_rejected_song_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/song/list"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": false, "message": "db offline"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_tracks().await.unwrap_err();
        assert!(matches!(err, ClientError::Rejected(msg) if msg == "db offline"));
    }

    #[tokio::test]
    async fn test_server_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/song/list"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_tracks().await.unwrap_err();
        match err {
            ClientError::ServerError { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "maintenance");
            }
            other => panic!("Expected ServerError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/song/list"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_tracks().await.unwrap_err();
        assert!(matches!(err, ClientError::ParseError(_)));
    }

    #[tokio::test]
    async fn test_fetch_albums() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/album/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "albums": [{
                    "_id": "al1",
                    "name": "Dawn",
                    "desc": "Morning record",
                    "bgColour": "#223344",
                    "image": "https://cdn.test/dawn.jpg"
                }]
            })))
            .mount(&server)
            .await;

        let albums = client_for(&server).await.fetch_albums().await.unwrap();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].name, "Dawn");
        assert_eq!(albums[0].bg_colour.as_deref(), Some("#223344"));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = CadenceClient::new(
            ClientConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2)),
        )
        .unwrap();
        let err = client.fetch_tracks().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::ServerUnreachable(_) | ClientError::Request(_)
        ));
    }
}

// =============================================================================
// Play Count Tests
// =============================================================================

mod play_count {
    use super::*;

    #[tokio::test]
    async fn test_increment_uses_put_route() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/song/songs/a1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "playCount": 8})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let count = client_for(&server)
            .await
            .increment_play_count(&TrackId::new("a1"))
            .await
            .unwrap();
        assert_eq!(count, Some(8));
    }

    #[tokio::test]
    async fn test_unknown_song_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/song/songs/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(json!({"success": false, "message": "Song not found"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let notifier: &dyn PlayCountNotifier = &client;
        let err = notifier.increment(&TrackId::new("missing")).await.unwrap_err();
        assert!(err.to_string().contains("404"));
    }
}

// =============================================================================
// Authentication Tests
// =============================================================================

mod authentication {
    use super::*;

    #[tokio::test]
    async fn test_login_attaches_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/user/login"))
            .and(body_json(json!({"email": "ana@example.com", "password": "hunter2"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"success": true, "token": "jwt-1"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/song/list"))
            .and(header("authorization", "Bearer jwt-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(song_list_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert!(!client.is_authenticated().await);

        let token = client.login("ana@example.com", "hunter2").await.unwrap();
        assert_eq!(token, "jwt-1");
        assert!(client.is_authenticated().await);

        client.fetch_tracks().await.unwrap();
    }

    #[tokio::test]
    async fn test_login_refused() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/user/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"success": false, "message": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.login("ana@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, ClientError::AuthFailed(msg) if msg == "Invalid credentials"));
        assert!(!client.is_authenticated().await);
    }

    #[test]
    fn test_auth_session_round_trip() {
        let mut auth = AuthSession::restore(MemoryStore::new()).unwrap();
        auth.login("jwt-2").unwrap();

        let store = auth.into_store();
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("jwt-2"));

        let mut auth = AuthSession::restore(store).unwrap();
        assert!(auth.is_logged_in());
        auth.logout().unwrap();
        assert!(auth.into_store().get(TOKEN_KEY).unwrap().is_none());
    }
}

// =============================================================================
// Playlist Tests
// =============================================================================

mod playlists {
    use super::*;

    async fn signed_in_client(server: &MockServer) -> CadenceClient {
        CadenceClient::new(ClientConfig::new(server.uri()).with_token("jwt-9")).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_playlists_sends_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/playlist"))
            .and(header("authorization", "Bearer jwt-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cached": false,
                "playlists": [
                    {"_id": "p1", "name": "Focus", "songs": [{"_id": "a1", "duration": "3:27"}]},
                    {"_id": "p2", "name": "Gym", "description": "loud", "songs": []}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let playlists = signed_in_client(&server).await.fetch_playlists().await.unwrap();
        assert_eq!(playlists.len(), 2);
        assert_eq!(playlists[0].songs, vec![TrackId::new("a1")]);
        assert_eq!(playlists[1].description.as_deref(), Some("loud"));
    }

    #[tokio::test]
    async fn test_playlists_need_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/playlist"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server).await.fetch_playlists().await.unwrap_err();
        assert!(matches!(err, ClientError::AuthRequired));
    }

    #[tokio::test]
    async fn test_expired_token_is_auth_required() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/playlist"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Not authorized"})))
            .mount(&server)
            .await;

        let err = signed_in_client(&server).await.fetch_playlists().await.unwrap_err();
        assert!(matches!(err, ClientError::AuthRequired));
    }

    #[tokio::test]
    async fn test_add_to_playlist_posts_ids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/playlist/add-song"))
            .and(header("authorization", "Bearer jwt-9"))
            .and(body_json(json!({"playlistId": "p1", "songId": "b2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Song added to playlist!",
                "playlist": {"_id": "p1", "name": "Focus", "songs": ["a1", "b2"]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let playlist = signed_in_client(&server)
            .await
            .add_to_playlist("p1", &TrackId::new("b2"))
            .await
            .unwrap();
        assert!(playlist.contains(&TrackId::new("b2")));
        assert_eq!(playlist.songs.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_song_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/playlist/add-song"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Song already in playlist"})),
            )
            .mount(&server)
            .await;

        let err = signed_in_client(&server)
            .await
            .add_to_playlist("p1", &TrackId::new("a1"))
            .await
            .unwrap_err();
        match err {
            ClientError::ServerError { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("already in playlist"));
            }
            other => panic!("Expected ServerError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_playlist() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/playlist"))
            .and(body_json(json!({"name": "Night"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "message": "Playlist created successfully!",
                "playlist": {"_id": "p3", "name": "Night", "songs": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let playlist = signed_in_client(&server)
            .await
            .create_playlist("Night", None)
            .await
            .unwrap();
        assert_eq!(playlist.id, "p3");
        assert!(playlist.songs.is_empty());
    }
}

// =============================================================================
// Search Tests
// =============================================================================

mod search {
    use super::*;

    #[tokio::test]
    async fn test_search_passes_query() {
        let server = MockServer::start().await;
        let songs = song_list_body()["songs"].clone();
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .and(query_param("q", "first light"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "songs": [songs[0].clone()],
                "albums": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let results = client_for(&server).await.search("  first light ").await.unwrap();
        assert_eq!(results.songs.len(), 1);
        assert_eq!(results.songs[0].name, "First Light");
        assert!(results.albums.is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_not_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let err = client_for(&server).await.search("   ").await.unwrap_err();
        assert!(matches!(err, ClientError::Rejected(_)));
    }
}
