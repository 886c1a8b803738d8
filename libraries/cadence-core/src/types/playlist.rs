//! Playlist types

use super::ids::TrackId;
use serde::{Deserialize, Deserializer, Serialize};

/// A user playlist
///
/// The service returns `songs` either as bare ids or as partially populated
/// song documents depending on the route; only the ids are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "song_ids")]
    pub songs: Vec<TrackId>,
}

impl Playlist {
    /// Whether `track_id` is already in the playlist
    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.songs.contains(track_id)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SongRef {
    Id(TrackId),
    Document {
        #[serde(rename = "_id")]
        id: TrackId,
    },
}

fn song_ids<'de, D>(deserializer: D) -> Result<Vec<TrackId>, D::Error>
where
    D: Deserializer<'de>,
{
    let refs = Vec::<SongRef>::deserialize(deserializer)?;
    Ok(refs
        .into_iter()
        .map(|song| match song {
            SongRef::Id(id) | SongRef::Document { id } => id,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn songs_accept_ids_and_documents() {
        let json = r#"{
            "_id": "pl1",
            "name": "Road trip",
            "songs": ["a1", {"_id": "b2", "duration": "3:10"}]
        }"#;

        let playlist: Playlist = serde_json::from_str(json).unwrap();
        assert_eq!(playlist.songs, vec![TrackId::new("a1"), TrackId::new("b2")]);
        assert!(playlist.description.is_none());
        assert!(playlist.contains(&TrackId::new("b2")));
    }
}
