/// Track domain type
use super::clock::{format_clock, parse_clock};
use super::ids::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playable catalog entry
///
/// Field names follow the catalog service's JSON (`_id`, `desc`, `file`), so a
/// `Track` round-trips through the API and through the session store unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Stable catalog identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: TrackId,

    /// Display name
    pub name: String,

    /// Author / artist line
    #[serde(rename = "desc", alias = "author", default)]
    pub artist: String,

    /// Album name
    #[serde(default)]
    pub album: String,

    /// Cover image URL
    #[serde(default)]
    pub image: String,

    /// Audio resource URL handed to the sink
    #[serde(rename = "file")]
    pub audio_url: String,

    /// Track length, when the catalog knows it
    #[serde(default, with = "clock_serde", skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
}

impl Track {
    /// Create a track with the fields playback needs
    pub fn new(
        id: impl Into<TrackId>,
        name: impl Into<String>,
        audio_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            artist: String::new(),
            album: String::new(),
            image: String::new(),
            audio_url: audio_url.into(),
            duration: None,
        }
    }

    /// Set the artist line
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// Set the album name
    pub fn with_album(mut self, album: impl Into<String>) -> Self {
        self.album = album.into();
        self
    }

    /// Set the track length
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Length as `m:ss`, or `--:--` when unknown
    pub fn duration_label(&self) -> String {
        self.duration
            .map(format_clock)
            .unwrap_or_else(|| "--:--".to_string())
    }
}

/// Serde adapter for the catalog's `"m:ss"` duration strings
///
/// Numbers are read as seconds; unparsable strings become `None` rather than
/// failing the whole catalog.
mod clock_serde {
    use super::{format_clock, parse_clock};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Seconds(f64),
    }

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => serializer.serialize_str(&format_clock(*duration)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Raw>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Raw::Text(text)) => parse_clock(&text),
            Some(Raw::Seconds(secs)) if secs.is_finite() && secs >= 0.0 => {
                Some(Duration::from_secs_f64(secs))
            }
            _ => None,
        })
    }
}
