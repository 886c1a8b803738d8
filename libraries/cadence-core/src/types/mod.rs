mod album;
mod clock;
mod ids;
mod playlist;
mod track;

pub use album::Album;
pub use clock::{format_clock, parse_clock};
pub use ids::TrackId;
pub use playlist::Playlist;
pub use track::Track;
