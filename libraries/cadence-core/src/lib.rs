//! Cadence Core
//!
//! Domain types, collaborator traits and error handling shared by every
//! Cadence crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Album`, `Playlist`, `TrackId`
//! - **Collaborator Traits**: `Catalog`, `KeyValueStore`, `PlayCountNotifier`
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{Track, TrackId};
//! use std::time::Duration;
//!
//! let track = Track::new("64f1c0", "Midnight City", "https://cdn.example.com/midnight.mp3")
//!     .with_duration(Duration::from_secs(243));
//!
//! assert_eq!(track.id, TrackId::new("64f1c0"));
//! assert_eq!(track.duration_label(), "4:03");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{CadenceError, Result};
pub use traits::{Catalog, KeyValueStore, PlayCountNotifier};
pub use types::{Album, Playlist, Track, TrackId};
