//! Cadence Storage
//!
//! Implementations of [`cadence_core::KeyValueStore`] for the playback session:
//!
//! - [`MemoryStore`]: process-local, for tests and ephemeral sessions
//! - [`RedbStore`]: durable, a single-table [`redb`] database file
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_core::KeyValueStore;
//! use cadence_storage::RedbStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = RedbStore::open("cadence-session.redb")?;
//! store.set("player_volume", "0.3")?;
//! assert_eq!(store.get("player_volume")?.as_deref(), Some("0.3"));
//! # Ok(())
//! # }
//! ```

mod error;
mod memory;
mod redb_store;

pub use error::{Result, StorageError};
pub use memory::MemoryStore;
pub use redb_store::RedbStore;
