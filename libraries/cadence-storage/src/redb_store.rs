//! Durable store backed by a redb database file

use crate::error::Result;
use cadence_core::KeyValueStore;
use redb::{Database, ReadableTable, TableDefinition};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Every session key lives in one string-to-string table
const SESSION_TABLE: TableDefinition<&str, &str> = TableDefinition::new("session");

/// Key-value store persisted to a redb file
///
/// Each `set`/`remove` is its own committed write transaction, so a value is
/// durable by the time the call returns.
pub struct RedbStore {
    db: Database,
    path: PathBuf,
}

impl RedbStore {
    /// Open (or create) the store at `path`
    ///
    /// Parent directories are created as needed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(&path).map_err(redb::Error::from)?;

        // Create the table up front so reads never hit a missing table
        let txn = db.begin_write().map_err(redb::Error::from)?;
        txn.open_table(SESSION_TABLE).map_err(redb::Error::from)?;
        txn.commit().map_err(redb::Error::from)?;

        debug!(path = %path.display(), "Opened session store");

        Ok(Self { db, path })
    }

    /// Location of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        let txn = self.db.begin_read().map_err(redb::Error::from)?;
        let table = txn.open_table(SESSION_TABLE).map_err(redb::Error::from)?;
        let value = table.get(key).map_err(redb::Error::from)?;
        Ok(value.map(|guard| guard.value().to_string()))
    }

    fn write(&self, key: &str, value: Option<&str>) -> Result<()> {
        let txn = self.db.begin_write().map_err(redb::Error::from)?;
        {
            let mut table = txn.open_table(SESSION_TABLE).map_err(redb::Error::from)?;
            match value {
                Some(value) => {
                    table.insert(key, value).map_err(redb::Error::from)?;
                }
                None => {
                    table.remove(key).map_err(redb::Error::from)?;
                }
            }
        }
        txn.commit().map_err(redb::Error::from)?;
        Ok(())
    }
}

impl KeyValueStore for RedbStore {
    fn get(&self, key: &str) -> cadence_core::Result<Option<String>> {
        Ok(self.read(key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> cadence_core::Result<()> {
        Ok(self.write(key, Some(value))?)
    }

    fn remove(&mut self, key: &str) -> cadence_core::Result<()> {
        Ok(self.write(key, None)?)
    }
}
