//! Redb-backed storage backend.
//!
//! Provides persistent key-value storage using redb with ACID guarantees.

use super::KvBackend;
use anyhow::{Context, Result};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

/// Table holding the encoded property values.
pub(crate) const KV_TABLE: TableDefinition<'static, &'static str, &'static [u8]> =
    TableDefinition::new("kv");

/// Redb-backed key-value storage backend.
///
/// Every operation runs in its own transaction, so a committed `set` is
/// visible to the next `get` and concurrent writers resolve last-write-wins.
///
/// # Thread Safety
///
/// `RedbBackend` is `Clone` and can be shared across threads. The underlying
/// database handles concurrent access safely.
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<Database>,
}

impl RedbBackend {
    /// Opens or creates a redb database at the given path.
    ///
    /// Creates parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory cannot be created
    /// - Database file cannot be opened or created (permissions, lock held by
    ///   another process, etc.)
    /// - Initialization transaction fails to begin or commit
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create store directory: {}", parent.display()))?;
        }

        let db = Database::create(path)
            .with_context(|| format!("Failed to open store database: {}", path.display()))?;

        // Create the table up front so read transactions never see it missing
        let write_txn = db
            .begin_write()
            .context("Failed to begin initialization transaction")?;
        {
            let _table = write_txn
                .open_table(KV_TABLE)
                .context("Failed to initialize KV table")?;
        }
        write_txn
            .commit()
            .context("Failed to commit initialization transaction")?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl KvBackend for RedbBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;

        let table = read_txn
            .open_table(KV_TABLE)
            .context("Failed to open KV table")?;

        let value = table
            .get(key)
            .with_context(|| format!("Failed to read key '{key}'"))?
            .map(|guard| guard.value().to_vec());

        Ok(value)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;

        {
            let mut table = write_txn
                .open_table(KV_TABLE)
                .context("Failed to open KV table")?;

            table
                .insert(key, value.as_slice())
                .with_context(|| format!("Failed to insert key '{key}'"))?;
        }

        write_txn
            .commit()
            .context("Failed to commit set transaction")?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let write_txn = self
            .db
            .begin_write()
            .context("Failed to begin write transaction")?;

        let removed = {
            let mut table = write_txn
                .open_table(KV_TABLE)
                .context("Failed to open KV table")?;

            table
                .remove(key)
                .with_context(|| format!("Failed to remove key '{key}'"))?
                .is_some()
        };

        write_txn
            .commit()
            .context("Failed to commit remove transaction")?;

        Ok(removed)
    }

    fn keys(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let read_txn = self
            .db
            .begin_read()
            .context("Failed to begin read transaction")?;

        let table = read_txn
            .open_table(KV_TABLE)
            .context("Failed to open KV table")?;

        let mut keys = Vec::new();
        for item in table.iter().context("Failed to iterate KV table")? {
            let (key, _value) = item.context("Failed to read KV entry")?;
            let key = key.value();

            if let Some(prefix) = prefix
                && !key.starts_with(prefix)
            {
                continue;
            }

            keys.push(key.to_string());
        }

        Ok(keys)
    }
}
