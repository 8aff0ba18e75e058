//! redb storage backend
//!
//! Records live in two tables that stand in for nested namespaces:
//!
//! - `urls`: key `(id, field)`; every entry sharing an `id` forms that
//!   record's namespace (`user`, `url`, `views`, `expires`, `deleted`,
//!   `modified`)
//! - `users`: key `(user, id)` with an empty value; the per-user index
//!
//! Each public operation runs in its own transaction. Write transactions
//! commit only when the whole operation succeeded and are aborted otherwise.

pub mod codec;
mod converters;
mod mutations;
mod query;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadTransaction, TableDefinition, WriteTransaction};
use tracing::{info, warn};

use crate::config::DatabaseConfig;
use crate::errors::{LinkvaultError, Result};
use crate::storage::{UrlDb, UrlRecord};

pub(crate) const URLS_TABLE: TableDefinition<(&str, &str), &[u8]> = TableDefinition::new("urls");
pub(crate) const USERS_TABLE: TableDefinition<(&str, &str), &[u8]> =
    TableDefinition::new("users");

pub(crate) const USER_KEY: &str = "user";
pub(crate) const URL_KEY: &str = "url";
pub(crate) const VIEWS_KEY: &str = "views";
pub(crate) const EXPIRES_KEY: &str = "expires";
pub(crate) const DELETED_KEY: &str = "deleted";
pub(crate) const MODIFIED_KEY: &str = "modified";

pub(crate) const EMPTY: &[u8] = &[];

/// redb-backed URL record store
#[derive(Clone)]
pub struct RedbStorage {
    db: Arc<Database>,
    id_length: usize,
    max_id_attempts: usize,
}

impl RedbStorage {
    pub fn open(config: &DatabaseConfig) -> Result<Self> {
        Self::new(&config.path, config.id_length, config.max_id_attempts)
    }

    pub fn new<P: AsRef<Path>>(path: P, id_length: usize, max_id_attempts: usize) -> Result<Self> {
        let path = path.as_ref();
        if id_length == 0 || max_id_attempts == 0 {
            return Err(LinkvaultError::validation(
                "id length and max id attempts must be positive",
            ));
        }

        let db = Database::create(path).map_err(|e| {
            LinkvaultError::database_connection(format!(
                "Unable to create database {}: {}",
                path.display(),
                e
            ))
        })?;

        let storage = RedbStorage {
            db: Arc::new(db),
            id_length,
            max_id_attempts,
        };

        // 确保两个顶层表存在
        storage.write(|txn| {
            txn.open_table(URLS_TABLE)?;
            txn.open_table(USERS_TABLE)?;
            Ok(())
        })?;

        info!("redb storage initialized at {}", path.display());
        Ok(storage)
    }

    pub fn id_length(&self) -> usize {
        self.id_length
    }

    /// Run `op` in a write transaction.
    ///
    /// Commits on `Ok`. On `Err` the transaction is aborted; an abort failure
    /// is logged and the original error is returned.
    pub(crate) fn write<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&WriteTransaction) -> Result<T>,
    {
        let txn = self.db.begin_write().map_err(|e| {
            LinkvaultError::database_operation(format!(
                "Unable to open database for writing: {}",
                e
            ))
        })?;

        match op(&txn) {
            Ok(value) => {
                txn.commit().map_err(|e| {
                    LinkvaultError::database_operation(format!(
                        "Unable to commit transaction: {}",
                        e
                    ))
                })?;
                Ok(value)
            }
            Err(err) => {
                if let Err(abort_err) = txn.abort() {
                    warn!("Unable to rollback failed transaction: {}", abort_err);
                }
                Err(err)
            }
        }
    }

    /// Run `op` in a read-only snapshot. The transaction is released when
    /// this returns, on every path.
    pub(crate) fn read<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&ReadTransaction) -> Result<T>,
    {
        let txn = self.db.begin_read().map_err(|e| {
            LinkvaultError::database_operation(format!(
                "Unable to open database for reading: {}",
                e
            ))
        })?;

        op(&txn)
    }

    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(RedbStorage) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let storage = self.clone();
        tokio::task::spawn_blocking(move || op(storage))
            .await
            .map_err(|e| LinkvaultError::database_operation(format!("Storage task failed: {}", e)))?
    }
}

#[async_trait]
impl UrlDb for RedbStorage {
    async fn get(&self, id: &str) -> Result<Option<UrlRecord>> {
        let id = id.to_string();
        self.blocking(move |s| s.get(&id)).await
    }

    async fn put(&self, record: UrlRecord, user: &str) -> Result<String> {
        let user = user.to_string();
        self.blocking(move |s| s.put(&record, &user)).await
    }

    async fn update(&self, id: &str, record: UrlRecord) -> Result<()> {
        let id = id.to_string();
        self.blocking(move |s| s.update(&id, &record)).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.blocking(move |s| s.delete(&id)).await
    }

    async fn view(&self, id: &str) -> Result<String> {
        let id = id.to_string();
        self.blocking(move |s| s.view(&id)).await
    }

    async fn urls(&self, user: &str) -> Result<Vec<UrlRecord>> {
        let user = user.to_string();
        self.blocking(move |s| s.urls(&user)).await
    }
}
