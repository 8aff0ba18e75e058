//! Read operations for RedbStorage

use redb::ReadableTable;
use tracing::{debug, trace};

use super::converters::{
    NamespacedKey, decode_record, load_namespace, namespace_keys, namespace_names,
};
use super::{RedbStorage, URLS_TABLE, USERS_TABLE};
use crate::errors::{LinkvaultError, Result};
use crate::storage::UrlRecord;

/// 读取未删除的记录；不存在或已软删除时返回 None
pub(crate) fn read_live_record<T>(urls: &T, id: &str) -> Result<Option<UrlRecord>>
where
    T: ReadableTable<NamespacedKey, &'static [u8]>,
{
    let Some(fields) = load_namespace(urls, id)? else {
        return Ok(None);
    };

    let record = decode_record(id, &fields).map_err(|e| {
        LinkvaultError::decode(format!(r#"Unable to unmarshal URL "{}": {}"#, id, e.message()))
    })?;

    if record.is_deleted() {
        trace!("URL {} is soft-deleted", id);
        return Ok(None);
    }

    Ok(Some(record))
}

impl RedbStorage {
    /// Fetch a live record. Missing and soft-deleted records are both `None`.
    pub fn get(&self, id: &str) -> Result<Option<UrlRecord>> {
        self.read(|txn| {
            let urls = txn.open_table(URLS_TABLE)?;
            read_live_record(&urls, id)
        })
    }

    /// List records owned by `user`, or every record when `user` is empty.
    ///
    /// Soft-deleted IDs still present in an index are skipped. Order follows
    /// the table's key order.
    pub fn urls(&self, user: &str) -> Result<Vec<UrlRecord>> {
        let records = self.read(|txn| {
            let urls = txn.open_table(URLS_TABLE)?;

            let ids = if user.is_empty() {
                namespace_names(&urls)?
            } else {
                let users = txn.open_table(USERS_TABLE)?;
                namespace_keys(&users, user)?
            };

            let mut records = Vec::with_capacity(ids.len());
            for id in ids {
                if let Some(record) = read_live_record(&urls, &id)? {
                    records.push(record);
                }
            }
            Ok(records)
        })?;

        debug!(
            "Listed {} URLs for {}",
            records.len(),
            if user.is_empty() { "all users" } else { user }
        );
        Ok(records)
    }
}
