//! Mutation operations for RedbStorage
//!
//! Each operation is a single write transaction, except `view`, which reads
//! in one transaction and increments the counter in a second one.

use chrono::Utc;
use redb::ReadableTable;
use tracing::{debug, info};

use super::codec::{decode_views, encode_time, encode_views};
use super::converters::{
    NamespacedKey, decode_record, load_namespace, namespace_exists, put_field, write_record,
};
use super::{DELETED_KEY, EMPTY, MODIFIED_KEY, RedbStorage, URLS_TABLE, USERS_TABLE, VIEWS_KEY};
use crate::errors::{LinkvaultError, Result};
use crate::storage::{RecordState, UrlRecord};
use crate::utils::generate_random_code;

impl RedbStorage {
    /// Store `record` for `user` and return its ID.
    ///
    /// An empty `record.id` allocates a fresh random ID. A caller-supplied ID
    /// that was ever used, including by a soft-deleted record, is rejected.
    /// `views` is reset to zero.
    pub fn put(&self, record: &UrlRecord, user: &str) -> Result<String> {
        if user.is_empty() {
            return Err(LinkvaultError::validation("owning user must not be empty"));
        }

        let id = self.write(|txn| {
            let mut urls = txn.open_table(URLS_TABLE)?;

            let id = if record.id.is_empty() {
                self.allocate_id(&urls)?
            } else if namespace_exists(&urls, &record.id)? {
                return Err(LinkvaultError::already_exists(format!(
                    "URL {} already exists",
                    record.id
                )));
            } else {
                record.id.clone()
            };

            let stored = UrlRecord {
                id: id.clone(),
                user: user.to_string(),
                url: record.url.clone(),
                views: 0,
                expires: record.expires,
                last_modified: None,
                state: RecordState::Active,
            };
            write_record(&mut urls, &id, &stored, Utc::now())?;

            let mut users = txn.open_table(USERS_TABLE)?;
            put_field(&mut users, user, &id, EMPTY)?;

            Ok(id)
        })?;

        info!("URL {} created for user {}", id, user);
        Ok(id)
    }

    /// 生成未被占用的 ID，超过最大尝试次数后报错
    fn allocate_id<T>(&self, urls: &T) -> Result<String>
    where
        T: ReadableTable<NamespacedKey, &'static [u8]>,
    {
        for attempt in 1..=self.max_id_attempts {
            let candidate = generate_random_code(self.id_length);
            if !namespace_exists(urls, &candidate)? {
                if attempt > 1 {
                    debug!("Allocated URL id after {} attempts", attempt);
                }
                return Ok(candidate);
            }
        }

        Err(LinkvaultError::id_exhausted(format!(
            "no free URL id of length {} after {} attempts",
            self.id_length, self.max_id_attempts
        )))
    }

    /// Replace `url` and `expires` of a live record, keeping `user` and
    /// `views`.
    pub fn update(&self, id: &str, record: &UrlRecord) -> Result<()> {
        self.write(|txn| {
            let mut urls = txn.open_table(URLS_TABLE)?;

            let current = match load_namespace(&urls, id)? {
                Some(fields) => decode_record(id, &fields)?,
                None => {
                    return Err(LinkvaultError::not_found(format!(
                        r#"Unable to get URL "{}": URL doesn't exist"#,
                        id
                    )));
                }
            };
            if current.is_deleted() {
                return Err(LinkvaultError::not_found(format!(
                    r#"Unable to get URL "{}": URL doesn't exist"#,
                    id
                )));
            }

            let updated = UrlRecord {
                url: record.url.clone(),
                expires: record.expires,
                ..current
            };
            write_record(&mut urls, id, &updated, Utc::now())
        })?;

        info!("URL {} updated", id);
        Ok(())
    }

    /// Soft-delete: mark the record and refresh `modified`. Data and the user
    /// index are left in place.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.write(|txn| {
            let mut urls = txn.open_table(URLS_TABLE)?;

            if !namespace_exists(&urls, id)? {
                return Err(LinkvaultError::not_found(format!(
                    r#"Unable to open URL "{}": URL doesn't exist"#,
                    id
                )));
            }

            put_field(&mut urls, id, MODIFIED_KEY, &encode_time(&Utc::now()))?;
            put_field(&mut urls, id, DELETED_KEY, EMPTY)
        })?;

        info!("URL {} deleted", id);
        Ok(())
    }

    /// Resolve `id` to its target and count the visit.
    ///
    /// Returns an empty string for missing, deleted or expired records. The
    /// lookup and the increment are separate transactions; a delete landing
    /// between them still gets its view counted.
    pub fn view(&self, id: &str) -> Result<String> {
        let Some(record) = self.get(id)? else {
            return Ok(String::new());
        };

        if record.is_expired_at(Utc::now()) {
            debug!("URL {} has expired", id);
            return Ok(String::new());
        }

        self.write(|txn| {
            let mut urls = txn.open_table(URLS_TABLE)?;

            let views = match urls.get((id, VIEWS_KEY))? {
                Some(bytes) => decode_views(bytes.value())?,
                None => {
                    return Err(LinkvaultError::decode(format!(
                        r#"Unable to get "{}" value of "{}": value is missing"#,
                        VIEWS_KEY, id
                    )));
                }
            };

            put_field(
                &mut urls,
                id,
                VIEWS_KEY,
                &encode_views(views.saturating_add(1))?,
            )
        })?;

        debug!("URL {} viewed", id);
        Ok(record.url)
    }
}
