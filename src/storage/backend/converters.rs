//! Namespace access and record conversion
//!
//! A namespace is the run of entries in a `(name, key)` table that share
//! `name`. These helpers read, test and write such runs and convert them to
//! and from [`UrlRecord`].

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use redb::{ReadableTable, Table};

use super::codec::{
    decode_str, decode_time, decode_views, encode_str, encode_time, encode_views,
};
use super::{DELETED_KEY, EXPIRES_KEY, MODIFIED_KEY, URL_KEY, USER_KEY, VIEWS_KEY};
use crate::errors::{LinkvaultError, Result};
use crate::storage::{RecordState, UrlRecord};

pub(crate) type NamespacedKey = (&'static str, &'static str);
pub(crate) type Fields = HashMap<String, Vec<u8>>;

/// 读取命名空间内的全部键值，命名空间不存在时返回 None
pub(crate) fn load_namespace<T>(table: &T, name: &str) -> Result<Option<Fields>>
where
    T: ReadableTable<NamespacedKey, &'static [u8]>,
{
    let mut fields = Fields::new();
    for entry in table.range((name, "")..)? {
        let (key, value) = entry?;
        let (namespace, field) = key.value();
        if namespace != name {
            break;
        }
        fields.insert(field.to_string(), value.value().to_vec());
    }

    Ok((!fields.is_empty()).then_some(fields))
}

pub(crate) fn namespace_exists<T>(table: &T, name: &str) -> Result<bool>
where
    T: ReadableTable<NamespacedKey, &'static [u8]>,
{
    match table.range((name, "")..)?.next() {
        Some(entry) => {
            let (key, _) = entry?;
            Ok(key.value().0 == name)
        }
        None => Ok(false),
    }
}

/// 命名空间内所有键名（按存储顺序）
pub(crate) fn namespace_keys<T>(table: &T, name: &str) -> Result<Vec<String>>
where
    T: ReadableTable<NamespacedKey, &'static [u8]>,
{
    let mut keys = Vec::new();
    for entry in table.range((name, "")..)? {
        let (key, _) = entry?;
        let (namespace, field) = key.value();
        if namespace != name {
            break;
        }
        keys.push(field.to_string());
    }
    Ok(keys)
}

/// 所有顶层命名空间名称（去重，按存储顺序）
pub(crate) fn namespace_names<T>(table: &T) -> Result<Vec<String>>
where
    T: ReadableTable<NamespacedKey, &'static [u8]>,
{
    let mut names: Vec<String> = Vec::new();
    for entry in table.iter()? {
        let (key, _) = entry?;
        let (namespace, _) = key.value();
        if names.last().map(String::as_str) != Some(namespace) {
            names.push(namespace.to_string());
        }
    }
    Ok(names)
}

pub(crate) fn put_field(
    table: &mut Table<'_, NamespacedKey, &'static [u8]>,
    name: &str,
    field: &str,
    value: &[u8],
) -> Result<()> {
    table.insert((name, field), value).map_err(|e| {
        LinkvaultError::database_operation(format!(
            r#"Unable to put "{}" value in "{}": {}"#,
            field, name, e
        ))
    })?;
    Ok(())
}

pub(crate) fn remove_field(
    table: &mut Table<'_, NamespacedKey, &'static [u8]>,
    name: &str,
    field: &str,
) -> Result<()> {
    table.remove((name, field)).map_err(|e| {
        LinkvaultError::database_operation(format!(
            r#"Unable to delete "{}" in "{}": {}"#,
            field, name, e
        ))
    })?;
    Ok(())
}

fn required<'a>(fields: &'a Fields, field: &str) -> Result<&'a [u8]> {
    fields.get(field).map(Vec::as_slice).ok_or_else(|| {
        LinkvaultError::decode(format!(r#"Unable to get "{}" value: value is missing"#, field))
    })
}

/// Decode a record namespace. Missing `user`, `url`, `views` or `modified`
/// is an error; a missing `expires` means the record never expires.
pub(crate) fn decode_record(id: &str, fields: &Fields) -> Result<UrlRecord> {
    let user = decode_str(USER_KEY, required(fields, USER_KEY)?)?;
    let url = decode_str(URL_KEY, required(fields, URL_KEY)?)?;
    let views = decode_views(required(fields, VIEWS_KEY)?)?;

    let expires = fields
        .get(EXPIRES_KEY)
        .map(|bytes| decode_time(bytes))
        .transpose()?;
    let last_modified = decode_time(required(fields, MODIFIED_KEY)?)?;

    let state = if fields.contains_key(DELETED_KEY) {
        RecordState::Deleted
    } else {
        RecordState::Active
    };

    Ok(UrlRecord {
        id: id.to_string(),
        user,
        url,
        views,
        expires,
        last_modified: Some(last_modified),
        state,
    })
}

/// 写入记录字段：user、url、views、expires（为空时删除）以及 modified
pub(crate) fn write_record(
    table: &mut Table<'_, NamespacedKey, &'static [u8]>,
    id: &str,
    record: &UrlRecord,
    modified: DateTime<Utc>,
) -> Result<()> {
    put_field(table, id, USER_KEY, encode_str(&record.user))?;
    put_field(table, id, URL_KEY, encode_str(&record.url))?;
    put_field(table, id, VIEWS_KEY, &encode_views(record.views)?)?;

    match record.expires {
        Some(expires) => put_field(table, id, EXPIRES_KEY, &encode_time(&expires))?,
        None => remove_field(table, id, EXPIRES_KEY)?,
    }

    put_field(table, id, MODIFIED_KEY, &encode_time(&modified))
}
