//! Field encoding for stored records
//!
//! - views: unsigned LEB128 varint in a fixed 8-byte buffer
//! - timestamps: version-tagged binary layout (seconds since 0001-01-01 UTC,
//!   nanoseconds, zone offset), the same bytes Go's `time.Time` produces
//! - everything else: raw UTF-8

use chrono::{DateTime, Utc};

use crate::errors::{LinkvaultError, Result};

/// views 字段固定占用 8 字节
pub const VIEWS_LEN: usize = 8;

const TIME_VERSION_V1: u8 = 1;
const TIME_VERSION_V2: u8 = 2;
const TIME_V1_LEN: usize = 15;
const TIME_V2_LEN: usize = 16;

/// 0001-01-01 与 Unix 纪元之间的秒数
const UNIX_TO_INTERNAL: i64 = 62_135_596_800;

/// 时区偏移 -1 表示 UTC
const UTC_OFFSET_MIN: i16 = -1;

pub fn encode_views(views: u64) -> Result<[u8; VIEWS_LEN]> {
    let mut buf = [0u8; VIEWS_LEN];
    let mut value = views;
    let mut i = 0;

    while value >= 0x80 {
        if i == VIEWS_LEN - 1 {
            return Err(LinkvaultError::decode(format!(
                "view count {} does not fit in {} bytes",
                views, VIEWS_LEN
            )));
        }
        buf[i] = (value as u8) | 0x80;
        value >>= 7;
        i += 1;
    }
    buf[i] = value as u8;

    Ok(buf)
}

pub fn decode_views(bytes: &[u8]) -> Result<u64> {
    let mut value: u64 = 0;
    let mut shift = 0u32;

    for (i, &byte) in bytes.iter().enumerate() {
        if i == 10 || (i == 9 && byte > 1) {
            return Err(LinkvaultError::decode(format!(
                "view count {:?} overflows a 64-bit integer",
                bytes
            )));
        }
        if byte < 0x80 {
            return Ok(value | (u64::from(byte) << shift));
        }
        value |= u64::from(byte & 0x7f) << shift;
        shift += 7;
    }

    Err(LinkvaultError::decode(format!(
        "view count {:?} is truncated",
        bytes
    )))
}

pub fn encode_time(time: &DateTime<Utc>) -> [u8; TIME_V1_LEN] {
    let sec = time.timestamp() + UNIX_TO_INTERNAL;
    let nsec = time.timestamp_subsec_nanos();

    let mut buf = [0u8; TIME_V1_LEN];
    buf[0] = TIME_VERSION_V1;
    buf[1..9].copy_from_slice(&sec.to_be_bytes());
    buf[9..13].copy_from_slice(&nsec.to_be_bytes());
    buf[13..15].copy_from_slice(&UTC_OFFSET_MIN.to_be_bytes());
    buf
}

pub fn decode_time(bytes: &[u8]) -> Result<DateTime<Utc>> {
    let expected = match bytes.first() {
        Some(&TIME_VERSION_V1) => TIME_V1_LEN,
        Some(&TIME_VERSION_V2) => TIME_V2_LEN,
        Some(other) => {
            return Err(LinkvaultError::decode(format!(
                "unsupported timestamp version {}",
                other
            )));
        }
        None => return Err(LinkvaultError::decode("timestamp is empty")),
    };

    if bytes.len() != expected {
        return Err(LinkvaultError::decode(format!(
            "timestamp has invalid length {}",
            bytes.len()
        )));
    }

    let mut sec = [0u8; 8];
    sec.copy_from_slice(&bytes[1..9]);
    let mut nsec = [0u8; 4];
    nsec.copy_from_slice(&bytes[9..13]);

    // 偏移量只影响显示时区，时刻本身按 UTC 秒数存储
    let sec = i64::from_be_bytes(sec) - UNIX_TO_INTERNAL;
    let nsec = u32::from_be_bytes(nsec);

    DateTime::from_timestamp(sec, nsec)
        .ok_or_else(|| LinkvaultError::decode(format!("timestamp {}.{} is out of range", sec, nsec)))
}

pub fn encode_str(value: &str) -> &[u8] {
    value.as_bytes()
}

pub fn decode_str(field: &str, bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| LinkvaultError::decode(format!(r#"invalid UTF-8 in "{}": {}"#, field, e)))
}
