use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a stored record.
///
/// Deleted records stay on disk but every read path treats them as absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordState {
    #[default]
    Active,
    Deleted,
}

/// A shortened URL.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Short code. Empty on input means "generate one".
    pub id: String,
    pub user: String,
    pub url: String,
    #[serde(default)]
    pub views: u64,
    pub expires: Option<DateTime<Utc>>,
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub state: RecordState,
}

impl UrlRecord {
    /// 创建待写入的记录，其余字段由存储层维护
    pub fn new<T: Into<String>>(url: T) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_id<T: Into<String>>(mut self, id: T) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_expires(mut self, expires: Option<DateTime<Utc>>) -> Self {
        self.expires = expires;
        self
    }

    pub fn is_deleted(&self) -> bool {
        self.state == RecordState::Deleted
    }

    /// 过期时间已过（等于当前时刻不算过期）
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires.is_some_and(|expires| now > expires)
    }
}
