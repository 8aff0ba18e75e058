use async_trait::async_trait;

use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::RedbStorage;
pub use models::{RecordState, UrlRecord};

/// URL record store consumed by the serving layer.
///
/// Absence is not an error: `get` returns `None` and `view` returns an empty
/// string for IDs that never existed, were soft-deleted, or (for `view`)
/// have expired.
#[async_trait]
pub trait UrlDb: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<UrlRecord>>;

    /// 保存记录并返回 ID；记录未指定 ID 时自动生成
    async fn put(&self, record: UrlRecord, user: &str) -> Result<String>;

    async fn update(&self, id: &str, record: UrlRecord) -> Result<()>;

    /// 软删除
    async fn delete(&self, id: &str) -> Result<()>;

    /// 解析短码并增加访问计数
    async fn view(&self, id: &str) -> Result<String>;

    /// 列出用户的记录，`user` 为空时列出全部
    async fn urls(&self, user: &str) -> Result<Vec<UrlRecord>>;
}
