use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{LinkvaultError, Result};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "linkvault.toml";

/// 环境变量前缀，分隔符为 `__`
pub const ENV_PREFIX: &str = "LV";

/// 会话有效期上限（100 年），保证 `Instant + ttl` 不溢出
pub const MAX_EXPIRATION_MINUTES: u64 = 60 * 24 * 365 * 100;

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - database: 存储文件与短码分配
/// - session: 会话过期与清理
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StaticConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > 配置文件 > 默认值
    /// 示例：LV__DATABASE__PATH=/var/lib/linkvault.redb
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);

        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: StaticConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.id_length == 0 {
            return Err(LinkvaultError::config("database.id_length must be positive"));
        }
        if self.database.max_id_attempts == 0 {
            return Err(LinkvaultError::config(
                "database.max_id_attempts must be positive",
            ));
        }
        if self.session.expiration_minutes == 0 {
            return Err(LinkvaultError::config(
                "session.expiration_minutes must be positive",
            ));
        }
        if self.session.expiration_minutes > MAX_EXPIRATION_MINUTES {
            return Err(LinkvaultError::config(format!(
                "session.expiration_minutes must be at most {}",
                MAX_EXPIRATION_MINUTES
            )));
        }
        if self.session.sweep_interval_secs == 0 {
            return Err(LinkvaultError::config(
                "session.sweep_interval_secs must be positive",
            ));
        }
        Ok(())
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| LinkvaultError::serialization(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
    #[serde(default = "default_id_length")]
    pub id_length: usize,
    #[serde(default = "default_max_id_attempts")]
    pub max_id_attempts: usize,
}

/// 会话配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionConfig {
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.expiration_minutes.saturating_mul(60))
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
}

// ============================================================
// Default value functions
// ============================================================

fn default_database_path() -> String {
    "linkvault.redb".to_string()
}

fn default_id_length() -> usize {
    6
}

fn default_max_id_attempts() -> usize {
    64
}

fn default_expiration_minutes() -> u64 {
    60
}

fn default_sweep_interval_secs() -> u64 {
    3600
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_enable_rotation() -> bool {
    true
}

fn default_max_backups() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            id_length: default_id_length(),
            max_id_attempts: default_max_id_attempts(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expiration_minutes: default_expiration_minutes(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            enable_rotation: default_enable_rotation(),
            max_backups: default_max_backups(),
        }
    }
}
