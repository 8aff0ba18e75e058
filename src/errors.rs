use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkvaultError {
    DatabaseConnection(String),
    DatabaseOperation(String),
    Decode(String),
    AlreadyExists(String),
    NotFound(String),
    IdExhausted(String),
    Validation(String),
    Config(String),
    FileOperation(String),
    Serialization(String),
    DateParse(String),
}

impl LinkvaultError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkvaultError::DatabaseConnection(_) => "E001",
            LinkvaultError::DatabaseOperation(_) => "E002",
            LinkvaultError::Decode(_) => "E003",
            LinkvaultError::AlreadyExists(_) => "E004",
            LinkvaultError::NotFound(_) => "E005",
            LinkvaultError::IdExhausted(_) => "E006",
            LinkvaultError::Validation(_) => "E007",
            LinkvaultError::Config(_) => "E008",
            LinkvaultError::FileOperation(_) => "E009",
            LinkvaultError::Serialization(_) => "E010",
            LinkvaultError::DateParse(_) => "E011",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkvaultError::DatabaseConnection(_) => "Database Connection Error",
            LinkvaultError::DatabaseOperation(_) => "Database Operation Error",
            LinkvaultError::Decode(_) => "Record Decode Error",
            LinkvaultError::AlreadyExists(_) => "Resource Already Exists",
            LinkvaultError::NotFound(_) => "Resource Not Found",
            LinkvaultError::IdExhausted(_) => "Identifier Space Exhausted",
            LinkvaultError::Validation(_) => "Validation Error",
            LinkvaultError::Config(_) => "Configuration Error",
            LinkvaultError::FileOperation(_) => "File Operation Error",
            LinkvaultError::Serialization(_) => "Serialization Error",
            LinkvaultError::DateParse(_) => "Date Parse Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkvaultError::DatabaseConnection(msg)
            | LinkvaultError::DatabaseOperation(msg)
            | LinkvaultError::Decode(msg)
            | LinkvaultError::AlreadyExists(msg)
            | LinkvaultError::NotFound(msg)
            | LinkvaultError::IdExhausted(msg)
            | LinkvaultError::Validation(msg)
            | LinkvaultError::Config(msg)
            | LinkvaultError::FileOperation(msg)
            | LinkvaultError::Serialization(msg)
            | LinkvaultError::DateParse(msg) => msg,
        }
    }

    /// 格式化为彩色输出
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkvaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkvaultError {}

// 便捷的构造函数
impl LinkvaultError {
    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::DatabaseOperation(msg.into())
    }

    pub fn decode<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::Decode(msg.into())
    }

    pub fn already_exists<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::AlreadyExists(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::NotFound(msg.into())
    }

    pub fn id_exhausted<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::IdExhausted(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::Validation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::DateParse(msg.into())
    }
}

// redb 的每种错误都归为数据库操作错误
macro_rules! impl_from_redb {
    ($($err:ty),+ $(,)?) => {
        $(
            impl From<$err> for LinkvaultError {
                fn from(err: $err) -> Self {
                    LinkvaultError::DatabaseOperation(err.to_string())
                }
            }
        )+
    };
}

impl_from_redb!(
    redb::Error,
    redb::TransactionError,
    redb::TableError,
    redb::StorageError,
    redb::CommitError,
);

impl From<redb::DatabaseError> for LinkvaultError {
    fn from(err: redb::DatabaseError) -> Self {
        LinkvaultError::DatabaseConnection(err.to_string())
    }
}

impl From<config::ConfigError> for LinkvaultError {
    fn from(err: config::ConfigError) -> Self {
        LinkvaultError::Config(err.to_string())
    }
}

impl From<std::io::Error> for LinkvaultError {
    fn from(err: std::io::Error) -> Self {
        LinkvaultError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkvaultError {
    fn from(err: serde_json::Error) -> Self {
        LinkvaultError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LinkvaultError {
    fn from(err: chrono::ParseError) -> Self {
        LinkvaultError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkvaultError>;
