// ==========================================
// 备件库存规划 - 设备参考数据错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 设备参考数据错误类型
#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("Reference source not found: {0}")]
    SourceNotFound(String),

    #[error("Failed to connect to reference database: {0}")]
    DatabaseConnectionError(String),

    #[error("Reference query failed: {0}")]
    DatabaseQueryError(String),

    #[error("Failed to parse reference CSV: {0}")]
    CsvParseError(String),

    #[error("Reference data is missing column: {0}")]
    MissingColumn(String),

    #[error("Reference lookup failed: {0}")]
    InternalError(String),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ReferenceError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("unable to open") => {
                ReferenceError::DatabaseConnectionError(msg)
            }
            _ => ReferenceError::DatabaseQueryError(err.to_string()),
        }
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ReferenceError {
    fn from(err: csv::Error) -> Self {
        ReferenceError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ReferenceResult<T> = Result<T, ReferenceError>;
