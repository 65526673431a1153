// ==========================================
// 备件库存规划 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置库访问失败: {0}")]
    DatabaseError(String),

    #[error("配置库锁获取失败: {0}")]
    LockError(String),

    #[error("配置值非法: key={key}, value={value}, {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

impl From<rusqlite::Error> for ConfigError {
    fn from(err: rusqlite::Error) -> Self {
        ConfigError::DatabaseError(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
