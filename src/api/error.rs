// ==========================================
// 备件库存规划 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，作为转换入口的统一错误类型
// 说明: 单个 sheet 的失败不会出现在这里（由编排器转为错误表）
// ==========================================

use crate::config::ConfigError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use crate::reference::ReferenceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("工作簿读取失败: {0}")]
    Import(#[from] ImportError),

    #[error("设备台账读取失败: {0}")]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("配置读取失败: {0}")]
    Config(#[from] ConfigError),

    #[error("内部错误: {0}")]
    InternalError(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_error_message_not_repeated() {
        let err = ApiError::from(ExportError::WorkbookWriteError("disk full".to_string()));
        assert_eq!(err.to_string(), "工作簿写出失败: disk full");
    }
}
