// ==========================================
// 备件库存规划 - 导出层错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("没有可写出的 sheet")]
    NoSheets,

    #[error("工作簿写出失败: {0}")]
    WorkbookWriteError(String),

    #[error("文件写入失败: {0}")]
    FileWriteError(String),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::WorkbookWriteError(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::FileWriteError(err.to_string())
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
