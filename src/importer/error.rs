// ==========================================
// 备件库存规划 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 错误文本会写入输出工作簿的错误行，保持英文
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0} (expected .xlsx or .csv)")]
    UnsupportedFormat(String),

    #[error("Failed to read file: {0}")]
    FileReadError(String),

    #[error("Failed to parse workbook: {0}")]
    WorkbookParseError(String),

    #[error("Workbook contains no sheets")]
    EmptyWorkbook,

    #[error("Failed to read sheet '{sheet}': {message}")]
    SheetReadError { sheet: String, message: String },

    #[error("Failed to parse CSV: {0}")]
    CsvParseError(String),

    // ===== 列匹配错误 =====
    #[error("Could not find a match for required column: '{field}'")]
    ColumnNotFound { field: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::WorkbookParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_not_found_message_names_field() {
        let err = ImportError::ColumnNotFound {
            field: "spare qty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Could not find a match for required column: 'spare qty'"
        );
    }
}
