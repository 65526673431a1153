// ==========================================
// 备件库存规划 - API 层
// ==========================================
// 职责: 对外转换入口（字节 / 文件），供 CLI 调用
// ==========================================

pub mod conversion_api;
pub mod error;

pub use conversion_api::{
    process_workbook, ConversionApi, ConversionResponse, ConversionSummary, ConversionTotals,
};
pub use error::{ApiError, ApiResult};
