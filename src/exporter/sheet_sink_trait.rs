// ==========================================
// 备件库存规划 - 工作簿写出 Trait
// ==========================================
// 职责: 定义输出工作簿的写出接口（不包含实现）
// 实现者: XlsxSheetSink
// 失败隔离: 单个 sheet 写出失败时以错误表占位，不影响其他 sheet
// ==========================================

use crate::domain::OutputSheet;
use crate::exporter::error::ExportResult;

/// 单个 sheet 的写出失败记录
#[derive(Debug, Clone, PartialEq)]
pub struct SheetWriteFailure {
    pub index: usize, // 在输入 sheet 列表中的位置
    pub sheet: String,
    pub error: String,
}

/// 写出结果
#[derive(Debug, Clone)]
pub struct SinkOutput {
    pub bytes: Vec<u8>,
    pub failures: Vec<SheetWriteFailure>,
}

pub trait SheetSink: Send + Sync {
    /// 按给定顺序写出全部 sheet，返回工作簿字节及被错误表替换的 sheet
    ///
    /// # 返回
    /// - Err: 没有 sheet，或工作簿整体无法生成
    fn write_sheets(&self, sheets: &[OutputSheet]) -> ExportResult<SinkOutput>;
}
