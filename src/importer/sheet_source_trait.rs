// ==========================================
// 备件库存规划 - 表格数据源 Trait
// ==========================================
// 职责: 定义工作簿读取接口（不包含实现）
// 实现者: XlsxSheetSource, CsvSheetSource
// ==========================================

use crate::domain::SheetTable;
use crate::importer::error::ImportResult;

// ==========================================
// LoadedSheet - 读取结果（按 sheet 隔离）
// ==========================================
// 单个 sheet 读取失败不影响其他 sheet，失败信息随 sheet 一起交给编排器
#[derive(Debug)]
pub struct LoadedSheet {
    pub name: String,
    pub content: ImportResult<SheetTable>,
}

impl LoadedSheet {
    pub fn ok(table: SheetTable) -> Self {
        Self {
            name: table.name.clone(),
            content: Ok(table),
        }
    }
}

// ==========================================
// SheetSource Trait
// ==========================================
pub trait SheetSource: Send + Sync {
    /// 读取工作簿中的全部 sheet（保持原始顺序）
    ///
    /// # 返回
    /// - Ok(Vec<LoadedSheet>): 每个 sheet 的读取结果
    /// - Err: 工作簿整体无法打开，或不含任何 sheet
    fn read_sheets(&self) -> ImportResult<Vec<LoadedSheet>>;
}
