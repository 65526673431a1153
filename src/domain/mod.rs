// ==========================================
// 备件库存规划 - 领域模型层
// ==========================================
// 职责: 定义表格、零件行、设备台账等领域类型
// 红线: 不含 I/O，不含汇总逻辑
// ==========================================

pub mod part;
pub mod sheet;
pub mod types;

// 重导出核心类型
pub use part::{
    CanonicalRow, PartRow, ReferenceRecord, ITEM_PLACEHOLDER, MODEL_MISSING, TYPE_MISSING,
};
pub use sheet::{OutputSheet, ReportTable, SheetTable};
pub use types::{format_number, AggregationMode, BlockHeaderPolicy, CellValue};
