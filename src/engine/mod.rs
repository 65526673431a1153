// ==========================================
// 备件库存规划 - 引擎层
// ==========================================
// 职责: 零件汇总、规模系数、报表构建、sheet 编排
// 红线: 引擎不做 I/O，输入输出均为内存表
// ==========================================

pub mod aggregator;
pub mod orchestrator;
pub mod report_builder;
pub mod scale_factor;

// 重导出核心引擎
pub use aggregator::{AggregationKey, PartAccumulator, PartAggregator};
pub use orchestrator::{SheetOrchestrator, SheetOutcome, SheetReport, WorkbookReport};
pub use report_builder::{columns, ReportBuilder};
pub use scale_factor::{recommended_spare_qty, scale_factor, SCALE_TIERS};
