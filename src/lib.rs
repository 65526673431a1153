// ==========================================
// 备件库存规划 - 核心库
// ==========================================
// 输入: 多 sheet 零件清单工作簿（每个 sheet 按机台分块）
// 输出: 每个 sheet 一张汇总报表（含推荐备件数）
// 技术栈: Rust + SQLite（设备台账 / 配置）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 表格与零件类型
pub mod domain;

// 导入层 - 工作簿读取 / 列名解析 / 机台分块
pub mod importer;

// 设备台账层 - 序列号 → 型号/设备类型
pub mod reference;

// 引擎层 - 汇总与报表
pub mod engine;

// 导出层 - 工作簿写出
pub mod exporter;

// 配置层 - 规划配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 转换入口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{
    AggregationMode, BlockHeaderPolicy, CellValue, OutputSheet, PartRow, ReferenceRecord,
    ReportTable, SheetTable,
};

pub use engine::{PartAggregator, ReportBuilder, SheetOrchestrator, SheetOutcome};

pub use api::{process_workbook, ConversionApi, ConversionSummary};

pub use config::{ConfigManager, PlannerConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "备件库存规划";
