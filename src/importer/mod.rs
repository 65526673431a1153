// ==========================================
// 备件库存规划 - 导入层
// ==========================================
// 职责: 工作簿读取 → 列名解析 → 机台分块与行过滤
// 支持: Excel (.xlsx), CSV
// ==========================================

// 模块声明
pub mod block_parser;
pub mod column_resolver;
pub mod error;
pub mod file_parser;
pub mod sheet_source_trait;

// 重导出核心类型
pub use block_parser::{BlockStats, MachineBlockParser, RowClass};
pub use column_resolver::{
    normalize_header, similarity, CanonicalField, ColumnCandidate, ColumnMapping,
    ColumnResolution, ColumnResolver, ResolvedColumn, DEFAULT_SIMILARITY_CUTOFF,
};
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvSheetSource, UniversalSheetSource, XlsxSheetSource};

// 重导出 Trait 接口
pub use sheet_source_trait::{LoadedSheet, SheetSource};
