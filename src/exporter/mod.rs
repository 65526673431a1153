// ==========================================
// 备件库存规划 - 导出层
// ==========================================
// 职责: 输出工作簿写出（每个输入 sheet 对应一个输出 sheet）
// 支持: Excel (.xlsx)
// ==========================================

pub mod error;
pub mod sheet_name;
pub mod sheet_sink_trait;
pub mod xlsx_writer;

pub use error::{ExportError, ExportResult};
pub use sheet_name::{sanitize_sheet_name, SheetNameAllocator, MAX_SHEET_NAME_LEN};
pub use sheet_sink_trait::{SheetSink, SheetWriteFailure, SinkOutput};
pub use xlsx_writer::XlsxSheetSink;
