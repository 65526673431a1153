// ==========================================
// 备件库存规划 - 设备参考数据层
// ==========================================
// 职责: 外部设备台账读取 + 序列号索引构建
// 来源: SQLite / CSV / 内存
// ==========================================

pub mod csv_lookup;
pub mod error;
pub mod lookup_trait;
pub mod reference_index;
pub mod sqlite_lookup;

pub use csv_lookup::CsvReferenceLookup;
pub use error::{ReferenceError, ReferenceResult};
pub use lookup_trait::{ReferenceLookup, StaticReferenceLookup};
pub use reference_index::ReferenceIndex;
pub use sqlite_lookup::{SqliteReferenceLookup, DEFAULT_REFERENCE_QUERY};
