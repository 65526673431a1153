// ==========================================
// 备件库存规划 - 设备参考数据查询 Trait
// ==========================================
// 职责: 定义序列号 → (型号, 设备类型) 台账的读取接口
// 实现者: SqliteReferenceLookup, CsvReferenceLookup, StaticReferenceLookup
// 约定: 每次转换只调用一次，结果只读
// ==========================================

use crate::domain::ReferenceRecord;
use crate::reference::error::ReferenceResult;
use async_trait::async_trait;

#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    /// 拉取全部台账记录（顺序无要求）
    async fn fetch_records(&self) -> ReferenceResult<Vec<ReferenceRecord>>;
}

// ==========================================
// StaticReferenceLookup - 内存台账
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StaticReferenceLookup {
    records: Vec<ReferenceRecord>,
}

impl StaticReferenceLookup {
    pub fn new(records: Vec<ReferenceRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl ReferenceLookup for StaticReferenceLookup {
    async fn fetch_records(&self) -> ReferenceResult<Vec<ReferenceRecord>> {
        Ok(self.records.clone())
    }
}
