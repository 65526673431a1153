// ==========================================
// 备件库存规划 - CSV 设备台账
// ==========================================
// 表头: SerialNumber, Model, EquipmentType（忽略大小写与首尾空白）
// ==========================================

use crate::domain::ReferenceRecord;
use crate::reference::error::{ReferenceError, ReferenceResult};
use crate::reference::lookup_trait::ReferenceLookup;
use async_trait::async_trait;
use csv::ReaderBuilder;
use std::path::PathBuf;
use tracing::info;

const SERIAL_COLUMN: &str = "serialnumber";
const MODEL_COLUMN: &str = "model";
const TYPE_COLUMN: &str = "equipmenttype";

pub struct CsvReferenceLookup {
    path: PathBuf,
}

impl CsvReferenceLookup {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 从 CSV 文本解析台账
    pub fn parse(data: &[u8]) -> ReferenceResult<Vec<ReferenceRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(data);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let column = |name: &str| -> ReferenceResult<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| ReferenceError::MissingColumn(name.to_string()))
        };
        let serial_idx = column(SERIAL_COLUMN)?;
        let model_idx = column(MODEL_COLUMN)?;
        let type_idx = column(TYPE_COLUMN)?;

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result?;
            let field = |idx: usize| {
                record
                    .get(idx)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };
            records.push(ReferenceRecord {
                serial: field(serial_idx),
                model: field(model_idx),
                equipment_type: field(type_idx),
            });
        }
        Ok(records)
    }
}

#[async_trait]
impl ReferenceLookup for CsvReferenceLookup {
    async fn fetch_records(&self) -> ReferenceResult<Vec<ReferenceRecord>> {
        if !self.path.exists() {
            return Err(ReferenceError::SourceNotFound(
                self.path.display().to_string(),
            ));
        }

        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| ReferenceError::InternalError(e.to_string()))?;
        let records = Self::parse(&data)?;

        info!(path = %self.path.display(), records = records.len(), "CSV 设备台账读取完成");
        Ok(records)
    }
}
