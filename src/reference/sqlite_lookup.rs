// ==========================================
// 备件库存规划 - SQLite 设备台账查询
// ==========================================
// 默认查询: SELECT SerialNumber, Model, EquipmentType FROM EquipmentDB
// 查询语句可配置，前三列依次解释为 序列号 / 型号 / 设备类型
// ==========================================

use crate::db::open_sqlite_readonly;
use crate::domain::{format_number, ReferenceRecord};
use crate::reference::error::{ReferenceError, ReferenceResult};
use crate::reference::lookup_trait::ReferenceLookup;
use async_trait::async_trait;
use rusqlite::types::ValueRef;
use std::path::Path;
use tracing::{info, instrument};

/// 默认台账查询
pub const DEFAULT_REFERENCE_QUERY: &str =
    "SELECT SerialNumber, Model, EquipmentType FROM EquipmentDB";

pub struct SqliteReferenceLookup {
    db_path: String,
    query: String,
}

impl SqliteReferenceLookup {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            query: DEFAULT_REFERENCE_QUERY.to_string(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// 同步读取（在阻塞线程池中执行）
    fn read_records(db_path: &str, query: &str) -> ReferenceResult<Vec<ReferenceRecord>> {
        if !Path::new(db_path).exists() {
            return Err(ReferenceError::SourceNotFound(db_path.to_string()));
        }

        let conn = open_sqlite_readonly(db_path)
            .map_err(|e| ReferenceError::DatabaseConnectionError(e.to_string()))?;

        let mut stmt = conn.prepare(query)?;
        if stmt.column_count() < 3 {
            return Err(ReferenceError::MissingColumn(format!(
                "query returns {} column(s), expected serial, model, equipment type",
                stmt.column_count()
            )));
        }

        let rows = stmt.query_map([], |row| {
            Ok(ReferenceRecord {
                serial: value_to_text(row.get_ref(0)?),
                model: value_to_text(row.get_ref(1)?),
                equipment_type: value_to_text(row.get_ref(2)?),
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

#[async_trait]
impl ReferenceLookup for SqliteReferenceLookup {
    #[instrument(skip(self), fields(db_path = %self.db_path))]
    async fn fetch_records(&self) -> ReferenceResult<Vec<ReferenceRecord>> {
        let db_path = self.db_path.clone();
        let query = self.query.clone();

        let records = tokio::task::spawn_blocking(move || Self::read_records(&db_path, &query))
            .await
            .map_err(|e| ReferenceError::InternalError(e.to_string()))??;

        info!(records = records.len(), "设备台账读取完成");
        Ok(records)
    }
}

/// 数据库值 → 文本（NULL / 空白 → None）
fn value_to_text(value: ValueRef<'_>) -> Option<String> {
    let text = match value {
        ValueRef::Null => return None,
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => format_number(f),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).trim().to_string(),
        ValueRef::Blob(_) => return None,
    };
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_sqlite_connection;
    use tempfile::NamedTempFile;

    fn create_reference_db() -> (NamedTempFile, String) {
        let temp_file = NamedTempFile::new().unwrap();
        let db_path = temp_file.path().to_str().unwrap().to_string();

        let conn = open_sqlite_connection(&db_path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE EquipmentDB (
                SerialNumber TEXT,
                Model TEXT,
                EquipmentType TEXT
            );
            INSERT INTO EquipmentDB VALUES ('S1', 'M-100', 'Pump');
            INSERT INTO EquipmentDB VALUES ('S2', NULL, 'Compressor');
            INSERT INTO EquipmentDB VALUES (NULL, 'Ghost', 'Ghost');
            INSERT INTO EquipmentDB VALUES (12345, 'M-200', NULL);
            "#,
        )
        .unwrap();

        (temp_file, db_path)
    }

    #[tokio::test]
    async fn test_fetch_records() {
        let (_temp_file, db_path) = create_reference_db();
        let lookup = SqliteReferenceLookup::new(db_path);
        let records = lookup.fetch_records().await.unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0], ReferenceRecord::new("S1", Some("M-100"), Some("Pump")));
        assert_eq!(records[1].model, None);
        assert_eq!(records[2].serial, None);
        // 数字序列号按文本处理
        assert_eq!(records[3].serial.as_deref(), Some("12345"));
        assert_eq!(records[3].equipment_type, None);
    }

    #[tokio::test]
    async fn test_custom_query() {
        let (_temp_file, db_path) = create_reference_db();
        let lookup = SqliteReferenceLookup::new(db_path).with_query(
            "SELECT SerialNumber, Model, EquipmentType FROM EquipmentDB WHERE EquipmentType = 'Pump'",
        );
        let records = lookup.fetch_records().await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_query_with_too_few_columns() {
        let (_temp_file, db_path) = create_reference_db();
        let lookup = SqliteReferenceLookup::new(db_path)
            .with_query("SELECT SerialNumber FROM EquipmentDB");
        let result = lookup.fetch_records().await;
        assert!(matches!(result, Err(ReferenceError::MissingColumn(_))));
    }

    #[tokio::test]
    async fn test_missing_database() {
        let lookup = SqliteReferenceLookup::new("/definitely/not/here.db");
        let result = lookup.fetch_records().await;
        assert!(matches!(result, Err(ReferenceError::SourceNotFound(_))));
    }
}
