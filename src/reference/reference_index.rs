// ==========================================
// 备件库存规划 - 设备参考索引
// ==========================================
// 输入: 任意顺序的台账记录
// 输出: 序列号 → 型号 / 序列号 → 设备类型 两张全函数映射
// 规则:
// - 序列号缺失的记录建索引前丢弃
// - 型号/设备类型缺失 → MODEL MISSING / TYPE MISSING
// - 未登记的序列号同样返回哨兵值
// - 重复序列号后出现者覆盖
// ==========================================

use crate::domain::{ReferenceRecord, MODEL_MISSING, TYPE_MISSING};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    models: HashMap<String, String>,
    equipment_types: HashMap<String, String>,
}

impl ReferenceIndex {
    pub fn build<I>(records: I) -> Self
    where
        I: IntoIterator<Item = ReferenceRecord>,
    {
        let mut index = Self::default();
        let mut dropped = 0usize;

        for record in records {
            let Some(serial) = non_blank(record.serial) else {
                dropped += 1;
                continue;
            };

            let model = non_blank(record.model).unwrap_or_else(|| MODEL_MISSING.to_string());
            let equipment_type =
                non_blank(record.equipment_type).unwrap_or_else(|| TYPE_MISSING.to_string());

            index.models.insert(serial.clone(), model);
            index.equipment_types.insert(serial, equipment_type);
        }

        debug!(serials = index.len(), dropped = dropped, "设备参考索引构建完成");
        index
    }

    pub fn model_for(&self, serial: &str) -> &str {
        self.models
            .get(serial)
            .map(String::as_str)
            .unwrap_or(MODEL_MISSING)
    }

    pub fn equipment_type_for(&self, serial: &str) -> &str {
        self.equipment_types
            .get(serial)
            .map(String::as_str)
            .unwrap_or(TYPE_MISSING)
    }

    pub fn contains(&self, serial: &str) -> bool {
        self.models.contains_key(serial)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}
