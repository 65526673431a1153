// ==========================================
// 备件库存规划 - 零件与设备参考数据模型
// ==========================================
// CanonicalRow: 列匹配后的标准行
// PartRow: 通过分块过滤、已解析型号/设备类型的零件行
// ReferenceRecord: 外部设备台账的一行
// ==========================================

use serde::{Deserialize, Serialize};

/// 型号缺失哨兵值
pub const MODEL_MISSING: &str = "MODEL MISSING";

/// 设备类型缺失哨兵值
pub const TYPE_MISSING: &str = "TYPE MISSING";

/// 零件号占位符（不可备货）
pub const ITEM_PLACEHOLDER: &str = "TBD";

// ==========================================
// CanonicalRow - 标准行
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub serial: Option<String>,      // 机台序列号
    pub total_qty: f64,              // 总数量（非数字记 0）
    pub spare_qty: f64,              // 备件数量（非数字记 0）
    pub item_no: Option<String>,     // 零件号
    pub description: Option<String>, // 零件描述
    pub unit_price: Option<f64>,     // 单价
}

impl CanonicalRow {
    /// 是否为可备货零件行（零件号、描述均非空，且零件号不是 TBD）
    pub fn is_stockable(&self) -> bool {
        match (&self.item_no, &self.description) {
            (Some(item_no), Some(_)) => !item_no.trim().eq_ignore_ascii_case(ITEM_PLACEHOLDER),
            _ => false,
        }
    }
}

// ==========================================
// PartRow - 零件行（汇总器输入）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartRow {
    pub serial: String,
    pub model: String,
    pub equipment_type: String,
    pub item_no: String,
    pub description: String,
    pub unit_price: Option<f64>,
    pub total_qty: f64,
    pub spare_qty: f64,
}

// ==========================================
// ReferenceRecord - 设备台账记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    pub serial: Option<String>,         // 序列号（缺失的记录建索引前丢弃）
    pub model: Option<String>,          // 型号
    pub equipment_type: Option<String>, // 设备类型
}

impl ReferenceRecord {
    pub fn new(serial: &str, model: Option<&str>, equipment_type: Option<&str>) -> Self {
        Self {
            serial: Some(serial.to_string()),
            model: model.map(str::to_string),
            equipment_type: equipment_type.map(str::to_string),
        }
    }
}
