// ==========================================
// 备件库存规划 - 领域类型定义
// ==========================================
// 职责: 单元格值、机台分块策略、汇总口径
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 单元格值 (Cell Value)
// ==========================================
// 与具体表格库解耦: calamine / csv 读入后统一转换为本类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// 是否为空（空单元格或纯空白文本）
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 转为文本（空值返回 None）
    ///
    /// 整数值的数字不带小数位输出，保证 `1001` 与 `"1001"` 归为同一个键
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Bool(b) => Some(b.to_string().to_uppercase()),
        }
    }

    /// 解析为数值（无法解析返回 None）
    ///
    /// 文本允许前导 `$` 与千分位逗号
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(s) => {
                let cleaned: String = s
                    .trim()
                    .trim_start_matches('$')
                    .chars()
                    .filter(|c| *c != ',')
                    .collect();
                cleaned
                    .trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
            }
            _ => None,
        }
    }

    /// 数量字段口径: 缺失或非数字一律记 0
    pub fn as_quantity(&self) -> f64 {
        self.as_number().unwrap_or(0.0)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", format_number(*n)),
            CellValue::Bool(b) => write!(f, "{}", b.to_string().to_uppercase()),
        }
    }
}

/// 数字转文本: 整数不带 `.0`
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ==========================================
// 机台分块首行策略 (Block Header Policy)
// ==========================================
// 序列号变化时的首行如何处理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockHeaderPolicy {
    /// 首行视为机台表头，始终不参与汇总
    #[default]
    SkipFirstRow,
    /// 首行按普通零件行处理，仅在空白时丢弃
    DataUnlessBlank,
}

impl fmt::Display for BlockHeaderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockHeaderPolicy::SkipFirstRow => write!(f, "SKIP_FIRST_ROW"),
            BlockHeaderPolicy::DataUnlessBlank => write!(f, "DATA_UNLESS_BLANK"),
        }
    }
}

impl FromStr for BlockHeaderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SKIP_FIRST_ROW" => Ok(BlockHeaderPolicy::SkipFirstRow),
            "DATA_UNLESS_BLANK" => Ok(BlockHeaderPolicy::DataUnlessBlank),
            other => Err(format!("未知的分块首行策略: {}", other)),
        }
    }
}

// ==========================================
// 汇总口径 (Aggregation Mode)
// ==========================================
// 决定备件是按设备类型分池，还是全局按零件号合并
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationMode {
    /// 键 = (设备类型, 零件号)，报表按设备类型分组
    PerEquipmentType,
    /// 键 = 零件号，报表附带设备类型列
    Flattened,
}

impl AggregationMode {
    pub fn from_grouping(group_by_equipment_type: bool) -> Self {
        if group_by_equipment_type {
            AggregationMode::PerEquipmentType
        } else {
            AggregationMode::Flattened
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationMode::PerEquipmentType => write!(f, "PER_EQUIPMENT_TYPE"),
            AggregationMode::Flattened => write!(f, "FLATTENED"),
        }
    }
}
