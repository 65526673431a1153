// ==========================================
// 备件库存规划 - 表格模型
// ==========================================
// 输入: SheetTable（首行为表头）
// 输出: ReportTable / OutputSheet（每个输入 sheet 对应一个）
// ==========================================

use crate::domain::types::CellValue;
use serde::{Deserialize, Serialize};

// ==========================================
// SheetTable - 输入工作表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetTable {
    pub name: String,                 // 原始 sheet 名
    pub headers: Vec<Option<String>>, // 表头（非文本表头为 None，不参与列匹配）
    pub rows: Vec<Vec<CellValue>>,    // 数据行（按文件顺序，顺序携带机台分块信息）
}

impl SheetTable {
    pub fn new(name: impl Into<String>, headers: Vec<Option<String>>) -> Self {
        Self {
            name: name.into(),
            headers,
            rows: Vec::new(),
        }
    }
}

// ==========================================
// ReportTable - 输出表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl ReportTable {
    pub fn new(columns: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<CellValue>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    /// 单行错误表（处理失败的 sheet 用它占位）
    pub fn error(sheet_name: &str, message: &str) -> Self {
        let mut table = Self::new(&["Error"]);
        table.push_row(vec![CellValue::Text(format!(
            "Could not process sheet '{}': {}",
            sheet_name, message
        ))]);
        table
    }
}

// ==========================================
// OutputSheet - 输出工作表
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSheet {
    pub name: String, // 输入 sheet 名（截断/去重由写出端负责）
    pub table: ReportTable,
}
