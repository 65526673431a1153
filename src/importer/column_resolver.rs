// ==========================================
// 备件库存规划 - 列名解析器
// ==========================================
// 职责: 将杂乱的输入表头映射到 6 个标准字段
// 算法: 表头归一化（小写 + 去首尾空白）后逐字段模糊匹配，取相似度最高者
// 相似度: 字符级 diff 比率 2*M/T（similar::TextDiff）
// ==========================================

use crate::domain::{CanonicalRow, CellValue};
use crate::importer::error::{ImportError, ImportResult};
use serde::Serialize;
use similar::TextDiff;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// 默认相似度下限
pub const DEFAULT_SIMILARITY_CUTOFF: f64 = 0.6;

// ==========================================
// CanonicalField - 标准字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum CanonicalField {
    Serial,
    TotalQty,
    SpareQty,
    ItemNo,
    Description,
    UnitPrice,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 6] = [
        CanonicalField::Serial,
        CanonicalField::TotalQty,
        CanonicalField::SpareQty,
        CanonicalField::ItemNo,
        CanonicalField::Description,
        CanonicalField::UnitPrice,
    ];

    /// 标准字段名（已归一化，作为匹配目标）
    pub fn canonical_name(&self) -> &'static str {
        match self {
            CanonicalField::Serial => "serial",
            CanonicalField::TotalQty => "total qty",
            CanonicalField::SpareQty => "spare qty",
            CanonicalField::ItemNo => "item no.",
            CanonicalField::Description => "description",
            CanonicalField::UnitPrice => "unit price ($)",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_name())
    }
}

/// 表头归一化
pub fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase()
}

/// 两个字符串的相似度（0.0 ~ 1.0）
pub fn similarity(a: &str, b: &str) -> f64 {
    f64::from(TextDiff::from_chars(a, b).ratio())
}

// ==========================================
// 解析结果
// ==========================================

/// 已解析的列（原始表头 + 列下标）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedColumn {
    pub header: String,
    pub index: usize,
}

/// 候选表头（诊断用）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnCandidate {
    pub header: String,
    pub score: f64,
}

/// 标准字段 → 实际列
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    columns: BTreeMap<CanonicalField, ResolvedColumn>,
}

impl ColumnMapping {
    pub fn get(&self, field: CanonicalField) -> Option<&ResolvedColumn> {
        self.columns.get(&field)
    }

    /// 标准字段名 → 原始表头
    pub fn header_names(&self) -> BTreeMap<&'static str, &str> {
        self.columns
            .iter()
            .map(|(field, col)| (field.canonical_name(), col.header.as_str()))
            .collect()
    }

    fn cell<'a>(&self, row: &'a [CellValue], field: CanonicalField) -> &'a CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.columns
            .get(&field)
            .and_then(|col| row.get(col.index))
            .unwrap_or(&EMPTY)
    }

    /// 原始行 → 标准行
    pub fn to_canonical_row(&self, row: &[CellValue]) -> CanonicalRow {
        CanonicalRow {
            serial: self.cell(row, CanonicalField::Serial).as_text(),
            total_qty: self.cell(row, CanonicalField::TotalQty).as_quantity(),
            spare_qty: self.cell(row, CanonicalField::SpareQty).as_quantity(),
            item_no: self.cell(row, CanonicalField::ItemNo).as_text(),
            description: self.cell(row, CanonicalField::Description).as_text(),
            unit_price: self.cell(row, CanonicalField::UnitPrice).as_number(),
        }
    }
}

/// 完整解析结果（含全部候选，便于排查误匹配）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnResolution {
    pub mapping: ColumnMapping,
    pub candidates: BTreeMap<CanonicalField, Vec<ColumnCandidate>>,
}

// ==========================================
// ColumnResolver
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct ColumnResolver {
    cutoff: f64,
}

impl Default for ColumnResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_CUTOFF)
    }
}

impl ColumnResolver {
    pub fn new(cutoff: f64) -> Self {
        Self {
            cutoff: cutoff.clamp(0.0, 1.0),
        }
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// 解析表头
    ///
    /// # 参数
    /// - headers: sheet 的表头（非文本表头为 None）
    ///
    /// # 返回
    /// - Ok(ColumnResolution): 6 个字段全部匹配成功
    /// - Err(ColumnNotFound): 第一个无法匹配的字段
    ///
    /// # 规则
    /// - 归一化后重名的表头，后出现者覆盖先出现者
    /// - 同分时取归一化表头字典序最大者，与列顺序无关
    pub fn resolve(&self, headers: &[Option<String>]) -> ImportResult<ColumnResolution> {
        // 归一化表头 → (原始表头, 列下标)
        let mut normalized: BTreeMap<String, ResolvedColumn> = BTreeMap::new();
        for (index, header) in headers.iter().enumerate() {
            let Some(header) = header else { continue };
            let key = normalize_header(header);
            if key.is_empty() {
                continue;
            }
            normalized.insert(
                key,
                ResolvedColumn {
                    header: header.clone(),
                    index,
                },
            );
        }

        let mut columns = BTreeMap::new();
        let mut candidates = BTreeMap::new();

        for field in CanonicalField::ALL {
            let target = field.canonical_name();

            let mut scored: Vec<(&String, f64)> = normalized
                .keys()
                .map(|key| (key, similarity(target, key)))
                .filter(|(_, score)| *score >= self.cutoff)
                .collect();
            // 同分时取字典序最大的归一化表头
            scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| b.0.cmp(a.0)));

            debug!(
                field = target,
                candidates = ?scored,
                "列匹配候选"
            );

            let Some((best, _)) = scored.first() else {
                return Err(ImportError::ColumnNotFound {
                    field: target.to_string(),
                });
            };
            columns.insert(field, normalized[*best].clone());

            candidates.insert(
                field,
                scored
                    .iter()
                    .map(|(key, score)| ColumnCandidate {
                        header: normalized[*key].header.clone(),
                        score: *score,
                    })
                    .collect(),
            );
        }

        Ok(ColumnResolution {
            mapping: ColumnMapping { columns },
            candidates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<Option<String>> {
        names.iter().map(|n| Some(n.to_string())).collect()
    }

    const MESSY: [&str; 6] = [
        " Serial ",
        "TOTAL QTY",
        "Spare Qty",
        "Item No",
        "Description",
        "Unit Price",
    ];

    #[test]
    fn test_resolve_messy_headers() {
        let resolver = ColumnResolver::default();
        let resolution = resolver.resolve(&headers(&MESSY)).unwrap();
        let names = resolution.mapping.header_names();

        assert_eq!(names["serial"], " Serial ");
        assert_eq!(names["total qty"], "TOTAL QTY");
        assert_eq!(names["spare qty"], "Spare Qty");
        assert_eq!(names["item no."], "Item No");
        assert_eq!(names["description"], "Description");
        assert_eq!(names["unit price ($)"], "Unit Price");
    }

    #[test]
    fn test_resolve_is_order_independent() {
        let resolver = ColumnResolver::default();
        let forward = resolver.resolve(&headers(&MESSY)).unwrap();

        let mut reversed = MESSY;
        reversed.reverse();
        let backward = resolver.resolve(&headers(&reversed)).unwrap();

        assert_eq!(
            forward.mapping.header_names(),
            backward.mapping.header_names()
        );
        // 列下标随顺序变化
        assert_eq!(forward.mapping.get(CanonicalField::Serial).unwrap().index, 0);
        assert_eq!(backward.mapping.get(CanonicalField::Serial).unwrap().index, 5);
    }

    #[test]
    fn test_resolve_missing_column() {
        let resolver = ColumnResolver::default();
        let result = resolver.resolve(&headers(&[
            "Serial",
            "Total Qty",
            "Item No.",
            "Description",
            "Unit Price ($)",
            "Location",
        ]));

        match result {
            Err(ImportError::ColumnNotFound { field }) => assert_eq!(field, "spare qty"),
            other => panic!("应返回 ColumnNotFound, 实际: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_skips_non_text_headers() {
        let resolver = ColumnResolver::default();
        let mut hs = headers(&MESSY);
        hs.insert(0, None);
        let resolution = resolver.resolve(&hs).unwrap();
        assert_eq!(resolution.mapping.get(CanonicalField::Serial).unwrap().index, 1);
    }

    #[test]
    fn test_tie_prefers_greatest_normalized_header() {
        let resolver = ColumnResolver::default();
        let base = [
            "Total Qty",
            "Spare Qty",
            "Item No.",
            "Description",
            "Unit Price ($)",
        ];

        let mut forward: Vec<&str> = vec!["serial1", "serial2"];
        forward.extend(base);
        let mut backward: Vec<&str> = vec!["serial2", "serial1"];
        backward.extend(base);

        for hs in [forward, backward] {
            let resolution = resolver.resolve(&headers(&hs)).unwrap();
            assert_eq!(resolution.mapping.header_names()["serial"], "serial2");
            let scores: Vec<f64> = resolution.candidates[&CanonicalField::Serial]
                .iter()
                .map(|c| c.score)
                .collect();
            assert_eq!(scores[0], scores[1], "两个候选应同分");
        }
    }

    #[test]
    fn test_strict_cutoff_rejects_misspelling() {
        let strict = ColumnResolver::new(1.0);
        assert!(strict.resolve(&headers(&MESSY)).is_err());
    }

    #[test]
    fn test_candidates_are_reported() {
        let resolver = ColumnResolver::default();
        let mut hs = headers(&MESSY);
        hs.push(Some("Serial No".to_string()));
        let resolution = resolver.resolve(&hs).unwrap();

        let serial_candidates = &resolution.candidates[&CanonicalField::Serial];
        assert_eq!(serial_candidates[0].header, " Serial ");
        assert!(serial_candidates.iter().any(|c| c.header == "Serial No"));
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("serial", "serial"), 1.0);
        assert!(similarity("serial", "zzzz") < DEFAULT_SIMILARITY_CUTOFF);
    }

    #[test]
    fn test_to_canonical_row() {
        let resolver = ColumnResolver::default();
        let resolution = resolver.resolve(&headers(&MESSY)).unwrap();
        let row = vec![
            CellValue::Number(1234.0),
            CellValue::Text("4".to_string()),
            CellValue::Empty,
            CellValue::Text("P-9".to_string()),
            CellValue::Text("Filter".to_string()),
            CellValue::Number(12.5),
        ];

        let canonical = resolution.mapping.to_canonical_row(&row);
        assert_eq!(canonical.serial.as_deref(), Some("1234"));
        assert_eq!(canonical.total_qty, 4.0);
        assert_eq!(canonical.spare_qty, 0.0);
        assert_eq!(canonical.item_no.as_deref(), Some("P-9"));
        assert_eq!(canonical.unit_price, Some(12.5));

        // 短行: 缺失单元格视为空
        let short = resolution.mapping.to_canonical_row(&row[..2]);
        assert_eq!(short.item_no, None);
        assert_eq!(short.unit_price, None);
    }
}
