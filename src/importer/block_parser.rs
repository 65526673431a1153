// ==========================================
// 备件库存规划 - 机台分块解析器
// ==========================================
// 职责: 按文件顺序消费标准行，识别机台分块并过滤不可备货行
// 分块: 序列号相对上一行发生变化 → 新机台块的首行
// 过滤: 零件号为空 / 描述为空 / 零件号为 TBD（忽略大小写）
// 输出: 惰性迭代器，仅产出零件行
// ==========================================

use crate::domain::{BlockHeaderPolicy, CanonicalRow, PartRow};
use crate::reference::ReferenceIndex;
use serde::Serialize;

// ==========================================
// RowClass - 行分类
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    MachineHeader, // 机台块首行（仅携带序列号）
    Part,          // 可汇总零件行
    Discard,       // 块内空白/占位行
}

/// 分块统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockStats {
    pub machine_blocks: usize, // 机台块数
    pub header_rows: usize,    // 被跳过的块首行
    pub part_rows: usize,      // 产出零件行
    pub discarded_rows: usize, // 丢弃行
}

// ==========================================
// MachineBlockParser
// ==========================================
pub struct MachineBlockParser<'a, I>
where
    I: Iterator<Item = CanonicalRow>,
{
    rows: I,
    reference: &'a ReferenceIndex,
    policy: BlockHeaderPolicy,
    last_serial: Option<String>,
    started: bool,
    stats: BlockStats,
}

impl<'a, I> MachineBlockParser<'a, I>
where
    I: Iterator<Item = CanonicalRow>,
{
    pub fn new<T>(rows: T, reference: &'a ReferenceIndex, policy: BlockHeaderPolicy) -> Self
    where
        T: IntoIterator<IntoIter = I>,
    {
        Self {
            rows: rows.into_iter(),
            reference,
            policy,
            last_serial: None,
            started: false,
            stats: BlockStats::default(),
        }
    }

    pub fn stats(&self) -> BlockStats {
        self.stats
    }

    /// 判定当前行是否开启新机台块
    ///
    /// 序列号为空的行永远不等于上一行，总是视为块边界
    fn is_block_boundary(&self, serial: Option<&str>) -> bool {
        if !self.started {
            return true;
        }
        match (serial, self.last_serial.as_deref()) {
            (Some(current), Some(previous)) => current != previous,
            _ => true,
        }
    }

    /// 行分类（会推进分块状态）
    fn classify(&mut self, row: &CanonicalRow) -> RowClass {
        let boundary = self.is_block_boundary(row.serial.as_deref());
        self.started = true;
        self.last_serial = row.serial.clone();

        if boundary {
            self.stats.machine_blocks += 1;
            if self.policy == BlockHeaderPolicy::SkipFirstRow {
                return RowClass::MachineHeader;
            }
        }

        // 无序列号的行无法归属机台
        if row.serial.is_none() || !row.is_stockable() {
            return RowClass::Discard;
        }
        RowClass::Part
    }

    fn resolve(&self, row: CanonicalRow) -> Option<PartRow> {
        let serial = row.serial?;
        Some(PartRow {
            model: self.reference.model_for(&serial).to_string(),
            equipment_type: self.reference.equipment_type_for(&serial).to_string(),
            serial,
            item_no: row.item_no?,
            description: row.description?,
            unit_price: row.unit_price,
            total_qty: row.total_qty,
            spare_qty: row.spare_qty,
        })
    }
}

impl<'a, I> Iterator for MachineBlockParser<'a, I>
where
    I: Iterator<Item = CanonicalRow>,
{
    type Item = PartRow;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = self.rows.next()?;
            match self.classify(&row) {
                RowClass::MachineHeader => self.stats.header_rows += 1,
                RowClass::Discard => self.stats.discarded_rows += 1,
                RowClass::Part => {
                    if let Some(part) = self.resolve(row) {
                        self.stats.part_rows += 1;
                        return Some(part);
                    }
                    self.stats.discarded_rows += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReferenceRecord, MODEL_MISSING, TYPE_MISSING};

    fn header(serial: &str) -> CanonicalRow {
        CanonicalRow {
            serial: Some(serial.to_string()),
            total_qty: 0.0,
            spare_qty: 0.0,
            item_no: None,
            description: None,
            unit_price: None,
        }
    }

    fn part(serial: &str, item_no: &str, total: f64, spare: f64) -> CanonicalRow {
        CanonicalRow {
            serial: Some(serial.to_string()),
            total_qty: total,
            spare_qty: spare,
            item_no: Some(item_no.to_string()),
            description: Some(format!("{} desc", item_no)),
            unit_price: None,
        }
    }

    fn reference() -> ReferenceIndex {
        ReferenceIndex::build(vec![ReferenceRecord::new(
            "S1",
            Some("M-100"),
            Some("Pump"),
        )])
    }

    #[test]
    fn test_skip_first_row_of_each_block() {
        let rows = vec![
            header("S1"),
            part("S1", "P1", 2.0, 1.0),
            part("S1", "P1", 1.0, 1.0),
            header("S2"),
            part("S2", "P1", 5.0, 3.0),
        ];
        let index = reference();
        let mut parser = MachineBlockParser::new(rows, &index, BlockHeaderPolicy::SkipFirstRow);
        let parts: Vec<PartRow> = parser.by_ref().collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].model, "M-100");
        assert_eq!(parts[0].equipment_type, "Pump");
        assert_eq!(parts[2].model, MODEL_MISSING);
        assert_eq!(parts[2].equipment_type, TYPE_MISSING);

        let stats = parser.stats();
        assert_eq!(stats.machine_blocks, 2);
        assert_eq!(stats.header_rows, 2);
        assert_eq!(stats.part_rows, 3);
    }

    #[test]
    fn test_skip_first_row_drops_part_like_header() {
        // 块首行即使带零件数据也不参与汇总
        let rows = vec![part("S1", "P1", 9.0, 9.0), part("S1", "P2", 1.0, 1.0)];
        let index = reference();
        let parts: Vec<PartRow> =
            MachineBlockParser::new(rows, &index, BlockHeaderPolicy::SkipFirstRow).collect();

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].item_no, "P2");
    }

    #[test]
    fn test_data_unless_blank_keeps_first_row() {
        let rows = vec![
            part("S1", "P1", 9.0, 9.0),
            part("S1", "P2", 1.0, 1.0),
            header("S2"),
        ];
        let index = reference();
        let mut parser =
            MachineBlockParser::new(rows, &index, BlockHeaderPolicy::DataUnlessBlank);
        let parts: Vec<PartRow> = parser.by_ref().collect();

        assert_eq!(parts.len(), 2);
        assert_eq!(parser.stats().machine_blocks, 2);
        assert_eq!(parser.stats().discarded_rows, 1);
    }

    #[test]
    fn test_discard_rules() {
        let mut blank_description = part("S1", "P3", 1.0, 1.0);
        blank_description.description = None;

        let rows = vec![
            header("S1"),
            part("S1", "tbd", 1.0, 1.0),
            part("S1", "TBD", 1.0, 1.0),
            header("S1"),
            blank_description,
            part("S1", "P4", 1.0, 1.0),
        ];
        let index = reference();
        let mut parser = MachineBlockParser::new(rows, &index, BlockHeaderPolicy::SkipFirstRow);
        let parts: Vec<PartRow> = parser.by_ref().collect();

        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].item_no, "P4");
        assert_eq!(parser.stats().discarded_rows, 4);
    }

    #[test]
    fn test_missing_serial_is_always_a_boundary() {
        let mut orphan = part("S1", "P1", 1.0, 1.0);
        orphan.serial = None;

        let rows = vec![header("S1"), orphan.clone(), orphan, part("S1", "P2", 1.0, 1.0)];
        let index = reference();
        let mut parser = MachineBlockParser::new(rows, &index, BlockHeaderPolicy::SkipFirstRow);
        let parts: Vec<PartRow> = parser.by_ref().collect();

        // 两个无序列号行各自成块；回到 S1 时又是新块首行
        assert!(parts.is_empty());
        assert_eq!(parser.stats().machine_blocks, 4);
    }
}
