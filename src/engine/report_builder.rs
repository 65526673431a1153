// ==========================================
// 备件库存规划 - 报表构建器
// ==========================================
// 排序: 按描述稳定排序（同描述保持首次出现顺序）
// 分组: PerEquipmentType 口径下按设备类型升序输出分组行，组内再按描述排序
// 数量: 备件列输出推荐备件数 ceil(单机最大备件数 × 规模系数)
// ==========================================

use crate::domain::{AggregationMode, CellValue, ReportTable};
use crate::engine::aggregator::PartAccumulator;
use std::collections::BTreeMap;

/// 报表列名
pub mod columns {
    pub const EQUIPMENT_TYPE: &str = "Equipment Type";
    pub const TOTAL_QTY: &str = "Total qty";
    pub const SPARE_QTY: &str = "Spare qty";
    pub const ITEM_NO: &str = "Item no.";
    pub const DESCRIPTION: &str = "Description";
    pub const UNIT_PRICE: &str = "Unit Price ($)";
    pub const MODELS: &str = "Models";
    pub const EQUIPMENT_TYPES: &str = "Equipment Types";
}

const GROUPED_COLUMNS: [&str; 7] = [
    columns::EQUIPMENT_TYPE,
    columns::TOTAL_QTY,
    columns::SPARE_QTY,
    columns::ITEM_NO,
    columns::DESCRIPTION,
    columns::UNIT_PRICE,
    columns::MODELS,
];

const FLAT_COLUMNS: [&str; 7] = [
    columns::TOTAL_QTY,
    columns::SPARE_QTY,
    columns::ITEM_NO,
    columns::DESCRIPTION,
    columns::UNIT_PRICE,
    columns::MODELS,
    columns::EQUIPMENT_TYPES,
];

#[derive(Debug, Clone, Copy)]
pub struct ReportBuilder {
    mode: AggregationMode,
}

impl ReportBuilder {
    pub fn new(mode: AggregationMode) -> Self {
        Self { mode }
    }

    pub fn build(&self, accumulators: &[PartAccumulator]) -> ReportTable {
        match self.mode {
            AggregationMode::PerEquipmentType => self.build_grouped(accumulators),
            AggregationMode::Flattened => self.build_flat(accumulators),
        }
    }

    fn build_grouped(&self, accumulators: &[PartAccumulator]) -> ReportTable {
        let mut table = ReportTable::new(&GROUPED_COLUMNS);

        let mut groups: BTreeMap<&str, Vec<&PartAccumulator>> = BTreeMap::new();
        for acc in accumulators {
            let equipment_type = acc.key.equipment_type().unwrap_or_default();
            groups.entry(equipment_type).or_default().push(acc);
        }

        for (equipment_type, mut parts) in groups {
            let mut header = vec![CellValue::Text(equipment_type.to_string())];
            header.resize(GROUPED_COLUMNS.len(), CellValue::Empty);
            table.push_row(header);

            sort_by_description(&mut parts);
            for acc in parts {
                let mut row = vec![CellValue::Empty];
                row.extend(part_cells(acc));
                table.push_row(row);
            }
        }
        table
    }

    fn build_flat(&self, accumulators: &[PartAccumulator]) -> ReportTable {
        let mut table = ReportTable::new(&FLAT_COLUMNS);

        let mut parts: Vec<&PartAccumulator> = accumulators.iter().collect();
        sort_by_description(&mut parts);
        for acc in parts {
            let mut row = part_cells(acc);
            row.push(CellValue::Text(acc.equipment_types_joined()));
            table.push_row(row);
        }
        table
    }
}

fn sort_by_description(parts: &mut [&PartAccumulator]) {
    parts.sort_by(|a, b| a.description.cmp(&b.description));
}

/// 零件行公共列: 总数量 / 推荐备件数 / 零件号 / 描述 / 单价 / 型号
fn part_cells(acc: &PartAccumulator) -> Vec<CellValue> {
    vec![
        CellValue::Number(acc.total_qty),
        CellValue::Number(acc.recommended_spare_qty()),
        CellValue::Text(acc.item_no.clone()),
        CellValue::Text(acc.description.clone()),
        acc.unit_price
            .map(CellValue::Number)
            .unwrap_or(CellValue::Empty),
        CellValue::Text(acc.models_joined()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PartRow;
    use crate::engine::aggregator::PartAggregator;

    fn row(serial: &str, equipment_type: &str, item_no: &str, description: &str) -> PartRow {
        PartRow {
            serial: serial.to_string(),
            model: format!("M-{}", serial),
            equipment_type: equipment_type.to_string(),
            item_no: item_no.to_string(),
            description: description.to_string(),
            unit_price: Some(10.0),
            total_qty: 2.0,
            spare_qty: 1.0,
        }
    }

    fn text(value: &CellValue) -> String {
        value.to_string()
    }

    #[test]
    fn test_grouped_layout() {
        let mut aggregator = PartAggregator::new(AggregationMode::PerEquipmentType);
        aggregator.extend(vec![
            row("S1", "Pump", "P2", "Valve"),
            row("S1", "Pump", "P1", "Bearing"),
            row("S2", "Compressor", "P3", "Filter"),
        ]);

        let table = ReportBuilder::new(AggregationMode::PerEquipmentType)
            .build(aggregator.accumulators());

        assert_eq!(table.columns, GROUPED_COLUMNS.to_vec());
        let first_column: Vec<String> = table.rows.iter().map(|r| text(&r[0])).collect();
        assert_eq!(first_column, vec!["Compressor", "", "Pump", "", ""]);

        let descriptions: Vec<String> = table.rows.iter().map(|r| text(&r[4])).collect();
        assert_eq!(descriptions, vec!["", "Filter", "", "Bearing", "Valve"]);

        // 分组行其余列为空
        assert!(table.rows[0][1..].iter().all(|c| *c == CellValue::Empty));
    }

    #[test]
    fn test_flat_layout_and_values() {
        let mut aggregator = PartAggregator::new(AggregationMode::Flattened);
        aggregator.extend(vec![
            row("S2", "Pump", "P1", "Bearing"),
            row("S1", "Compressor", "P1", "Bearing"),
        ]);

        let table =
            ReportBuilder::new(AggregationMode::Flattened).build(aggregator.accumulators());

        assert_eq!(table.columns, FLAT_COLUMNS.to_vec());
        assert_eq!(table.rows.len(), 1);
        let r = &table.rows[0];
        assert_eq!(r[0], CellValue::Number(4.0));
        assert_eq!(r[1], CellValue::Number(1.0));
        assert_eq!(r[2], CellValue::Text("P1".to_string()));
        assert_eq!(r[4], CellValue::Number(10.0));
        assert_eq!(r[5], CellValue::Text("M-S1, M-S2".to_string()));
        assert_eq!(r[6], CellValue::Text("Compressor, Pump".to_string()));
    }

    #[test]
    fn test_description_ties_keep_encounter_order() {
        let mut aggregator = PartAggregator::new(AggregationMode::Flattened);
        aggregator.extend(vec![
            row("S1", "Pump", "P9", "Gasket"),
            row("S1", "Pump", "P1", "Gasket"),
            row("S1", "Pump", "P5", "Alpha"),
        ]);

        let table =
            ReportBuilder::new(AggregationMode::Flattened).build(aggregator.accumulators());
        let items: Vec<String> = table.rows.iter().map(|r| text(&r[2])).collect();
        assert_eq!(items, vec!["P5", "P9", "P1"]);
    }

    #[test]
    fn test_empty_report_has_columns_only() {
        let table = ReportBuilder::new(AggregationMode::PerEquipmentType).build(&[]);
        assert_eq!(table.columns.len(), 7);
        assert!(table.rows.is_empty());
    }
}
