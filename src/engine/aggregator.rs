// ==========================================
// 备件库存规划 - 零件汇总器
// ==========================================
// 输入: 机台分块解析器产出的零件行
// 输出: 按汇总键累积的 PartAccumulator（保持首次出现顺序）
// 汇总键:
// - PerEquipmentType: (设备类型, 零件号)
// - Flattened: 零件号
// 单机最大备件数: 先按 (零件, 序列号) 累加备件数，再在序列号之间取最大
// ==========================================

use crate::domain::{AggregationMode, PartRow};
use crate::engine::scale_factor::{recommended_spare_qty, scale_factor};
use std::collections::{BTreeSet, HashMap};

// ==========================================
// AggregationKey - 汇总键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AggregationKey {
    Part {
        item_no: String,
    },
    TypedPart {
        equipment_type: String,
        item_no: String,
    },
}

impl AggregationKey {
    pub fn for_row(row: &PartRow, mode: AggregationMode) -> Self {
        match mode {
            AggregationMode::PerEquipmentType => AggregationKey::TypedPart {
                equipment_type: row.equipment_type.clone(),
                item_no: row.item_no.clone(),
            },
            AggregationMode::Flattened => AggregationKey::Part {
                item_no: row.item_no.clone(),
            },
        }
    }

    /// 分组用设备类型（Flattened 口径下为 None）
    pub fn equipment_type(&self) -> Option<&str> {
        match self {
            AggregationKey::TypedPart { equipment_type, .. } => Some(equipment_type),
            AggregationKey::Part { .. } => None,
        }
    }
}

// ==========================================
// PartAccumulator - 零件累积器
// ==========================================
#[derive(Debug, Clone)]
pub struct PartAccumulator {
    pub key: AggregationKey,
    pub item_no: String,
    pub description: String,               // 首次出现者为准
    pub unit_price: Option<f64>,           // 首个非空值为准
    pub total_qty: f64,                    // 累计总数量
    pub models: BTreeSet<String>,          // 涉及型号
    pub serials: BTreeSet<String>,         // 涉及机台
    pub equipment_types: BTreeSet<String>, // 涉及设备类型（仅 Flattened）
    spare_by_serial: HashMap<String, f64>, // 序列号 → 本零件累计备件数
    max_spare_per_machine: f64,
}

impl PartAccumulator {
    fn new(key: AggregationKey, row: &PartRow) -> Self {
        Self {
            key,
            item_no: row.item_no.clone(),
            description: row.description.clone(),
            unit_price: None,
            total_qty: 0.0,
            models: BTreeSet::new(),
            serials: BTreeSet::new(),
            equipment_types: BTreeSet::new(),
            spare_by_serial: HashMap::new(),
            max_spare_per_machine: 0.0,
        }
    }

    fn fold(&mut self, row: &PartRow, mode: AggregationMode) {
        if self.unit_price.is_none() {
            self.unit_price = row.unit_price;
        }
        self.total_qty += row.total_qty;
        self.models.insert(row.model.clone());
        self.serials.insert(row.serial.clone());
        if mode == AggregationMode::Flattened {
            self.equipment_types.insert(row.equipment_type.clone());
        }

        let running = self.spare_by_serial.entry(row.serial.clone()).or_insert(0.0);
        *running += row.spare_qty;
        if *running > self.max_spare_per_machine {
            self.max_spare_per_machine = *running;
        }
    }

    /// 机台数 = 贡献过可备货行的不同序列号数
    pub fn machine_count(&self) -> usize {
        self.serials.len()
    }

    pub fn max_spare_per_machine(&self) -> f64 {
        self.max_spare_per_machine
    }

    pub fn scale_factor(&self) -> f64 {
        scale_factor(self.machine_count())
    }

    pub fn recommended_spare_qty(&self) -> f64 {
        recommended_spare_qty(self.max_spare_per_machine, self.machine_count())
    }

    /// 型号列（排序后逗号拼接）
    pub fn models_joined(&self) -> String {
        join_sorted(&self.models)
    }

    pub fn equipment_types_joined(&self) -> String {
        join_sorted(&self.equipment_types)
    }
}

fn join_sorted(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

// ==========================================
// PartAggregator - 汇总器
// ==========================================
// 每个 sheet 独立创建，不跨 sheet 共享状态
#[derive(Debug, Clone)]
pub struct PartAggregator {
    mode: AggregationMode,
    entries: Vec<PartAccumulator>,
    positions: HashMap<AggregationKey, usize>,
}

impl PartAggregator {
    pub fn new(mode: AggregationMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    /// 累积一行
    pub fn add(&mut self, row: &PartRow) {
        let key = AggregationKey::for_row(row, self.mode);
        let position = match self.positions.get(&key) {
            Some(position) => *position,
            None => {
                self.entries.push(PartAccumulator::new(key.clone(), row));
                self.positions.insert(key, self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        self.entries[position].fold(row, self.mode);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &AggregationKey) -> Option<&PartAccumulator> {
        self.positions.get(key).map(|idx| &self.entries[*idx])
    }

    /// 全部累积器（首次出现顺序）
    pub fn accumulators(&self) -> &[PartAccumulator] {
        &self.entries
    }
}

impl Extend<PartRow> for PartAggregator {
    fn extend<T: IntoIterator<Item = PartRow>>(&mut self, iter: T) {
        for row in iter {
            self.add(&row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(serial: &str, equipment_type: &str, item_no: &str, total: f64, spare: f64) -> PartRow {
        PartRow {
            serial: serial.to_string(),
            model: format!("{}-model", serial),
            equipment_type: equipment_type.to_string(),
            item_no: item_no.to_string(),
            description: format!("{} desc", item_no),
            unit_price: None,
            total_qty: total,
            spare_qty: spare,
        }
    }

    fn part_key(item_no: &str) -> AggregationKey {
        AggregationKey::Part {
            item_no: item_no.to_string(),
        }
    }

    #[test]
    fn test_spare_summed_per_machine_before_max() {
        let mut aggregator = PartAggregator::new(AggregationMode::Flattened);
        aggregator.extend(vec![
            row("S1", "Pump", "P1", 2.0, 1.0),
            row("S1", "Pump", "P1", 1.0, 1.0),
            row("S2", "Pump", "P1", 5.0, 3.0),
        ]);

        let acc = aggregator.get(&part_key("P1")).unwrap();
        assert_eq!(acc.max_spare_per_machine(), 3.0);
        assert_eq!(acc.machine_count(), 2);
        assert_eq!(acc.total_qty, 8.0);
    }

    #[test]
    fn test_sum_beats_single_row_max() {
        let mut aggregator = PartAggregator::new(AggregationMode::Flattened);
        aggregator.extend(vec![
            row("S1", "Pump", "P1", 1.0, 2.0),
            row("S1", "Pump", "P1", 1.0, 2.0),
            row("S2", "Pump", "P1", 1.0, 3.0),
        ]);

        let acc = aggregator.get(&part_key("P1")).unwrap();
        assert_eq!(acc.max_spare_per_machine(), 4.0);
    }

    #[test]
    fn test_per_serial_totals_are_scoped_to_part() {
        let mut aggregator = PartAggregator::new(AggregationMode::Flattened);
        aggregator.extend(vec![
            row("S1", "Pump", "P1", 1.0, 5.0),
            row("S1", "Pump", "P2", 1.0, 1.0),
        ]);

        assert_eq!(aggregator.get(&part_key("P2")).unwrap().max_spare_per_machine(), 1.0);
    }

    #[test]
    fn test_per_equipment_type_key_silos_parts() {
        let mut aggregator = PartAggregator::new(AggregationMode::PerEquipmentType);
        aggregator.extend(vec![
            row("S1", "Pump", "P1", 1.0, 1.0),
            row("S2", "Compressor", "P1", 1.0, 2.0),
        ]);

        assert_eq!(aggregator.len(), 2);
        let pump = aggregator
            .get(&AggregationKey::TypedPart {
                equipment_type: "Pump".to_string(),
                item_no: "P1".to_string(),
            })
            .unwrap();
        assert_eq!(pump.machine_count(), 1);
        assert!(pump.equipment_types.is_empty());
    }

    #[test]
    fn test_flattened_tracks_equipment_types() {
        let mut aggregator = PartAggregator::new(AggregationMode::Flattened);
        aggregator.extend(vec![
            row("S1", "Pump", "P1", 1.0, 1.0),
            row("S2", "Compressor", "P1", 1.0, 2.0),
        ]);

        let acc = aggregator.get(&part_key("P1")).unwrap();
        assert_eq!(acc.equipment_types_joined(), "Compressor, Pump");
        assert_eq!(acc.models_joined(), "S1-model, S2-model");
    }

    #[test]
    fn test_first_seen_description_and_price() {
        let mut first = row("S1", "Pump", "P1", 1.0, 1.0);
        first.description = "Seal kit".to_string();
        let mut second = row("S2", "Pump", "P1", 1.0, 1.0);
        second.description = "Seal kit (new)".to_string();
        second.unit_price = Some(12.0);
        let mut third = row("S3", "Pump", "P1", 1.0, 1.0);
        third.unit_price = Some(99.0);

        let mut aggregator = PartAggregator::new(AggregationMode::Flattened);
        aggregator.extend(vec![first, second, third]);

        let acc = aggregator.get(&part_key("P1")).unwrap();
        assert_eq!(acc.description, "Seal kit");
        assert_eq!(acc.unit_price, Some(12.0));
    }

    #[test]
    fn test_encounter_order_preserved() {
        let mut aggregator = PartAggregator::new(AggregationMode::Flattened);
        aggregator.extend(vec![
            row("S1", "Pump", "P9", 1.0, 1.0),
            row("S1", "Pump", "P1", 1.0, 1.0),
            row("S2", "Pump", "P9", 1.0, 1.0),
        ]);

        let order: Vec<&str> = aggregator
            .accumulators()
            .iter()
            .map(|a| a.item_no.as_str())
            .collect();
        assert_eq!(order, vec!["P9", "P1"]);
    }

    #[test]
    fn test_recommended_uses_fleet_size() {
        let mut aggregator = PartAggregator::new(AggregationMode::Flattened);
        for i in 0..5 {
            aggregator.add(&row(&format!("S{}", i), "Pump", "P1", 1.0, 3.0));
        }

        let acc = aggregator.get(&part_key("P1")).unwrap();
        assert_eq!(acc.machine_count(), 5);
        assert_eq!(acc.scale_factor(), 1.25);
        assert_eq!(acc.recommended_spare_qty(), 4.0);
    }
}
