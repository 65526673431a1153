// ==========================================
// 备件库存规划 - 规划配置
// ==========================================
// 职责: 一次转换所需的全部可调参数
// 来源: 默认值，可被 config_kv 表覆写（见 ConfigManager）
// ==========================================

use crate::domain::{AggregationMode, BlockHeaderPolicy};
use crate::importer::DEFAULT_SIMILARITY_CUTOFF;
use crate::reference::DEFAULT_REFERENCE_QUERY;
use serde::{Deserialize, Serialize};

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    pub const SIMILARITY_CUTOFF: &str = "similarity_cutoff";
    pub const GROUP_BY_EQUIPMENT_TYPE: &str = "group_by_equipment_type";
    pub const BLOCK_HEADER_POLICY: &str = "block_header_policy";
    pub const REFERENCE_QUERY: &str = "reference_query";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub similarity_cutoff: f64,              // 列名模糊匹配下限 [0, 1]
    pub group_by_equipment_type: bool,       // true = 按设备类型分池
    pub block_header_policy: BlockHeaderPolicy,
    pub reference_query: String,             // 参考库查询语句（三列: 序列号/型号/设备类型）
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            similarity_cutoff: DEFAULT_SIMILARITY_CUTOFF,
            group_by_equipment_type: true,
            block_header_policy: BlockHeaderPolicy::default(),
            reference_query: DEFAULT_REFERENCE_QUERY.to_string(),
        }
    }
}

impl PlannerConfig {
    pub fn aggregation_mode(&self) -> AggregationMode {
        AggregationMode::from_grouping(self.group_by_equipment_type)
    }

    pub fn with_grouping(mut self, group_by_equipment_type: bool) -> Self {
        self.group_by_equipment_type = group_by_equipment_type;
        self
    }

    pub fn with_block_header_policy(mut self, policy: BlockHeaderPolicy) -> Self {
        self.block_header_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.similarity_cutoff, 0.6);
        assert!(config.group_by_equipment_type);
        assert_eq!(config.block_header_policy, BlockHeaderPolicy::SkipFirstRow);
        assert_eq!(
            config.reference_query,
            "SELECT SerialNumber, Model, EquipmentType FROM EquipmentDB"
        );
        assert_eq!(config.aggregation_mode(), AggregationMode::PerEquipmentType);
    }

    #[test]
    fn test_builder_overrides() {
        let config = PlannerConfig::default()
            .with_grouping(false)
            .with_block_header_policy(BlockHeaderPolicy::DataUnlessBlank);
        assert_eq!(config.aggregation_mode(), AggregationMode::Flattened);
        assert_eq!(config.block_header_policy, BlockHeaderPolicy::DataUnlessBlank);
    }
}
