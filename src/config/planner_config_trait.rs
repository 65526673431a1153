// ==========================================
// 备件库存规划 - 规划配置读取 Trait
// ==========================================
// 职责: 定义转换流程所需的配置读取接口（不包含实现）
// 实现者: ConfigManager（config_kv 表）、PlannerConfig（固定配置）
// ==========================================

use crate::config::error::ConfigResult;
use crate::config::planner_config::PlannerConfig;
use crate::domain::BlockHeaderPolicy;
use async_trait::async_trait;

#[async_trait]
pub trait PlannerConfigReader: Send + Sync {
    /// 列名模糊匹配下限
    ///
    /// # 默认值
    /// - 0.6
    async fn get_similarity_cutoff(&self) -> ConfigResult<f64>;

    /// 是否按设备类型分池汇总
    ///
    /// # 默认值
    /// - true
    async fn get_group_by_equipment_type(&self) -> ConfigResult<bool>;

    /// 机台分块首行策略
    ///
    /// # 默认值
    /// - SKIP_FIRST_ROW
    async fn get_block_header_policy(&self) -> ConfigResult<BlockHeaderPolicy>;

    /// 参考库查询语句
    async fn get_reference_query(&self) -> ConfigResult<String>;

    /// 一次性读取完整配置（每次转换只调用一次）
    async fn load_planner_config(&self) -> ConfigResult<PlannerConfig> {
        Ok(PlannerConfig {
            similarity_cutoff: self.get_similarity_cutoff().await?,
            group_by_equipment_type: self.get_group_by_equipment_type().await?,
            block_header_policy: self.get_block_header_policy().await?,
            reference_query: self.get_reference_query().await?,
        })
    }
}

// 固定配置（测试 / 无配置库场景）
#[async_trait]
impl PlannerConfigReader for PlannerConfig {
    async fn get_similarity_cutoff(&self) -> ConfigResult<f64> {
        Ok(self.similarity_cutoff)
    }

    async fn get_group_by_equipment_type(&self) -> ConfigResult<bool> {
        Ok(self.group_by_equipment_type)
    }

    async fn get_block_header_policy(&self) -> ConfigResult<BlockHeaderPolicy> {
        Ok(self.block_header_policy)
    }

    async fn get_reference_query(&self) -> ConfigResult<String> {
        Ok(self.reference_query.clone())
    }

    async fn load_planner_config(&self) -> ConfigResult<PlannerConfig> {
        Ok(self.clone())
    }
}
