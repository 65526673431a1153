// ==========================================
// 备件库存规划 - 配置层
// ==========================================
// 职责: 规划配置默认值 + config_kv 覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod error;
pub mod planner_config;
pub mod planner_config_trait;

pub use config_manager::ConfigManager;
pub use error::{ConfigError, ConfigResult};
pub use planner_config::{config_keys, PlannerConfig};
pub use planner_config_trait::PlannerConfigReader;
