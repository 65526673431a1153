// ==========================================
// 备件库存规划 - 配置管理器
// ==========================================
// 职责: 从 config_kv 表读取规划配置，缺失或非法时回退默认值
// 存储: config_kv 表 (scope_id='global')
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::planner_config::{config_keys, PlannerConfig};
use crate::config::planner_config_trait::PlannerConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::BlockHeaderPolicy;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
    defaults: PlannerConfig,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            defaults: PlannerConfig::default(),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn
                .lock()
                .map_err(|e| ConfigError::LockError(e.to_string()))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self {
            conn,
            defaults: PlannerConfig::default(),
        })
    }

    /// 替换默认值（配置库中未设置的键使用这里的值）
    pub fn with_defaults(mut self, defaults: PlannerConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// 创建 config_kv 表（幂等）
    pub fn init_schema(&self) -> ConfigResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS config_kv (
                scope_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (scope_id, key)
            )
            "#,
            [],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在，或库中没有 config_kv 表（参考库兼作配置库的场景）
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;

        let has_table: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'config_kv')",
            [],
            |row| row.get(0),
        )?;
        if !has_table {
            return Ok(None);
        }

        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| ConfigError::LockError(e.to_string()))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置（key 有序）
    pub fn get_config_snapshot(&self) -> ConfigResult<BTreeMap<String, String>> {
        let mut snapshot = BTreeMap::new();
        for key in [
            config_keys::SIMILARITY_CUTOFF,
            config_keys::GROUP_BY_EQUIPMENT_TYPE,
            config_keys::BLOCK_HEADER_POLICY,
            config_keys::REFERENCE_QUERY,
        ] {
            if let Some(value) = self.get_config_value(key)? {
                snapshot.insert(key.to_string(), value);
            }
        }
        Ok(snapshot)
    }

    /// 读取并解析配置，解析失败时记录告警并回退默认值
    fn get_parsed_or_default<T, F>(&self, key: &str, default: T, parse: F) -> ConfigResult<T>
    where
        T: std::fmt::Debug,
        F: FnOnce(&str) -> Result<T, String>,
    {
        let Some(raw) = self.get_config_value(key)? else {
            return Ok(default);
        };
        match parse(raw.trim()) {
            Ok(value) => Ok(value),
            Err(reason) => {
                let err = ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: raw.clone(),
                    reason,
                };
                warn!(error = %err, default = ?default, "配置值非法，使用默认值");
                Ok(default)
            }
        }
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        other => Err(format!("无法解析为布尔值: {}", other)),
    }
}

fn parse_cutoff(value: &str) -> Result<f64, String> {
    let cutoff = f64::from_str(value).map_err(|e| e.to_string())?;
    if !(0.0..=1.0).contains(&cutoff) {
        return Err("取值范围应为 [0, 1]".to_string());
    }
    Ok(cutoff)
}

// ==========================================
// PlannerConfigReader 实现
// ==========================================
#[async_trait]
impl PlannerConfigReader for ConfigManager {
    async fn get_similarity_cutoff(&self) -> ConfigResult<f64> {
        self.get_parsed_or_default(
            config_keys::SIMILARITY_CUTOFF,
            self.defaults.similarity_cutoff,
            parse_cutoff,
        )
    }

    async fn get_group_by_equipment_type(&self) -> ConfigResult<bool> {
        self.get_parsed_or_default(
            config_keys::GROUP_BY_EQUIPMENT_TYPE,
            self.defaults.group_by_equipment_type,
            parse_bool,
        )
    }

    async fn get_block_header_policy(&self) -> ConfigResult<BlockHeaderPolicy> {
        self.get_parsed_or_default(
            config_keys::BLOCK_HEADER_POLICY,
            self.defaults.block_header_policy,
            BlockHeaderPolicy::from_str,
        )
    }

    async fn get_reference_query(&self) -> ConfigResult<String> {
        self.get_parsed_or_default(
            config_keys::REFERENCE_QUERY,
            self.defaults.reference_query.clone(),
            |value| {
                if value.is_empty() {
                    Err("查询语句为空".to_string())
                } else {
                    Ok(value.to_string())
                }
            },
        )
    }
}
