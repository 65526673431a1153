// ==========================================
// 备件库存规划 - 命令行入口
// ==========================================
// 用法:
//   spare-parts-planner <input.xlsx|input.csv> <output.xlsx> [reference]
//
// reference:
// - .db / .sqlite: 设备台账库（按 reference_query 查询，同时读取 config_kv 覆写）
// - .csv: SerialNumber,Model,EquipmentType 三列台账
// - 省略: 使用默认数据库（SPARE_PARTS_PLANNER_DB_PATH 或用户数据目录）
//
// 转换摘要以 JSON 输出到 stdout
// ==========================================

use anyhow::{bail, Context, Result};
use spare_parts_planner::api::{ConversionApi, ConversionSummary, ConversionTotals};
use spare_parts_planner::config::{ConfigManager, PlannerConfig, PlannerConfigReader};
use spare_parts_planner::db::default_db_path;
use spare_parts_planner::reference::{
    CsvReferenceLookup, ReferenceLookup, SqliteReferenceLookup,
};
use spare_parts_planner::{logging, APP_NAME, VERSION};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

const USAGE: &str =
    "usage: spare-parts-planner <input.xlsx|input.csv> <output.xlsx> [reference.db|reference.csv]";

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("SPARE_PARTS_PLANNER_LOG_FORMAT").as_deref() == Ok("json") {
        logging::init_json();
    } else {
        logging::init();
    }

    let mut args = std::env::args().skip(1);
    let (Some(input), Some(output)) = (args.next(), args.next()) else {
        bail!(USAGE);
    };
    let input = PathBuf::from(input);
    let output = PathBuf::from(output);
    let reference = args.next().map(PathBuf::from);

    info!("{} v{}", APP_NAME, VERSION);

    let summary = match reference {
        Some(path) if is_csv(&path) => {
            let config = load_config(&default_db_path()).await?;
            convert(CsvReferenceLookup::new(path), config, &input, &output).await?
        }
        Some(path) => convert_with_sqlite(&path, &input, &output).await?,
        None => convert_with_sqlite(&default_db_path(), &input, &output).await?,
    };

    let totals = ConversionTotals::from(&summary);
    info!(
        sheets = totals.sheets,
        failed_sheets = totals.failed_sheets,
        parts = totals.parts,
        "转换结束"
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("摘要序列化失败")?
    );
    Ok(())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// 读取配置（数据库不存在时使用默认值）
async fn load_config(db_path: &Path) -> Result<PlannerConfig> {
    if !db_path.exists() {
        info!(path = %db_path.display(), "配置库不存在，使用默认配置");
        return Ok(PlannerConfig::default());
    }
    let db_path = db_path
        .to_str()
        .with_context(|| format!("数据库路径不是有效 UTF-8: {}", db_path.display()))?;
    let manager = ConfigManager::new(db_path)?;
    Ok(manager.load_planner_config().await?)
}

async fn convert_with_sqlite(
    db_path: &Path,
    input: &Path,
    output: &Path,
) -> Result<ConversionSummary> {
    let config = load_config(db_path).await?;
    let db_path = db_path
        .to_str()
        .with_context(|| format!("数据库路径不是有效 UTF-8: {}", db_path.display()))?;
    let lookup = SqliteReferenceLookup::new(db_path).with_query(config.reference_query.clone());
    convert(lookup, config, input, output).await
}

async fn convert<L: ReferenceLookup>(
    lookup: L,
    config: PlannerConfig,
    input: &Path,
    output: &Path,
) -> Result<ConversionSummary> {
    let api = ConversionApi::new(Arc::new(lookup), Arc::new(config));
    let summary = api
        .convert_file(input, output)
        .await
        .with_context(|| format!("转换失败: {}", input.display()))?;
    Ok(summary)
}
