// ==========================================
// 备件库存规划 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一 Connection::open 的 PRAGMA 行为
// - 设备台账只读打开，避免误写
// ==========================================

use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;
use std::time::Duration;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "SPARE_PARTS_PLANNER_DB_PATH";

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 只读打开 SQLite 连接（文件不存在时报错，不会新建）
pub fn open_sqlite_readonly(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径（设备台账 + 配置）
///
/// 优先级: 环境变量 SPARE_PARTS_PLANNER_DB_PATH → 用户数据目录 → 当前目录
pub fn default_db_path() -> PathBuf {
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    match dirs::data_dir() {
        Some(data_dir) => data_dir
            .join("spare-parts-planner")
            .join("spare_parts_planner.db"),
        None => PathBuf::from("./spare_parts_planner.db"),
    }
}
