// ==========================================
// NGO 補助核銷系統 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout，减少批次导入并发写入时的 busy 错误
// - 建表（幂等）
// ==========================================

use rusqlite::{Connection, OptionalExtension};
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 显式指定数据库路径的环境变量
pub const DB_PATH_ENV: &str = "NGO_LEDGER_DB";

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接、应用统一配置并确保表结构存在
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 内存数据库（测试与预览用）
pub fn open_in_memory() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// 建表（幂等）
///
/// - subsidy_record: 补助记录；batch_no 越大越新，seq 保留批次内顺序
/// - settings_kv: 系统设定（JSON 值）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS subsidy_record (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            id TEXT NOT NULL UNIQUE,
            batch_no INTEGER NOT NULL,
            submit_time TEXT NOT NULL,
            region TEXT NOT NULL,
            worker TEXT NOT NULL,
            client_name TEXT NOT NULL,
            month TEXT NOT NULL,
            item TEXT NOT NULL,
            amount REAL NOT NULL,
            source TEXT NOT NULL,
            remarks TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_subsidy_record_batch
            ON subsidy_record (batch_no DESC, seq ASC);

        CREATE TABLE IF NOT EXISTS settings_kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> =
        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}

/// 默认数据库路径
///
/// 优先使用环境变量 NGO_LEDGER_DB，其次为用户数据目录
pub fn default_db_path() -> String {
    resolve_db_path(std::env::var(DB_PATH_ENV).ok().as_deref())
}

/// 显式路径（去空白后非空）优先，否则使用用户数据目录
pub fn resolve_db_path(explicit: Option<&str>) -> String {
    if let Some(path) = explicit.map(str::trim).filter(|p| !p.is_empty()) {
        return path.to_string();
    }

    let mut path = PathBuf::from("./ngo_subsidy_ledger.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("ngo-subsidy-ledger");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("ledger.db");
        }
    }
    path.to_string_lossy().to_string()
}
