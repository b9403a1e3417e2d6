// ==========================================
// NGO 補助核銷系統 - 系统设定管理器
// ==========================================
// 职责: 下拉清单 / 同步端点的读取与覆写
// 存储: settings_kv 表 (key → JSON 值)
// ==========================================

use crate::domain::options::{NgoOptions, ReferenceLists};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// 设定键
pub mod setting_keys {
    pub const NGO_OPTIONS: &str = "ngo_options";
    pub const SYNC_URL: &str = "sync_url";
}

// ==========================================
// SettingsManager - 系统设定管理器
// ==========================================
pub struct SettingsManager {
    conn: Arc<Mutex<Connection>>,
}

impl SettingsManager {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn get_value<T: DeserializeOwned>(&self, key: &str) -> RepositoryResult<Option<T>> {
        let conn = self.get_conn()?;
        read_value(&conn, key)
    }

    fn set_value<T: Serialize>(&self, key: &str, value: &T) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        write_value(&conn, key, value)
    }

    // ==========================================
    // 下拉清单
    // ==========================================

    /// 读取下拉清单，未设定时返回内建默认值
    pub fn get_options(&self) -> RepositoryResult<NgoOptions> {
        Ok(self
            .get_value(setting_keys::NGO_OPTIONS)?
            .unwrap_or_default())
    }

    pub fn save_options(&self, options: &NgoOptions) -> RepositoryResult<()> {
        self.set_value(setting_keys::NGO_OPTIONS, options)
    }

    /// 将参考清单合并进现有下拉清单并保存
    ///
    /// # 返回
    /// - Ok(NgoOptions): 合并后的清单
    pub fn merge_reference_lists(&self, lists: &ReferenceLists) -> RepositoryResult<NgoOptions> {
        // 读取-合并-写回在同一把锁内完成
        let conn = self.get_conn()?;
        let mut options: NgoOptions =
            read_value(&conn, setting_keys::NGO_OPTIONS)?.unwrap_or_default();
        let added = options.merge_reference_lists(lists);
        write_value(&conn, setting_keys::NGO_OPTIONS, &options)?;
        info!(added = added, "参考清单已合并");
        Ok(options)
    }

    // ==========================================
    // 同步端点
    // ==========================================

    pub fn get_sync_url(&self) -> RepositoryResult<Option<String>> {
        Ok(self
            .get_value::<String>(setting_keys::SYNC_URL)?
            .filter(|url| !url.trim().is_empty()))
    }

    pub fn set_sync_url(&self, url: &str) -> RepositoryResult<()> {
        self.set_value(setting_keys::SYNC_URL, &url.trim().to_string())
    }
}

fn read_value<T: DeserializeOwned>(conn: &Connection, key: &str) -> RepositoryResult<Option<T>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM settings_kv WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;

    raw.map(|s| {
        serde_json::from_str(&s).map_err(|e| RepositoryError::SerializationError {
            key: key.to_string(),
            message: e.to_string(),
        })
    })
    .transpose()
}

fn write_value<T: Serialize>(conn: &Connection, key: &str, value: &T) -> RepositoryResult<()> {
    let raw = serde_json::to_string(value).map_err(|e| RepositoryError::SerializationError {
        key: key.to_string(),
        message: e.to_string(),
    })?;

    conn.execute(
        r#"
        INSERT INTO settings_kv (key, value, updated_at)
        VALUES (?1, ?2, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        params![key, raw],
    )?;
    debug!(key = key, "设定已更新");
    Ok(())
}
