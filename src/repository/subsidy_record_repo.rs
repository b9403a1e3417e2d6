// ==========================================
// NGO 補助核銷系統 - 补助记录仓储
// ==========================================
// 红线: Repository 不做业务逻辑,只做数据映射
// 排序: 新批次在前，批次内保持解析顺序
// ==========================================

use crate::domain::record::SubsidyRecord;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};

const SELECT_COLUMNS: &str = "id, submit_time, region, worker, client_name, month, item, amount, source, remarks";

pub struct SubsidyRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SubsidyRecordRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 写入操作
    // ==========================================

    /// 插入单条记录（自成一个批次）
    pub fn insert(&self, record: &SubsidyRecord) -> RepositoryResult<String> {
        self.insert_batch(std::slice::from_ref(record))?;
        Ok(record.id.clone())
    }

    /// 批量插入（单一事务，全部成功或全部回滚）
    ///
    /// # 返回
    /// - Ok(batch_no): 本批次编号；空批次返回 0 且不写入
    pub fn insert_batch(&self, records: &[SubsidyRecord]) -> RepositoryResult<i64> {
        if records.is_empty() {
            return Ok(0);
        }

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let batch_no = next_batch_no(&tx)?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO subsidy_record (
                    id, batch_no, submit_time, region, worker, client_name,
                    month, item, amount, source, remarks
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )?;
            for r in records {
                stmt.execute(params![
                    r.id,
                    batch_no,
                    r.submit_time,
                    r.region,
                    r.worker,
                    r.client_name,
                    r.month,
                    r.item,
                    r.amount,
                    r.source,
                    r.remarks,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(batch_no)
    }

    /// 按 ID 删除，返回是否有记录被删除
    pub fn delete_by_id(&self, id: &str) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM subsidy_record WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    /// 清空所有记录，返回删除数量
    pub fn clear(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let rows = conn.execute("DELETE FROM subsidy_record", [])?;
        Ok(rows)
    }

    // ==========================================
    // 查询操作
    // ==========================================

    pub fn list_all(&self) -> RepositoryResult<Vec<SubsidyRecord>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM subsidy_record ORDER BY batch_no DESC, seq ASC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], map_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    pub fn find_by_id(&self, id: &str) -> RepositoryResult<Option<SubsidyRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM subsidy_record WHERE id = ?1", SELECT_COLUMNS);
        let record = conn
            .query_row(&sql, params![id], map_record)
            .optional()?;
        Ok(record)
    }

    pub fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM subsidy_record", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn next_batch_no(tx: &Transaction<'_>) -> RepositoryResult<i64> {
    let current: i64 = tx.query_row(
        "SELECT COALESCE(MAX(batch_no), 0) FROM subsidy_record",
        [],
        |row| row.get(0),
    )?;
    Ok(current + 1)
}

fn map_record(row: &Row<'_>) -> rusqlite::Result<SubsidyRecord> {
    Ok(SubsidyRecord {
        id: row.get(0)?,
        submit_time: row.get(1)?,
        region: row.get(2)?,
        worker: row.get(3)?,
        client_name: row.get(4)?,
        month: row.get(5)?,
        item: row.get(6)?,
        amount: row.get(7)?,
        source: row.get(8)?,
        remarks: row.get(9)?,
    })
}
