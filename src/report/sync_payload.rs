// ==========================================
// NGO 補助核銷系統 - 试算表同步载荷
// ==========================================
// 栏位顺序: 时间, 区域, 社工, 姓名, 月份, 项目, 金额, 来源, 备注
// ==========================================

use crate::domain::record::SubsidyRecord;
use serde::{Deserialize, Serialize};

pub const SYNC_ACTION_ALL: &str = "sync_all";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRow {
    pub timestamp: String,
    pub region: String,
    pub worker: String,
    pub client_name: String,
    pub month: String,
    pub item: String,
    pub amount: f64,
    pub source: String,
    pub remarks: String,
}

impl From<&SubsidyRecord> for SyncRow {
    fn from(r: &SubsidyRecord) -> Self {
        Self {
            timestamp: r.submit_time.clone(),
            region: r.region.clone(),
            worker: r.worker.clone(),
            client_name: r.client_name.clone(),
            month: r.month.clone(),
            item: r.item.clone(),
            amount: r.amount,
            source: r.source.clone(),
            remarks: r.remarks.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    pub action: String,
    pub data: Vec<SyncRow>,
}

/// 全量同步载荷（id 不外送）
pub fn build_sync_payload(records: &[SubsidyRecord]) -> SyncPayload {
    SyncPayload {
        action: SYNC_ACTION_ALL.to_string(),
        data: records.iter().map(SyncRow::from).collect(),
    }
}
