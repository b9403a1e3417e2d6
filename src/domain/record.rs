// ==========================================
// NGO 補助核銷系統 - 补助记录领域模型
// ==========================================
// 一行 × 一个非零经费来源列 = 一条记录（宽表转长表）
// ==========================================

use serde::{Deserialize, Serialize};

/// 批次导入记录的固定备注
pub const REMARK_BATCH_IMPORT: &str = "批次匯入";

/// 单笔补登记录的区域
pub const MANUAL_ENTRY_REGION: &str = "手動補登";

/// 单笔补登记录的操作人员
pub const MANUAL_ENTRY_WORKER: &str = "當前使用者";

// ==========================================
// SubsidyRecord - 补助记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsidyRecord {
    /// 不透明唯一 ID，无业务含义
    pub id: String,
    /// 批次时间戳，同一次解析的所有记录相同
    pub submit_time: String,
    pub region: String,
    pub worker: String,
    pub client_name: String,
    pub month: String,
    pub item: String,
    /// 严格大于 0
    pub amount: f64,
    pub source: String,
    pub remarks: String,
}

impl SubsidyRecord {
    /// 除 id / submit_time 外的业务字段是否一致
    pub fn same_content(&self, other: &SubsidyRecord) -> bool {
        self.region == other.region
            && self.worker == other.worker
            && self.client_name == other.client_name
            && self.month == other.month
            && self.item == other.item
            && self.amount == other.amount
            && self.source == other.source
            && self.remarks == other.remarks
    }
}

// ==========================================
// ImportContext - 导入上下文
// ==========================================
// 由调用方提供，原样写入每条记录，不从工作表推导
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportContext {
    pub region: String,
    pub worker: String,
    pub month: String,
}

impl ImportContext {
    pub fn new(
        region: impl Into<String>,
        worker: impl Into<String>,
        month: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            worker: worker.into(),
            month: month.into(),
        }
    }
}

// ==========================================
// ManualEntry - 单笔补登表单
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualEntry {
    pub client_name: String,
    pub item: String,
    pub amount: f64,
    pub source: String,
    pub remarks: String,
}
