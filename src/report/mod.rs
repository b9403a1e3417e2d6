// ==========================================
// NGO 補助核銷系統 - 报表层
// ==========================================
// 职责: 仪表板统计 / AI 分析提示词 / 试算表同步载荷
// 说明: 纯函数，只整理数据；对外发送由调用方负责
// ==========================================

pub mod dashboard;
pub mod insight;
pub mod sync_payload;

pub use dashboard::DashboardStats;
pub use insight::{aggregate_for_insight, build_insight_prompt, InsightGroup};
pub use sync_payload::{build_sync_payload, SyncPayload, SyncRow};

use num_format::{Locale, ToFormattedString};

/// 金额显示：千分位，整数不带小数，否则保留两位
pub fn format_amount(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let abs = amount.abs();
    let integer_part = (abs.trunc() as i64).to_formatted_string(&Locale::en);

    let cents = (abs.fract() * 100.0).round() as i64;
    if cents == 0 {
        format!("{}{}", sign, integer_part)
    } else if cents == 100 {
        let rounded = (abs.trunc() as i64 + 1).to_formatted_string(&Locale::en);
        format!("{}{}", sign, rounded)
    } else {
        format!("{}{}.{:02}", sign, integer_part, cents)
    }
}
