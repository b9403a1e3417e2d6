// ==========================================
// NGO 補助核銷系統 - 仪表板统计
// ==========================================

use crate::domain::record::SubsidyRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// 总核销金额
    pub total_amount: f64,
    /// 累计服务个案数（不重复姓名）
    pub client_count: usize,
    /// 经费来源数（不重复）
    pub source_count: usize,
    pub record_count: usize,
}

impl DashboardStats {
    pub fn from_records(records: &[SubsidyRecord]) -> Self {
        let clients: HashSet<&str> = records.iter().map(|r| r.client_name.as_str()).collect();
        let sources: HashSet<&str> = records.iter().map(|r| r.source.as_str()).collect();

        Self {
            total_amount: records.iter().map(|r| r.amount).sum(),
            client_count: clients.len(),
            source_count: sources.len(),
            record_count: records.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(client: &str, source: &str, amount: f64) -> SubsidyRecord {
        SubsidyRecord {
            id: format!("{}-{}", client, source),
            submit_time: String::new(),
            region: "台中中心".to_string(),
            worker: "賴玟綺".to_string(),
            client_name: client.to_string(),
            month: "2025-03".to_string(),
            item: "個案交通費".to_string(),
            amount,
            source: source.to_string(),
            remarks: String::new(),
        }
    }

    #[test]
    fn test_stats_count_distinct_clients_and_sources() {
        let records = vec![
            record("徐意綸", "華安扶輪社", 800.0),
            record("徐意綸", "聚陽實業", 1200.0),
            record("張晉彤", "華安扶輪社", 500.0),
        ];
        let stats = DashboardStats::from_records(&records);

        assert_eq!(stats.total_amount, 2500.0);
        assert_eq!(stats.client_count, 2);
        assert_eq!(stats.source_count, 2);
        assert_eq!(stats.record_count, 3);
    }

    #[test]
    fn test_stats_empty() {
        assert_eq!(DashboardStats::from_records(&[]), DashboardStats::default());
    }
}
