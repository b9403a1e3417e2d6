// ==========================================
// NGO 補助核銷系統 - AI 财务分析提示词
// ==========================================
// 按 (补助项目, 经费来源) 聚合后再交给文字服务，避免明细过大
// ==========================================

use crate::domain::record::SubsidyRecord;
use crate::report::format_amount;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 每组最多列出的个案姓名
pub const MAX_SAMPLE_CLIENTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightGroup {
    pub item: String,
    pub source: String,
    pub total_amount: f64,
    pub records_count: usize,
    pub clients_involved: Vec<String>,
}

/// 按 (item, source) 聚合，组的顺序为首次出现顺序
pub fn aggregate_for_insight(records: &[SubsidyRecord]) -> Vec<InsightGroup> {
    let mut groups: Vec<InsightGroup> = Vec::new();
    let mut index: HashMap<(&str, &str), usize> = HashMap::new();

    for r in records {
        let key = (r.item.as_str(), r.source.as_str());
        let pos = *index.entry(key).or_insert_with(|| {
            groups.push(InsightGroup {
                item: r.item.clone(),
                source: r.source.clone(),
                total_amount: 0.0,
                records_count: 0,
                clients_involved: Vec::new(),
            });
            groups.len() - 1
        });

        let group = &mut groups[pos];
        group.total_amount += r.amount;
        group.records_count += 1;
        if group.clients_involved.len() < MAX_SAMPLE_CLIENTS
            && !group.clients_involved.contains(&r.client_name)
        {
            group.clients_involved.push(r.client_name.clone());
        }
    }

    groups
}

/// 组装分析提示词
///
/// 人名必须与原始数据一致，提示词中明确禁止模型改写
pub fn build_insight_prompt(records: &[SubsidyRecord]) -> serde_json::Result<String> {
    let total: f64 = records.iter().map(|r| r.amount).sum();
    let summary = serde_json::to_string(&aggregate_for_insight(records))?;

    Ok(format!(
        "你是一個專業的 NGO 財務分析助手。請針對以下補助數據提供一份精簡、客觀的分析報告。\n\
         \n\
         最高優先級指令（人名保護）：\n\
         - 報告中提到的任何「人名」必須與原始數據完全一致。\n\
         - 絕對禁止進行自動校正、簡繁體轉換或任何形式的字體修改。\n\
         \n\
         分析要求：\n\
         1. 概括目前的核銷進度與總金額 (${total})。\n\
         2. 識別佔比最高的補助項目與經費來源。\n\
         3. 指出是否有異常的大額支出或集中現象。\n\
         4. 提供一個具體的財務管理建議。\n\
         \n\
         語言：繁體中文（台灣習慣）。\n\
         長度：約 150-200 字。\n\
         \n\
         數據摘要：{summary}",
        total = format_amount(total),
        summary = summary,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(client: &str, item: &str, source: &str, amount: f64) -> SubsidyRecord {
        SubsidyRecord {
            id: String::new(),
            submit_time: String::new(),
            region: "高雄中心".to_string(),
            worker: "楊佩穎".to_string(),
            client_name: client.to_string(),
            month: "2025-02".to_string(),
            item: item.to_string(),
            amount,
            source: source.to_string(),
            remarks: String::new(),
        }
    }

    #[test]
    fn test_aggregate_groups_by_item_and_source_in_first_seen_order() {
        let records = vec![
            record("甲", "房租", "勸募", 1000.0),
            record("乙", "學雜費", "勸募", 300.0),
            record("丙", "房租", "勸募", 500.0),
            record("甲", "房租", "扶輪社", 200.0),
        ];
        let groups = aggregate_for_insight(&records);

        assert_eq!(groups.len(), 3);
        assert_eq!((groups[0].item.as_str(), groups[0].source.as_str()), ("房租", "勸募"));
        assert_eq!(groups[0].total_amount, 1500.0);
        assert_eq!(groups[0].records_count, 2);
        assert_eq!(groups[0].clients_involved, vec!["甲", "丙"]);
        assert_eq!(groups[1].item, "學雜費");
        assert_eq!(groups[2].source, "扶輪社");
    }

    #[test]
    fn test_aggregate_caps_sample_clients() {
        let records: Vec<SubsidyRecord> = (0..8)
            .map(|i| record(&format!("個案{}", i), "生活費", "勸募", 10.0))
            .collect();
        let groups = aggregate_for_insight(&records);
        assert_eq!(groups[0].clients_involved.len(), MAX_SAMPLE_CLIENTS);
        assert_eq!(groups[0].records_count, 8);
    }

    #[test]
    fn test_prompt_embeds_total_and_summary() {
        let records = vec![record("涂芯瑜", "房租", "勸募", 12000.0)];
        let prompt = build_insight_prompt(&records).unwrap();

        assert!(prompt.contains("($12,000)"));
        assert!(prompt.contains("\"clientsInvolved\":[\"涂芯瑜\"]"));
        assert!(prompt.contains("\"totalAmount\":12000.0"));
    }
}
