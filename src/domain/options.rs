// ==========================================
// NGO 補助核銷系統 - 参考清单
// ==========================================
// 区域 / 社工 / 个案 / 补助项目 / 经费来源 五类下拉清单
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// ListName - 清单名称
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListName {
    Workers,
    Regions,
    Clients,
    Items,
    Sources,
}

impl ListName {
    pub const ALL: [ListName; 5] = [
        ListName::Workers,
        ListName::Regions,
        ListName::Clients,
        ListName::Items,
        ListName::Sources,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListName::Workers => "workers",
            ListName::Regions => "regions",
            ListName::Clients => "clients",
            ListName::Items => "items",
            ListName::Sources => "sources",
        }
    }
}

impl fmt::Display for ListName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 追加 values 中尚未出现的值，保持首次出现顺序；返回新增数量
fn append_distinct<I>(target: &mut Vec<String>, values: I) -> usize
where
    I: IntoIterator<Item = String>,
{
    let mut added = 0;
    for value in values {
        if !target.contains(&value) {
            target.push(value);
            added += 1;
        }
    }
    added
}

// ==========================================
// ReferenceLists - 参考清单解析结果
// ==========================================
// 部分映射：只有匹配到表头的清单才会出现（可以是空清单）
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceLists {
    lists: BTreeMap<ListName, Vec<String>>,
}

impl ReferenceLists {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个清单（即使没有值）
    pub fn ensure(&mut self, name: ListName) -> &mut Vec<String> {
        self.lists.entry(name).or_default()
    }

    /// 追加去重后的值，返回新增数量
    pub fn extend_distinct<I>(&mut self, name: ListName, values: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        append_distinct(self.ensure(name), values)
    }

    pub fn get(&self, name: ListName) -> Option<&[String]> {
        self.lists.get(&name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: ListName) -> bool {
        self.lists.contains_key(&name)
    }

    pub fn names(&self) -> impl Iterator<Item = ListName> + '_ {
        self.lists.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ListName, &[String])> {
        self.lists.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

// ==========================================
// NgoOptions - 系统下拉选项
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgoOptions {
    pub regions: Vec<String>,
    pub workers: Vec<String>,
    pub clients: Vec<String>,
    pub items: Vec<String>,
    pub sources: Vec<String>,
    /// 备注预设值
    #[serde(default)]
    pub remarks: Vec<String>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for NgoOptions {
    fn default() -> Self {
        Self {
            regions: owned(&["台北中心", "台中中心", "高雄中心", "萬華家處"]),
            workers: owned(&["呂予瑄", "王郁潔", "賴玟綺", "楊佩穎"]),
            clients: owned(&["許澤豫", "廖晨旭", "徐意綸", "張晉彤"]),
            items: owned(&["高中學雜費", "大學學雜費", "個案生活費", "個案房租費", "個案交通費"]),
            sources: owned(&["2025年勸募", "基隆市自立案", "聚陽實業", "華安扶輪社", "華陽扶輪社"]),
            remarks: owned(&["核銷完成", "急件處理", "待補收據", "批次匯入", "手動補登"]),
        }
    }
}

impl NgoOptions {
    pub fn list(&self, name: ListName) -> &[String] {
        match name {
            ListName::Workers => &self.workers,
            ListName::Regions => &self.regions,
            ListName::Clients => &self.clients,
            ListName::Items => &self.items,
            ListName::Sources => &self.sources,
        }
    }

    fn list_mut(&mut self, name: ListName) -> &mut Vec<String> {
        match name {
            ListName::Workers => &mut self.workers,
            ListName::Regions => &mut self.regions,
            ListName::Clients => &mut self.clients,
            ListName::Items => &mut self.items,
            ListName::Sources => &mut self.sources,
        }
    }

    /// 合并参考清单
    ///
    /// 只处理 lists 中出现的清单；新值追加在既有值之后，已有值不重复。
    /// 返回新增值的总数
    pub fn merge_reference_lists(&mut self, lists: &ReferenceLists) -> usize {
        let mut added = 0;
        for (name, values) in lists.iter() {
            added += append_distinct(self.list_mut(name), values.iter().cloned());
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extend_distinct_keeps_first_seen_order() {
        let mut lists = ReferenceLists::new();
        let added = lists.extend_distinct(
            ListName::Regions,
            vec!["台北".to_string(), "高雄".to_string(), "台北".to_string()],
        );
        assert_eq!(added, 2);
        assert_eq!(
            lists.get(ListName::Regions).unwrap(),
            &["台北".to_string(), "高雄".to_string()]
        );
        assert!(!lists.contains(ListName::Workers));
    }

    #[test]
    fn test_merge_only_touches_present_lists() {
        let mut options = NgoOptions::default();
        let before_workers = options.workers.clone();

        let mut lists = ReferenceLists::new();
        lists.extend_distinct(
            ListName::Regions,
            vec!["台北中心".to_string(), "花蓮中心".to_string()],
        );

        let added = options.merge_reference_lists(&lists);
        assert_eq!(added, 1);
        assert_eq!(options.regions.last().map(String::as_str), Some("花蓮中心"));
        assert_eq!(options.regions.len(), 5);
        assert_eq!(options.workers, before_workers);
    }

    #[test]
    fn test_reference_lists_serialize_as_plain_map() {
        let mut lists = ReferenceLists::new();
        lists.extend_distinct(ListName::Workers, vec!["王小美".to_string()]);
        let json = serde_json::to_value(&lists).unwrap();
        assert_eq!(json, serde_json::json!({ "workers": ["王小美"] }));
    }
}
