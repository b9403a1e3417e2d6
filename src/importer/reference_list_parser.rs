// ==========================================
// NGO 補助核銷系統 - 参考清单解析器
// ==========================================
// 职责: 单表头工作表 → 区域/社工/个案/项目/来源清单
// 版式: 第一个工作表，第 0 行为表头，第 1 行起为数据
// 规则: 表头按关键字包含匹配，规则顺序即优先级，首个命中生效
// ==========================================

use crate::domain::options::{ListName, ReferenceLists};
use crate::importer::error::FormatError;
use crate::workbook::Workbook;
use tracing::{debug, info};

// ==========================================
// HeaderRule - 表头分类规则
// ==========================================
#[derive(Debug, Clone, Copy)]
pub struct HeaderRule {
    pub keywords: &'static [&'static str],
    pub target: ListName,
}

impl HeaderRule {
    /// 英文关键字不区分大小写
    fn matches(&self, header: &str) -> bool {
        let lowered = header.to_lowercase();
        self.keywords.iter().any(|k| lowered.contains(&k.to_lowercase()))
    }
}

/// 分类规则，按优先级排列
///
/// "社工姓名" 同时含有社工与姓名，落在 workers
pub const HEADER_RULES: [HeaderRule; 5] = [
    HeaderRule {
        keywords: &["社工", "Worker"],
        target: ListName::Workers,
    },
    HeaderRule {
        keywords: &["區域", "所屬", "Region", "Affiliation"],
        target: ListName::Regions,
    },
    HeaderRule {
        keywords: &["姓名", "個案", "Name", "Case"],
        target: ListName::Clients,
    },
    HeaderRule {
        keywords: &["項目", "補助", "Item", "Subsidy"],
        target: ListName::Items,
    },
    HeaderRule {
        keywords: &["來源", "經費", "Source", "Funding"],
        target: ListName::Sources,
    },
];

/// 表头分类，未命中任何规则返回 None
pub fn classify_header(header: &str) -> Option<ListName> {
    if header.is_empty() {
        return None;
    }
    HEADER_RULES
        .iter()
        .find(|rule| rule.matches(header))
        .map(|rule| rule.target)
}

// ==========================================
// ReferenceListParser - 参考清单解析器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceListParser;

impl ReferenceListParser {
    /// 解析参考清单
    ///
    /// # 返回
    /// - Ok(ReferenceLists): 只包含匹配到表头的清单；仅有表头时为空清单
    /// - Err(FormatError::EmptySheet): 第一个工作表一行都没有
    ///
    /// 同一清单对应多列时按 列→行 顺序合并去重
    pub fn parse(&self, workbook: &Workbook) -> Result<ReferenceLists, FormatError> {
        let sheet = match workbook.first_sheet() {
            Some(sheet) if sheet.row_count() > 0 => sheet,
            _ => return Err(FormatError::EmptySheet),
        };

        let headers = sheet.row_texts(0);
        let mut lists = ReferenceLists::new();

        for (col, header) in headers.iter().enumerate() {
            let target = match classify_header(header) {
                Some(target) => target,
                None => {
                    debug!(column = col, header = %header, "表头未匹配任何清单，略过");
                    continue;
                }
            };

            let values = (1..sheet.row_count())
                .map(|row| sheet.cell(row, col).as_text())
                .filter(|v| !v.is_empty());
            let added = lists.extend_distinct(target, values);
            debug!(column = col, header = %header, list = %target, added, "清单列解析完成");
        }

        info!(
            sheet = %sheet.name,
            lists = ?lists.names().collect::<Vec<_>>(),
            "参考清单解析完成"
        );
        Ok(lists)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority_order() {
        assert_eq!(classify_header("社工姓名"), Some(ListName::Workers));
        assert_eq!(classify_header("所屬區域"), Some(ListName::Regions));
        assert_eq!(classify_header("個案姓名"), Some(ListName::Clients));
        assert_eq!(classify_header("補助項目"), Some(ListName::Items));
        assert_eq!(classify_header("經費來源"), Some(ListName::Sources));
    }

    #[test]
    fn test_classify_english_headers() {
        assert_eq!(classify_header("Social Worker"), Some(ListName::Workers));
        assert_eq!(classify_header("Client name"), Some(ListName::Clients));
        assert_eq!(classify_header("FUNDING"), Some(ListName::Sources));
    }

    #[test]
    fn test_classify_unknown_header() {
        assert_eq!(classify_header("備註"), None);
        assert_eq!(classify_header(""), None);
    }

    #[test]
    fn test_parse_workbook_without_sheets_is_empty() {
        let result = ReferenceListParser.parse(&Workbook::default());
        assert_eq!(result, Err(FormatError::EmptySheet));
    }
}
