// ==========================================
// NGO 補助核銷系統 - 撥款名冊解析器
// ==========================================
// 职责: 宽表（每个经费来源一列）→ 扁平补助记录
// 版式: 第 0-1 行为标题装饰，第 2 行为表头，第 3 行起为数据
// 规则:
//   - 姓名列向下延续，直到出现下一个姓名
//   - 经费来源列 = [项目列 + 2, 小计列 或 表头末尾)
//   - 合计行、空项目行不产生记录
//   - 金额 <= 0 或无法解析的单元格静默略过
// ==========================================

use crate::domain::record::{ImportContext, SubsidyRecord, REMARK_BATCH_IMPORT};
use crate::importer::collaborators::{Clock, IdGenerator, LocalClock, UuidIdGenerator};
use crate::importer::error::FormatError;
use crate::workbook::{Sheet, Workbook};
use std::sync::Arc;
use tracing::{debug, info};

/// 汇总表名称关键字（区分大小写）
pub const SUMMARY_SHEET_MARKERS: [&str; 3] = ["Summary", "總表", "彙總"];

/// 表头所在行
pub const HEADER_ROW_INDEX: usize = 2;

/// 第一条数据行
pub const FIRST_DATA_ROW_INDEX: usize = HEADER_ROW_INDEX + 1;

/// 经费来源列相对项目列的偏移：中间隔一列（项目小计）
pub const FUNDING_COLUMN_OFFSET: usize = 2;

// 表头词汇：中文优先，英文备用
const NAME_HEADERS: [&str; 2] = ["姓名", "Name"];
const ITEM_HEADERS: [&str; 2] = ["項目", "Item"];
const SUBTOTAL_HEADERS: [&str; 2] = ["小計", "Subtotal"];

/// 合计行标记（项目单元格包含即略过）
const TOTAL_ROW_MARKERS: [&str; 3] = ["Total", "合計", "總計"];

/// 未命名列占位符（pandas 导出的 "Unnamed: 5" 之类）
const UNNAMED_HEADER_MARKER: &str = "Unnamed";
const NAN_HEADER: &str = "NaN";

// ==========================================
// SheetLayout - 表头解析结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingColumn {
    /// 工作表中的列位置
    pub index: usize,
    /// 表头文字，即记录的 source
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetLayout {
    pub name_col: usize,
    pub item_col: usize,
    pub subtotal_col: Option<usize>,
    pub funding_columns: Vec<FundingColumn>,
}

impl SheetLayout {
    /// 从表头行解析版式
    ///
    /// # 返回
    /// - Err(FormatError::MissingRequiredColumn): 缺少姓名或项目列
    pub fn resolve(headers: &[String]) -> Result<Self, FormatError> {
        let name_col = find_column(headers, &NAME_HEADERS);
        let item_col = find_column(headers, &ITEM_HEADERS);
        let (name_col, item_col) = match (name_col, item_col) {
            (Some(n), Some(i)) => (n, i),
            _ => return Err(FormatError::MissingRequiredColumn),
        };
        let subtotal_col = find_column(headers, &SUBTOTAL_HEADERS);

        let start = item_col + FUNDING_COLUMN_OFFSET;
        let end = subtotal_col.unwrap_or(headers.len()).min(headers.len());

        let funding_columns = (start..end)
            .filter(|&idx| is_funding_header(&headers[idx]))
            .map(|idx| FundingColumn {
                index: idx,
                label: headers[idx].clone(),
            })
            .collect();

        Ok(Self {
            name_col,
            item_col,
            subtotal_col,
            funding_columns,
        })
    }

    pub fn funding_labels(&self) -> Vec<&str> {
        self.funding_columns.iter().map(|c| c.label.as_str()).collect()
    }
}

/// 精确匹配，按 labels 顺序逐个查找
fn find_column(headers: &[String], labels: &[&str]) -> Option<usize> {
    labels
        .iter()
        .find_map(|label| headers.iter().position(|h| h == label))
}

fn is_funding_header(header: &str) -> bool {
    !header.is_empty() && !header.contains(UNNAMED_HEADER_MARKER) && header != NAN_HEADER
}

fn is_total_row(item: &str) -> bool {
    TOTAL_ROW_MARKERS.iter().any(|m| item.contains(m))
}

/// 选择要解析的工作表
///
/// 第一个名称包含汇总关键字的工作表；都不包含则取第一个工作表
pub fn select_sheet(workbook: &Workbook) -> Option<&Sheet> {
    workbook
        .sheets
        .iter()
        .find(|s| SUMMARY_SHEET_MARKERS.iter().any(|m| s.name.contains(m)))
        .or_else(|| workbook.first_sheet())
}

// ==========================================
// DisbursementParser - 撥款名冊解析器
// ==========================================
pub struct DisbursementParser {
    id_generator: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl Default for DisbursementParser {
    fn default() -> Self {
        Self::new(Arc::new(UuidIdGenerator), Arc::new(LocalClock))
    }
}

impl DisbursementParser {
    pub fn new(id_generator: Arc<dyn IdGenerator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            id_generator,
            clock,
        }
    }

    /// 解析撥款名冊
    ///
    /// # 参数
    /// - workbook: 已解码的工作簿
    /// - context: 区域 / 社工 / 月份，原样写入每条记录
    ///
    /// # 返回
    /// - Ok(Vec<SubsidyRecord>): 按行、再按经费来源列的顺序
    /// - Err(FormatError::TooShort): 工作表少于 3 行
    /// - Err(FormatError::MissingRequiredColumn): 缺少姓名或项目列
    ///
    /// 行级异常不会报错，只会让该行不产生记录
    pub fn parse(
        &self,
        workbook: &Workbook,
        context: &ImportContext,
    ) -> Result<Vec<SubsidyRecord>, FormatError> {
        let sheet = select_sheet(workbook).ok_or(FormatError::TooShort)?;
        if sheet.row_count() < FIRST_DATA_ROW_INDEX {
            return Err(FormatError::TooShort);
        }

        let headers = sheet.row_texts(HEADER_ROW_INDEX);
        let layout = SheetLayout::resolve(&headers)?;
        debug!(
            sheet = %sheet.name,
            name_col = layout.name_col,
            item_col = layout.item_col,
            subtotal_col = ?layout.subtotal_col,
            sources = ?layout.funding_labels(),
            "表头解析完成"
        );

        let submit_time = self.clock.timestamp();
        let mut records = Vec::new();
        let mut current_name = String::new();
        let mut skipped_rows = 0usize;
        let mut dropped_cells = 0usize;

        for row in FIRST_DATA_ROW_INDEX..sheet.row_count() {
            let name = sheet.cell(row, layout.name_col).as_text();
            if !name.is_empty() {
                current_name = name;
            }

            let item = sheet.cell(row, layout.item_col).as_text();
            if item.is_empty() || is_total_row(&item) {
                skipped_rows += 1;
                continue;
            }

            for column in &layout.funding_columns {
                let amount = sheet.cell(row, column.index).as_number();
                if amount <= 0.0 {
                    dropped_cells += 1;
                    continue;
                }

                records.push(SubsidyRecord {
                    id: self.id_generator.next_id(),
                    submit_time: submit_time.clone(),
                    region: context.region.clone(),
                    worker: context.worker.clone(),
                    client_name: current_name.clone(),
                    month: context.month.clone(),
                    item: item.clone(),
                    amount,
                    source: column.label.clone(),
                    remarks: REMARK_BATCH_IMPORT.to_string(),
                });
            }
        }

        info!(
            sheet = %sheet.name,
            records = records.len(),
            skipped_rows,
            dropped_cells,
            "撥款名冊解析完成"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workbook::CellValue;

    fn headers(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_layout_funding_range_ends_at_subtotal() {
        let h = headers(&["序號", "姓名", "項目", "項目小計", "勸募", "扶輪社", "小計", "備註"]);
        let layout = SheetLayout::resolve(&h).unwrap();

        assert_eq!(layout.name_col, 1);
        assert_eq!(layout.item_col, 2);
        assert_eq!(layout.subtotal_col, Some(6));
        assert_eq!(layout.funding_labels(), vec!["勸募", "扶輪社"]);
        assert_eq!(layout.funding_columns[1].index, 5);
    }

    #[test]
    fn test_layout_without_subtotal_runs_to_end() {
        let h = headers(&["Name", "Item", "Sum", "A", "B"]);
        let layout = SheetLayout::resolve(&h).unwrap();
        assert_eq!(layout.subtotal_col, None);
        assert_eq!(layout.funding_labels(), vec!["A", "B"]);
    }

    #[test]
    fn test_layout_skips_placeholder_headers_but_keeps_positions() {
        let h = headers(&["姓名", "項目", "", "勸募", "", "Unnamed: 5", "NaN", "聚陽"]);
        let layout = SheetLayout::resolve(&h).unwrap();

        assert_eq!(layout.funding_labels(), vec!["勸募", "聚陽"]);
        let positions: Vec<usize> = layout.funding_columns.iter().map(|c| c.index).collect();
        assert_eq!(positions, vec![3, 7]);
    }

    #[test]
    fn test_layout_chinese_label_wins_over_english() {
        let h = headers(&["Name", "Item", "x", "姓名", "項目", "y", "A"]);
        let layout = SheetLayout::resolve(&h).unwrap();
        assert_eq!(layout.name_col, 3);
        assert_eq!(layout.item_col, 4);
        assert_eq!(layout.funding_labels(), vec!["A"]);
    }

    #[test]
    fn test_layout_subtotal_before_funding_start_gives_no_sources() {
        let h = headers(&["小計", "姓名", "項目", "x", "A"]);
        let layout = SheetLayout::resolve(&h).unwrap();
        assert!(layout.funding_columns.is_empty());
    }

    #[test]
    fn test_layout_missing_item_column() {
        let h = headers(&["姓名", "金額"]);
        assert_eq!(
            SheetLayout::resolve(&h),
            Err(FormatError::MissingRequiredColumn)
        );
    }

    #[test]
    fn test_total_row_markers() {
        assert!(is_total_row("合計"));
        assert!(is_total_row("總計"));
        assert!(is_total_row("Grand Total"));
        assert!(!is_total_row("total"));
        assert!(!is_total_row("個案房租費"));
    }

    #[test]
    fn test_select_sheet_prefers_summary_marker() {
        let workbook = Workbook::new(vec![
            Sheet::new("明細", vec![]),
            Sheet::new("1月彙總", vec![]),
            Sheet::new("Summary", vec![]),
        ]);
        assert_eq!(select_sheet(&workbook).map(|s| s.name.as_str()), Some("1月彙總"));
    }

    #[test]
    fn test_select_sheet_marker_is_case_sensitive() {
        let workbook = Workbook::new(vec![
            Sheet::new("first", vec![]),
            Sheet::new("summary", vec![]),
        ]);
        assert_eq!(select_sheet(&workbook).map(|s| s.name.as_str()), Some("first"));
    }

    #[test]
    fn test_parse_empty_workbook_is_too_short() {
        let parser = DisbursementParser::default();
        let result = parser.parse(&Workbook::default(), &ImportContext::default());
        assert_eq!(result, Err(FormatError::TooShort));
    }

    #[test]
    fn test_parse_uses_default_collaborators() {
        let rows = vec![
            vec![CellValue::from("標題")],
            vec![],
            vec!["姓名".into(), "項目".into(), "金額".into(), "勸募".into()],
            vec!["王小美".into(), "房租".into(), 500i64.into(), 500i64.into()],
        ];
        let workbook = Workbook::new(vec![Sheet::new("總表", rows)]);
        let parser = DisbursementParser::default();
        let records = parser
            .parse(&workbook, &ImportContext::new("台北中心", "呂予瑄", "2025-01"))
            .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source, "勸募");
        assert_eq!(records[0].amount, 500.0);
        assert_eq!(records[0].id.len(), 32);
    }
}
