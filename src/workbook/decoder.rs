// ==========================================
// NGO 補助核銷系統 - 工作簿解码器
// ==========================================
// 职责: 原始字节 + 格式提示 → Workbook
// 支持: Excel (.xlsx/.xlsm/.xls/.xlsb) / OpenDocument (.ods) / CSV (.csv)
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::workbook::{CellValue, Sheet, Workbook};
use calamine::{open_workbook_auto_from_rs, Data, Ods, Range, Reader, Sheets, Xls, Xlsb, Xlsx};
use csv::ReaderBuilder;
use std::fmt;
use std::io::{Cursor, Read, Seek};
use tracing::debug;

/// CSV 解码后的工作表名
pub const CSV_SHEET_NAME: &str = "Sheet1";

// ==========================================
// WorkbookFormat - 格式提示
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    Xlsx,
    Xls,
    Xlsb,
    Ods,
    Csv,
    /// 由 calamine 根据内容自动识别
    Auto,
}

impl WorkbookFormat {
    /// 根据文件扩展名推断格式（不区分大小写），未知扩展名返回 None
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "xlsx" | "xlsm" => Some(WorkbookFormat::Xlsx),
            "xls" => Some(WorkbookFormat::Xls),
            "xlsb" => Some(WorkbookFormat::Xlsb),
            "ods" => Some(WorkbookFormat::Ods),
            "csv" => Some(WorkbookFormat::Csv),
            _ => None,
        }
    }
}

impl fmt::Display for WorkbookFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkbookFormat::Xlsx => write!(f, "xlsx"),
            WorkbookFormat::Xls => write!(f, "xls"),
            WorkbookFormat::Xlsb => write!(f, "xlsb"),
            WorkbookFormat::Ods => write!(f, "ods"),
            WorkbookFormat::Csv => write!(f, "csv"),
            WorkbookFormat::Auto => write!(f, "auto"),
        }
    }
}

/// 解码工作簿
///
/// # 参数
/// - bytes: 上传文件的原始内容
/// - format: 格式提示
///
/// # 返回
/// - Ok(Workbook): 至少包含一个工作表
/// - Err(ImportError::Decode): 不是可识别的表格容器
/// - Err(ImportError::NoSheets): 容器中没有工作表
pub fn decode_workbook(bytes: &[u8], format: WorkbookFormat) -> ImportResult<Workbook> {
    let workbook = match format {
        WorkbookFormat::Csv => decode_csv(bytes)?,
        _ => {
            let cursor = Cursor::new(bytes.to_vec());
            let sheets = open_sheets(cursor, format)?;
            read_sheets(sheets)?
        }
    };

    if workbook.sheets.is_empty() {
        return Err(ImportError::NoSheets);
    }

    debug!(
        format = %format,
        sheets = ?workbook.sheet_names(),
        "工作簿解码完成"
    );
    Ok(workbook)
}

fn open_sheets(cursor: Cursor<Vec<u8>>, format: WorkbookFormat) -> ImportResult<Sheets<Cursor<Vec<u8>>>> {
    let sheets = match format {
        WorkbookFormat::Xlsx => Sheets::Xlsx(Xlsx::new(cursor).map_err(calamine::Error::from)?),
        WorkbookFormat::Xls => Sheets::Xls(Xls::new(cursor).map_err(calamine::Error::from)?),
        WorkbookFormat::Xlsb => Sheets::Xlsb(Xlsb::new(cursor).map_err(calamine::Error::from)?),
        WorkbookFormat::Ods => Sheets::Ods(Ods::new(cursor).map_err(calamine::Error::from)?),
        WorkbookFormat::Auto | WorkbookFormat::Csv => open_workbook_auto_from_rs(cursor)?,
    };
    Ok(sheets)
}

fn read_sheets<RS: Read + Seek>(mut sheets: Sheets<RS>) -> ImportResult<Workbook> {
    let mut result = Vec::new();
    for name in sheets.sheet_names() {
        let range = sheets.worksheet_range(&name)?;
        result.push(Sheet::new(name, range_to_rows(&range)));
    }
    Ok(Workbook::new(result))
}

/// calamine 的 Range 从第一个非空单元格开始；
/// 这里补齐前导空行/空列，使 (row, col) 保持为工作表绝对坐标
fn range_to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let (start_row, start_col) = match range.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return Vec::new(),
    };

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row];
    for data_row in range.rows() {
        let mut row = vec![CellValue::Empty; start_col];
        row.extend(data_row.iter().map(convert_cell));
        rows.push(row);
    }
    rows
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        // 日期保留序列值
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

fn decode_csv(bytes: &[u8]) -> ImportResult<Workbook> {
    // 去掉 UTF-8 BOM（Excel 另存 CSV 时常见）
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // 允许行长度不一致
        .from_reader(bytes);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(csv_cell).collect());
    }

    Ok(Workbook::new(vec![Sheet::new(CSV_SHEET_NAME, rows)]))
}

fn csv_cell(raw: &str) -> CellValue {
    if raw.is_empty() {
        return CellValue::Empty;
    }
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => CellValue::Number(v),
        _ => CellValue::Text(raw.to_string()),
    }
}
