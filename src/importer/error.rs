// ==========================================
// NGO 補助核銷系統 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 工作表结构错误
///
/// 解析器对外唯一的失败类型；消息原样展示给使用者
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    #[error("檔案格式不符合規範（工作表少於 3 列）")]
    TooShort,

    #[error("找不到必要欄位「姓名」或「項目」")]
    MissingRequiredColumn,

    #[error("工作表沒有任何資料")]
    EmptySheet,
}

impl FormatError {
    /// 稳定的原因代码（供日志与前端判断）
    pub fn reason(&self) -> &'static str {
        match self {
            FormatError::TooShort => "too_short",
            FormatError::MissingRequiredColumn => "missing_required_column",
            FormatError::EmptySheet => "empty",
        }
    }
}

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 结构错误 =====
    #[error("{0}")]
    Format(#[from] FormatError),

    // ===== 文件相关错误 =====
    #[error("檔案不存在: {0}")]
    FileNotFound(String),

    #[error("不支援的檔案格式: {0}（僅支援 .xlsx/.xls/.xlsb/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("檔案讀取失敗: {0}")]
    FileReadError(String),

    #[error("無法辨識的試算表檔案: {0}")]
    Decode(String),

    #[error("試算表中沒有任何工作表")]
    NoSheets,

    // ===== 单笔补登 =====
    #[error("請輸入有效的金額（收到 {0}）")]
    InvalidAmount(f64),

    // ===== 持久化 =====
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    // ===== 通用错误 =====
    #[error("內部錯誤: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(err.to_string()),
            _ => ImportError::FileReadError(err.to_string()),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::Decode(err.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Decode(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ImportError {
    fn from(err: tokio::task::JoinError) -> Self {
        ImportError::InternalError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_reason_codes() {
        assert_eq!(FormatError::TooShort.reason(), "too_short");
        assert_eq!(FormatError::MissingRequiredColumn.reason(), "missing_required_column");
        assert_eq!(FormatError::EmptySheet.reason(), "empty");
    }

    #[test]
    fn test_format_error_message_passes_through() {
        let err: ImportError = FormatError::MissingRequiredColumn.into();
        assert_eq!(err.to_string(), FormatError::MissingRequiredColumn.to_string());
    }

    #[test]
    fn test_io_not_found_maps_to_file_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.xlsx");
        assert!(matches!(ImportError::from(io), ImportError::FileNotFound(_)));
    }
}
