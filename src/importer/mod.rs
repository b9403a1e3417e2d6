// ==========================================
// NGO 補助核銷系統 - 导入层
// ==========================================
// 职责: 试算表 → 补助记录 / 参考清单
// 支持: Excel, OpenDocument, CSV
// ==========================================

pub mod collaborators;
pub mod disbursement_parser;
pub mod error;
pub mod reference_list_parser;
pub mod subsidy_importer;

// 重导出核心类型
pub use collaborators::{Clock, IdGenerator, LocalClock, UuidIdGenerator};
pub use disbursement_parser::{select_sheet, DisbursementParser, FundingColumn, SheetLayout};
pub use error::{FormatError, ImportError, ImportResult};
pub use reference_list_parser::{classify_header, ReferenceListParser};
pub use subsidy_importer::{ImportOutcome, SubsidyImporter, SubsidyImporterImpl};
