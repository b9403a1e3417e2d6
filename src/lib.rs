// ==========================================
// NGO 補助核銷系統 - 核心库
// ==========================================
// 功能: 撥款名冊导入 / 单笔补登 / 记录查询 / 清单维护 / 财务摘要
// 技术栈: Rust + SQLite + calamine
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 工作簿模型与解码
pub mod workbook;

// 导入层 - 解析器与导入服务
pub mod importer;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 系统设定
pub mod config;

// 报表层 - 统计/提示词/同步载荷
pub mod report;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

pub use domain::{ImportContext, ListName, ManualEntry, NgoOptions, ReferenceLists, SubsidyRecord};
pub use importer::{
    DisbursementParser, FormatError, ImportError, ImportResult, ReferenceListParser,
    SubsidyImporter, SubsidyImporterImpl,
};
pub use workbook::{decode_workbook, CellValue, Sheet, Workbook, WorkbookFormat};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "NGO 補助核銷系統";
