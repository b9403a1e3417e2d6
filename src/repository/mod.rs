// ==========================================
// NGO 補助核銷系統 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// 约束: 所有查询使用参数化
// ==========================================

pub mod error;
pub mod subsidy_record_repo;

pub use error::{RepositoryError, RepositoryResult};
pub use subsidy_record_repo::SubsidyRecordRepository;
