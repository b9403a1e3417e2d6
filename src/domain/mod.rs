// ==========================================
// NGO 補助核銷系統 - 领域层
// ==========================================

pub mod options;
pub mod record;

pub use options::{ListName, NgoOptions, ReferenceLists};
pub use record::{ImportContext, ManualEntry, SubsidyRecord};
