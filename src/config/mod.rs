// ==========================================
// NGO 補助核銷系統 - 配置层
// ==========================================
// 职责: 系统设定（下拉清单、同步端点）
// 存储: settings_kv 表
// ==========================================

pub mod settings_manager;

pub use settings_manager::{setting_keys, SettingsManager};
