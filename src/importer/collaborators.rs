// ==========================================
// NGO 補助核銷系統 - 解析器协作者
// ==========================================
// ID 生成器 / 时钟：以 trait 注入，测试时替换为固定实现
// ==========================================

use chrono::Local;
use uuid::Uuid;

/// 批次时间戳格式
pub const SUBMIT_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// 月份格式
pub const MONTH_FORMAT: &str = "%Y-%m";

// ==========================================
// IdGenerator Trait
// ==========================================
pub trait IdGenerator: Send + Sync {
    /// 生成一个不透明的唯一 ID
    fn next_id(&self) -> String;
}

// ==========================================
// Clock Trait
// ==========================================
pub trait Clock: Send + Sync {
    /// 批次时间戳（每个批次只取一次）
    fn timestamp(&self) -> String;

    /// 当前月份（YYYY-MM）
    fn current_month(&self) -> String;
}

/// UUID v4 生成器（simple 格式，无连字符）
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// 本地时区时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn timestamp(&self) -> String {
        Local::now().format(SUBMIT_TIME_FORMAT).to_string()
    }

    fn current_month(&self) -> String {
        Local::now().format(MONTH_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_uuid_ids_are_distinct() {
        let generator = UuidIdGenerator;
        let ids: HashSet<String> = (0..100).map(|_| generator.next_id()).collect();
        assert_eq!(ids.len(), 100);
        assert!(ids.iter().all(|id| id.len() == 32));
    }

    #[test]
    fn test_local_clock_month_shape() {
        let month = LocalClock.current_month();
        assert_eq!(month.len(), 7);
        assert_eq!(&month[4..5], "-");
    }
}
