//! 时间来源抽象：请求时间戳统一由注入的 Clock 提供，测试可替换为手动时钟。

use crate::window::Timestamp;
use std::sync::atomic::{AtomicI64, Ordering};

/// 秒级 Unix 时间来源。
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// 系统墙上时钟。
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        chrono::Utc::now().timestamp()
    }
}

/// 手动推进的时钟，用于确定性测试。
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: AtomicI64::new(start),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.store(now, Ordering::SeqCst);
    }

    /// 前进（或回退，传负数）指定秒数
    pub fn advance(&self, secs: i64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.load(Ordering::SeqCst)
    }
}
