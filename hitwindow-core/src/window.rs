use std::collections::VecDeque;
use tracing::warn;

/// 秒级 Unix 时间戳。
pub type Timestamp = i64;

/// 默认窗口长度（秒）。
pub const DEFAULT_WINDOW_SECS: i64 = 60;

/// 有序（非递减）的请求时间戳序列，按窗口长度淘汰过期项。
///
/// 过期项总是一段连续前缀，所以淘汰只需二分查找分界点再整体丢弃，
/// 前提是序列保持有序：时钟回拨时按有序位置插入而不是追加。
#[derive(Debug, Clone)]
pub struct Window {
    entries: VecDeque<Timestamp>,
    span: i64,
}

impl Window {
    pub fn new(span_secs: i64) -> Self {
        Self {
            entries: VecDeque::new(),
            span: span_secs,
        }
    }

    /// 用启动时加载的时间戳构建窗口；不在此处淘汰过期项，留到下一次 record。
    pub fn from_loaded(mut entries: Vec<Timestamp>, span_secs: i64) -> Self {
        if !entries.windows(2).all(|w| w[0] <= w[1]) {
            warn!(
                count = entries.len(),
                "loaded timestamps are out of order, sorting"
            );
            entries.sort_unstable();
        }
        Self {
            entries: entries.into(),
            span: span_secs,
        }
    }

    /// 记录一次到达并淘汰过期项，返回窗口内（含本次）的数量。
    pub fn record(&mut self, now: Timestamp) -> usize {
        self.insert(now);
        self.evict(now);
        self.entries.len()
    }

    fn insert(&mut self, now: Timestamp) {
        match self.entries.back() {
            Some(&last) if now < last => {
                warn!(now, last, "clock went backwards, inserting in order");
                let idx = self.entries.partition_point(|&t| t <= now);
                self.entries.insert(idx, now);
            }
            _ => self.entries.push_back(now),
        }
    }

    /// 丢弃所有早于 `now - span` 的时间戳，返回丢弃数量。
    pub fn evict(&mut self, now: Timestamp) -> usize {
        let cutoff = now - self.span;
        let idx = self.entries.partition_point(|&t| t < cutoff);
        self.entries.drain(..idx);
        idx
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn span_secs(&self) -> i64 {
        self.span
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            timestamps: self.entries.iter().copied().collect(),
        }
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_SECS)
    }
}

/// 窗口内容的不可变拷贝，交给后台写入任务落盘。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    timestamps: Vec<Timestamp>,
}

impl Snapshot {
    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

impl From<Vec<Timestamp>> for Snapshot {
    fn from(timestamps: Vec<Timestamp>) -> Self {
        Self { timestamps }
    }
}
