use crate::clock::Clock;
use crate::store::WindowStore;
use std::sync::Arc;
use tracing::debug;

/// 每个请求的入口：先取到达时间，再进入窗口存储计数。
pub struct RequestCounter {
    clock: Arc<dyn Clock>,
    store: WindowStore,
}

impl RequestCounter {
    pub fn new(clock: Arc<dyn Clock>, store: WindowStore) -> Self {
        Self { clock, store }
    }

    /// 返回最近窗口内的请求数（含本次），不会失败。
    pub async fn handle(&self) -> usize {
        // 在加锁前取时间，避免等锁时间计入到达时刻
        let arrival = self.clock.now();
        let count = self.store.record(arrival).await;
        debug!(arrival, count, "request counted");
        count
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &WindowStore {
        &self.store
    }
}

impl std::fmt::Debug for RequestCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCounter")
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
