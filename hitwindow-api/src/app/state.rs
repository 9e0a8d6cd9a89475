use hitwindow_core::RequestCounter;
use std::sync::Arc;

/// Shared application state for handlers.
#[derive(Clone)]
pub struct AppState {
    /// 窗口计数器（持有窗口锁与快照队列）
    pub counter: Arc<RequestCounter>,
}
