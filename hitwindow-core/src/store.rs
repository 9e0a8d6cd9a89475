use crate::persist::SnapshotSender;
use crate::window::{Timestamp, Window};
use tokio::sync::Mutex;
use tracing::warn;

/// 带互斥锁的窗口存储：追加、淘汰、快照入队在同一把锁内完成。
///
/// 快照在持锁状态下入队，写入任务收到的顺序与修改顺序一致；
/// 队列满时在此等待，形成对请求方的背压。
#[derive(Debug)]
pub struct WindowStore {
    window: Mutex<Window>,
    snapshots: SnapshotSender,
}

impl WindowStore {
    pub fn new(window: Window, snapshots: SnapshotSender) -> Self {
        Self {
            window: Mutex::new(window),
            snapshots,
        }
    }

    /// 记录一次到达，返回窗口内数量（含本次）。`now` 需由调用方在加锁前取得。
    pub async fn record(&self, now: Timestamp) -> usize {
        let mut window = self.window.lock().await;
        let count = window.record(now);
        let snapshot = window.snapshot();
        if self.snapshots.send(snapshot).await.is_err() {
            warn!(count, "snapshot writer is gone, dropping snapshot");
        }
        count
    }

    /// 当前窗口内容（不淘汰，仅供测试检查）
    #[cfg(test)]
    pub(crate) async fn snapshot(&self) -> crate::window::Snapshot {
        self.window.lock().await.snapshot()
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.window.lock().await.len()
    }
}
