//! 后台快照写入：单个任务按顺序消费有界队列中的快照，整文件覆盖写入持久化日志。

use crate::error::Result;
use crate::window::Snapshot;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 快照队列默认容量；队列满时请求方等待（背压）。
pub const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

pub(crate) type SnapshotSender = mpsc::Sender<Snapshot>;

/// 启动唯一的写入任务，返回队列发送端与任务句柄。
///
/// 所有发送端被丢弃后任务会把剩余快照写完再退出。
pub fn spawn_writer(
    path: impl Into<PathBuf>,
    capacity: usize,
) -> (mpsc::Sender<Snapshot>, JoinHandle<()>) {
    let path = path.into();
    let (tx, mut rx) = mpsc::channel::<Snapshot>(capacity.max(1));
    let handle = tokio::spawn(async move {
        info!(path = %path.display(), capacity, "snapshot writer started");
        while let Some(snapshot) = rx.recv().await {
            // 写盘失败不重试也不上报，内存窗口仍是权威数据
            if let Err(e) = write_snapshot(&path, &snapshot).await {
                warn!(path = %path.display(), error = %e, "failed to persist snapshot");
            }
        }
        debug!(path = %path.display(), "snapshot writer stopped");
    });
    (tx, handle)
}

/// 覆盖写入一个快照：先写同目录临时文件，再 rename 替换。
async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let tmp = tmp_path(path);
    if let Err(e) = tokio::fs::write(&tmp, encode(snapshot)).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

/// 每行一个十进制时间戳
fn encode(snapshot: &Snapshot) -> String {
    let mut out = String::with_capacity(snapshot.len() * 11);
    for t in snapshot.timestamps() {
        out.push_str(&t.to_string());
        out.push('\n');
    }
    out
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
