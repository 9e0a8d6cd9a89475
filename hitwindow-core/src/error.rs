use std::path::PathBuf;
use thiserror::Error;

/// Common result type for core operations.
pub type Result<T> = std::result::Result<T, CounterError>;

#[derive(Debug, Error)]
pub enum CounterError {
    /// 启动时无法读取持久化日志，窗口状态未知，不能继续启动
    #[error("failed to load timestamp log {}: {source}", path.display())]
    Bootstrap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
