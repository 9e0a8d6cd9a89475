use crate::error::{CounterError, Result};
use crate::window::Timestamp;
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument, warn};

/// 启动时读取持久化日志（不存在则创建），按文件顺序返回时间戳。
///
/// 无法解析的行跳过并记录告警；文件本身打不开或读失败则返回错误。
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn load_timestamps(path: &Path) -> Result<Vec<Timestamp>> {
    let bootstrap_err = |source: std::io::Error| CounterError::Bootstrap {
        path: path.to_path_buf(),
        source,
    };

    // 只读打开；文件不存在时才创建，已存在但不可写的日志照常加载
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            create_empty(path).await.map_err(bootstrap_err)?;
            info!("timestamp log not found, created empty log");
            return Ok(Vec::new());
        }
        Err(e) => return Err(bootstrap_err(e)),
    };

    // 按字节切行，非 UTF-8 内容按格式错误处理而不是读失败
    let mut segments = BufReader::new(file).split(b'\n');
    let mut timestamps = Vec::new();
    let mut skipped = 0usize;
    let mut line_no = 0usize;
    while let Some(segment) = segments.next_segment().await.map_err(bootstrap_err)? {
        line_no += 1;
        let line = String::from_utf8_lossy(&segment);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            debug!(line = line_no, "skipping blank line");
            continue;
        }
        match trimmed.parse::<Timestamp>() {
            Ok(value) => timestamps.push(value),
            Err(e) => {
                skipped += 1;
                warn!(line = line_no, content = %trimmed, error = %e, "could not parse timestamp, skipping");
            }
        }
    }

    info!(loaded = timestamps.len(), skipped, "timestamp log loaded");
    Ok(timestamps)
}

async fn create_empty(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .await?;
    Ok(())
}
