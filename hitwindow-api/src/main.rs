mod app;

use anyhow::Context;
use app::{app_router, AppState};
use clap::Parser;
use dotenvy::dotenv;
use hitwindow_core::{
    load_timestamps, spawn_writer, RequestCounter, SystemClock, Window, WindowStore,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 关停后等待写入任务清空队列的最长时间
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Sliding-window request counter server.
#[derive(Debug, Clone, Parser)]
#[command(name = "hitwindow", author, version, about = "Sliding-window request counter")]
struct ServerConfig {
    /// Listen address
    #[arg(long, env = "HW_BIND", default_value = "0.0.0.0:80")]
    bind: SocketAddr,

    /// 持久化时间戳日志路径
    #[arg(long, env = "HW_LOG_PATH", default_value = "request_timestamps.log")]
    log_path: PathBuf,

    /// 快照队列容量（满时请求等待）
    #[arg(
        long,
        env = "HW_QUEUE_CAPACITY",
        default_value_t = hitwindow_core::DEFAULT_QUEUE_CAPACITY as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    queue_capacity: u64,

    /// Window length in seconds
    #[arg(
        long,
        env = "HW_WINDOW_SECS",
        default_value_t = hitwindow_core::DEFAULT_WINDOW_SECS,
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    window_secs: i64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 优先读取 .env（若存在）
    let _ = dotenv();
    init_tracing();

    let config = ServerConfig::parse();
    info!(
        bind = %config.bind,
        log_path = %config.log_path.display(),
        "starting request counter"
    );

    // 日志读失败时窗口状态未知，拒绝启动
    let loaded = load_timestamps(&config.log_path)
        .await
        .context("cannot start with unknown window state")?;
    let window = Window::from_loaded(loaded, config.window_secs);
    info!(
        count = window.len(),
        window_secs = window.span_secs(),
        "bootstrapped window from log"
    );

    let (snapshots, writer) =
        spawn_writer(config.log_path.clone(), config.queue_capacity as usize);
    let store = WindowStore::new(window, snapshots);
    let state = AppState {
        counter: Arc::new(RequestCounter::new(Arc::new(SystemClock), store)),
    };

    let app = app_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 状态随 router 一起释放后，写入任务会把剩余快照写完退出
    match tokio::time::timeout(WRITER_DRAIN_TIMEOUT, writer).await {
        Ok(Ok(())) => info!("snapshot queue drained"),
        Ok(Err(e)) => warn!(error = %e, "snapshot writer terminated abnormally"),
        Err(_) => warn!("timed out waiting for snapshot writer"),
    }

    Ok(())
}

fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
}
