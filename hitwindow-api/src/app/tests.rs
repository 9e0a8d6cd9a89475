use super::{app_router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use hitwindow_core::{
    spawn_writer, ManualClock, RequestCounter, Timestamp, Window, WindowStore,
    DEFAULT_WINDOW_SECS,
};
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;

const T: Timestamp = 1_725_062_400;

fn app_with(clock: Arc<ManualClock>, window: Window) -> Router {
    let (tx, mut rx) = mpsc::channel(64);
    // 丢弃快照，避免队列写满
    tokio::spawn(async move { while rx.recv().await.is_some() {} });
    let state = AppState {
        counter: Arc::new(RequestCounter::new(clock, WindowStore::new(window, tx))),
    };
    app_router(state)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn sequential_requests_count_up() {
    let clock = Arc::new(ManualClock::new(T));
    let app = app_with(clock.clone(), Window::default());

    assert_eq!(get(&app, "/").await, (StatusCode::OK, "1".to_string()));
    clock.advance(1);
    assert_eq!(get(&app, "/").await, (StatusCode::OK, "2".to_string()));
    clock.advance(1);
    assert_eq!(get(&app, "/").await, (StatusCode::OK, "3".to_string()));
}

#[tokio::test]
async fn earlier_requests_expire_after_a_minute() {
    let clock = Arc::new(ManualClock::new(T));
    let app = app_with(clock.clone(), Window::default());

    assert_eq!(get(&app, "/").await.1, "1");
    assert_eq!(get(&app, "/").await.1, "2");
    clock.advance(65);
    assert_eq!(get(&app, "/").await.1, "1");
}

#[tokio::test]
async fn preloaded_window_evicts_old_entries() {
    let clock = Arc::new(ManualClock::new(T));
    let window = Window::from_loaded(vec![T - 90, T - 62, T - 30, T - 10], DEFAULT_WINDOW_SECS);
    let app = app_with(clock, window);

    assert_eq!(get(&app, "/").await, (StatusCode::OK, "3".to_string()));
}

#[tokio::test]
async fn response_is_plain_text() {
    let app = app_with(Arc::new(ManualClock::new(T)), Window::default());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().starts_with("text/plain"));
}

#[tokio::test]
async fn unknown_path_is_not_counted() {
    let clock = Arc::new(ManualClock::new(T));
    let app = app_with(clock, Window::default());

    let (status, _) = get(&app, "/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(get(&app, "/").await.1, "1");
}

#[tokio::test]
async fn requests_are_persisted_to_log() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("request_timestamps.log");
    let clock = Arc::new(ManualClock::new(T));
    let (tx, writer) = spawn_writer(path.clone(), 16);
    let state = AppState {
        counter: Arc::new(RequestCounter::new(
            clock.clone(),
            WindowStore::new(Window::default(), tx),
        )),
    };
    let app = app_router(state);

    get(&app, "/").await;
    clock.advance(70);
    get(&app, "/").await;
    drop(app);
    writer.await.unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, format!("{}\n", T + 70));
}
