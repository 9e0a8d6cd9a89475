use axum::extract::State;

use crate::app::AppState;

/// 计数并返回最近窗口内的请求数（纯文本，无换行），总是 200
pub async fn count_request(State(state): State<AppState>) -> String {
    state.counter.handle().await.to_string()
}
