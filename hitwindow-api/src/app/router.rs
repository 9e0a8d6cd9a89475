use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use super::handlers::{count_request, handler_404};
use super::state::AppState;

/// Build the router with routes and middleware wired.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(count_request))
        .fallback(handler_404)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
