mod handlers;
mod router;
mod state;

pub use router::app_router;
pub use state::AppState;

#[cfg(test)]
mod tests;
