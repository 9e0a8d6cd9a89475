mod count;
mod fallback;

pub use count::count_request;
pub use fallback::handler_404;
