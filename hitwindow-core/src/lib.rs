//! Core library for the sliding-window request counter: clock, window store, bootstrap loading,
//! and the background snapshot writer.

mod bootstrap;
mod clock;
mod counter;
mod error;
mod persist;
mod store;
mod window;

pub use bootstrap::load_timestamps;
pub use clock::{Clock, ManualClock, SystemClock};
pub use counter::RequestCounter;
pub use error::{CounterError, Result};
pub use persist::{spawn_writer, DEFAULT_QUEUE_CAPACITY};
pub use store::WindowStore;
pub use window::{Snapshot, Timestamp, Window, DEFAULT_WINDOW_SECS};
