//! Per-series forecasting state.

mod buffer;
mod store;

pub use buffer::RollingBuffer;
pub use store::{SeriesStateStore, StoreSnapshot};
