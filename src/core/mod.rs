//! Core data structures: observation tables, time keys and forecast output.

mod forecast;
pub mod partition;
mod table;
mod time_index;

pub use forecast::{ForecastBatch, ForecastRecord, SeriesFailure};
pub use partition::{partition_by_series, Partition};
pub use table::{Column, Observation, ObservationTable};
pub use time_index::TimeIndex;
