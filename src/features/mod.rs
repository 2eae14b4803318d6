//! Per-series feature generation for local models.
//!
//! Pure table-to-table transforms. Each one partitions the table by series,
//! orders every partition by time and returns a new, sorted table with the
//! feature column(s) appended.
//!
//! # Example
//!
//! ```
//! use local_forecast::core::{Observation, ObservationTable};
//! use local_forecast::features::FeatureGenerator;
//!
//! let generator = FeatureGenerator::new();
//! let table = ObservationTable::from_observations(
//!     (0..4).map(|t| Observation::new("D1", t as i64, 10.0 * (t + 1) as f64)),
//!     generator.columns(),
//! );
//!
//! let with_lags = generator.lags(&table, &[1, 2]).unwrap();
//! let with_returns = generator.log_change(&with_lags).unwrap();
//! assert!(with_returns.has_column("lag_2"));
//! assert!(with_returns.has_column("log_change"));
//! ```

mod lags;
mod log_change;

pub use lags::{generate_lags, lag_column_name};
pub use log_change::{generate_log_change, generate_log_change_named, LOG_CHANGE_COLUMN};

use crate::config::ColumnNames;
use crate::core::ObservationTable;
use crate::error::Result;

/// Feature transforms bound to a fixed set of column names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureGenerator {
    columns: ColumnNames,
    log_change_column: String,
}

impl FeatureGenerator {
    /// Generator using the default `M4id` / `time_idx` / `value` columns.
    pub fn new() -> Self {
        Self::with_columns(ColumnNames::default())
    }

    pub fn with_columns(columns: ColumnNames) -> Self {
        Self {
            columns,
            log_change_column: LOG_CHANGE_COLUMN.to_string(),
        }
    }

    /// Set the name of the log-return output column.
    pub fn log_change_column(mut self, name: impl Into<String>) -> Self {
        self.log_change_column = name.into();
        self
    }

    pub fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    /// See [`generate_lags`].
    pub fn lags(&self, table: &ObservationTable, lags: &[i64]) -> Result<ObservationTable> {
        generate_lags(
            table,
            &self.columns.id,
            &self.columns.time,
            &self.columns.value,
            lags,
        )
    }

    /// See [`generate_log_change_named`].
    pub fn log_change(&self, table: &ObservationTable) -> Result<ObservationTable> {
        generate_log_change_named(
            table,
            &self.columns.id,
            &self.columns.time,
            &self.columns.value,
            &self.log_change_column,
        )
    }
}

impl Default for FeatureGenerator {
    fn default() -> Self {
        Self::new()
    }
}
