//! Forecast output: per-step records plus isolated per-series failures.

use serde::{Deserialize, Serialize};

use crate::core::{Column, ObservationTable};
use crate::error::{ForecastError, Result};

/// One forecast value for one series at one horizon step (1-based).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    pub series_id: String,
    pub horizon: usize,
    pub y_hat: f64,
}

/// A series whose forecast was abandoned, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFailure {
    pub series_id: String,
    pub error: ForecastError,
}

/// Result of a batch `predict` call.
///
/// Records are ordered by series id, then horizon step. Failing series
/// contribute no records and appear in [`failures`](Self::failures) instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastBatch {
    records: Vec<ForecastRecord>,
    failures: Vec<SeriesFailure>,
}

impl ForecastBatch {
    /// Create an empty batch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the forecast path of one series, numbering steps from 1.
    pub fn push_series(&mut self, series_id: &str, values: impl IntoIterator<Item = f64>) {
        self.records
            .extend(values.into_iter().enumerate().map(|(i, y_hat)| ForecastRecord {
                series_id: series_id.to_string(),
                horizon: i + 1,
                y_hat,
            }));
    }

    pub fn push_failure(&mut self, series_id: &str, error: ForecastError) {
        self.failures.push(SeriesFailure {
            series_id: series_id.to_string(),
            error,
        });
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    pub fn failures(&self) -> &[SeriesFailure] {
        &self.failures
    }

    pub fn into_parts(self) -> (Vec<ForecastRecord>, Vec<SeriesFailure>) {
        (self.records, self.failures)
    }

    /// Number of forecast records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when there are no records (failures are not counted).
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Forecast values of one series in horizon order; empty if it has none.
    pub fn series_values(&self, series_id: &str) -> Vec<f64> {
        self.records
            .iter()
            .filter(|r| r.series_id == series_id)
            .map(|r| r.y_hat)
            .collect()
    }

    pub fn failure_for(&self, series_id: &str) -> Option<&ForecastError> {
        self.failures
            .iter()
            .find(|f| f.series_id == series_id)
            .map(|f| &f.error)
    }

    /// Render as a `(<id_column>, horizon, y_hat)` table.
    pub fn to_table(&self, id_column: &str) -> Result<ObservationTable> {
        ObservationTable::new()
            .with_column(
                id_column,
                Column::text(self.records.iter().map(|r| r.series_id.as_str())),
            )?
            .with_column(
                "horizon",
                Column::Integer(self.records.iter().map(|r| r.horizon as i64).collect()),
            )?
            .with_column("y_hat", Column::floats(self.records.iter().map(|r| r.y_hat)))
    }
}
