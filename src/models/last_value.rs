//! Last-value local model.
//!
//! Forecasts the newest observation of each series for every future step.

use tracing::debug;

use crate::config::ColumnNames;
use crate::core::{ForecastBatch, ObservationTable};
use crate::error::{ForecastError, Result};
use crate::models::LocalForecastModel;
use crate::state::SeriesStateStore;

/// Per-series naive forecaster that repeats the last value.
#[derive(Debug, Clone, Default)]
pub struct LastValue {
    columns: ColumnNames,
    state: Option<SeriesStateStore>,
}

impl LastValue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(columns: ColumnNames) -> Self {
        Self {
            columns,
            state: None,
        }
    }
}

impl LocalForecastModel for LastValue {
    fn fit(&mut self, table: &ObservationTable) -> Result<()> {
        if table.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        self.state = Some(SeriesStateStore::build(
            table,
            &self.columns.id,
            &self.columns.time,
            &self.columns.value,
            1,
        )?);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<ForecastBatch> {
        let store = self.state.as_ref().ok_or(ForecastError::FitRequired)?;

        let mut batch = ForecastBatch::new();
        if horizon == 0 {
            return Ok(batch);
        }

        let mut entries: Vec<(&str, Result<f64>)> = store
            .iter()
            .map(|(id, buffer)| {
                let last = buffer.last().ok_or_else(|| ForecastError::InsufficientHistory {
                    series_id: id.to_string(),
                    step: 1,
                    available: 0,
                    min_lag: 1,
                });
                (id, last)
            })
            .chain(
                store
                    .rejected()
                    .map(|id| (id, Err(ForecastError::MissingValues(id.to_string())))),
            )
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));

        for (series_id, last) in entries {
            match last {
                Ok(last) => batch.push_series(series_id, std::iter::repeat(last).take(horizon)),
                Err(err) => batch.push_failure(series_id, err),
            }
        }

        debug!(
            event_type = "forecast_complete",
            series = store.len(),
            horizon,
            records = batch.len(),
            "Last-value batch complete"
        );
        Ok(batch)
    }

    fn state(&self) -> Option<&SeriesStateStore> {
        self.state.as_ref()
    }

    fn name(&self) -> &str {
        "LastValue"
    }
}
