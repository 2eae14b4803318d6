//! Recursive lag moving-average forecaster.
//!
//! Each step averages the values found at the configured lag offsets from the
//! end of a growing working history, then appends that average to the
//! history. Later steps therefore depend on earlier forecasts.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::{ColumnNames, LagSet, DEFAULT_LAGS};
use crate::core::{ForecastBatch, ObservationTable};
use crate::error::{ForecastError, Result};
use crate::models::LocalForecastModel;
use crate::state::{RollingBuffer, SeriesStateStore, StoreSnapshot};

/// Forecast `horizon` steps from `history` (oldest first).
///
/// At every step the `l`-th most recent value is averaged for each lag `l`
/// that fits into the current history. The working history is unbounded: it
/// starts as a copy of `history` and grows by one forecast per step.
///
/// Fails with [`ForecastError::InsufficientHistory`] when no lag fits.
///
/// # Example
///
/// ```
/// use local_forecast::config::LagSet;
/// use local_forecast::models::recursive_forecast;
///
/// let lags = LagSet::new(&[1, 2]).unwrap();
/// let path = recursive_forecast("D1", &[10.0, 20.0], &lags, 2).unwrap();
/// assert_eq!(path, vec![15.0, 17.5]);
/// ```
pub fn recursive_forecast(
    series_id: &str,
    history: &[f64],
    lags: &LagSet,
    horizon: usize,
) -> Result<Vec<f64>> {
    // Grown one step at a time; `horizon` is caller input and may be huge.
    let mut working = history.to_vec();
    let mut forecasts = Vec::new();

    for step in 1..=horizon {
        let n = working.len();
        // Lags are ascending, so stop at the first one that does not fit.
        let (sum, count) = lags
            .iter()
            .take_while(|&lag| lag <= n)
            .fold((0.0, 0usize), |(sum, count), lag| {
                (sum + working[n - lag], count + 1)
            });

        if count == 0 {
            return Err(ForecastError::InsufficientHistory {
                series_id: series_id.to_string(),
                step,
                available: n,
                min_lag: lags.min(),
            });
        }

        let y_hat = sum / count as f64;
        working.push(y_hat);
        forecasts.push(y_hat);
    }

    Ok(forecasts)
}

/// Local moving-average model over a fixed set of lags.
///
/// `fit` keeps the last `max(lags)` observations of every series; `predict`
/// runs [`recursive_forecast`] on each of them independently. With the
/// `parallel` feature, series are spread over the rayon thread pool; the
/// output is the same either way, ordered by series id.
///
/// # Example
///
/// ```
/// use local_forecast::config::ColumnNames;
/// use local_forecast::core::{Observation, ObservationTable};
/// use local_forecast::models::{LagMovingAverage, LocalForecastModel};
///
/// let table = ObservationTable::from_observations(
///     vec![Observation::new("D1", 0, 10.0), Observation::new("D1", 1, 20.0)],
///     &ColumnNames::default(),
/// );
///
/// let mut model = LagMovingAverage::new(&[1, 2]).unwrap();
/// model.fit(&table).unwrap();
///
/// let batch = model.predict(2).unwrap();
/// assert_eq!(batch.series_values("D1"), vec![15.0, 17.5]);
/// ```
#[derive(Debug, Clone)]
pub struct LagMovingAverage {
    lags: LagSet,
    columns: ColumnNames,
    state: Option<SeriesStateStore>,
}

/// Builder for LagMovingAverage.
#[derive(Debug, Clone)]
pub struct LagMovingAverageBuilder {
    lags: Vec<i64>,
    columns: ColumnNames,
}

impl Default for LagMovingAverageBuilder {
    fn default() -> Self {
        Self {
            lags: DEFAULT_LAGS.to_vec(),
            columns: ColumnNames::default(),
        }
    }
}

impl LagMovingAverageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lags. Duplicates are dropped and the set is sorted on build.
    pub fn lags(mut self, lags: &[i64]) -> Self {
        self.lags = lags.to_vec();
        self
    }

    /// Set the id/time/value column names read by `fit`.
    pub fn columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    pub fn build(self) -> Result<LagMovingAverage> {
        Ok(LagMovingAverage {
            lags: LagSet::new(&self.lags)?,
            columns: self.columns,
            state: None,
        })
    }
}

impl LagMovingAverage {
    /// Create a model with the given lags and default column names.
    pub fn new(lags: &[i64]) -> Result<Self> {
        Self::builder().lags(lags).build()
    }

    /// Create a builder for more complex configuration.
    pub fn builder() -> LagMovingAverageBuilder {
        LagMovingAverageBuilder::new()
    }

    pub fn lags(&self) -> &LagSet {
        &self.lags
    }

    /// Largest lag: buffer capacity and widest averaging offset.
    pub fn max_lag(&self) -> usize {
        self.lags.max()
    }

    pub fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    /// Replace the fitted state with a persisted snapshot.
    ///
    /// The snapshot must have been taken with the same maximum lag.
    pub fn load_snapshot(&mut self, snapshot: StoreSnapshot) -> Result<()> {
        if snapshot.max_lag != self.max_lag() {
            return Err(ForecastError::InvalidParameter(format!(
                "snapshot max_lag {} does not match model max_lag {}",
                snapshot.max_lag,
                self.max_lag()
            )));
        }
        self.state = Some(SeriesStateStore::from_snapshot(snapshot)?);
        Ok(())
    }

    /// Forecast a single fitted series.
    pub fn forecast_series(&self, series_id: &str, horizon: usize) -> Result<Vec<f64>> {
        let store = self.state.as_ref().ok_or(ForecastError::FitRequired)?;
        self.forecast_buffer(series_id, store.get(series_id)?, horizon)
    }

    fn forecast_buffer(
        &self,
        series_id: &str,
        buffer: &RollingBuffer,
        horizon: usize,
    ) -> Result<Vec<f64>> {
        recursive_forecast(series_id, &buffer.to_vec(), &self.lags, horizon)
    }
}

impl Default for LagMovingAverage {
    fn default() -> Self {
        Self {
            lags: LagSet::default(),
            columns: ColumnNames::default(),
            state: None,
        }
    }
}

impl LocalForecastModel for LagMovingAverage {
    fn fit(&mut self, table: &ObservationTable) -> Result<()> {
        if table.is_empty() {
            return Err(ForecastError::EmptyData);
        }

        let store = SeriesStateStore::build(
            table,
            &self.columns.id,
            &self.columns.time,
            &self.columns.value,
            self.max_lag(),
        )?;
        self.state = Some(store);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<ForecastBatch> {
        let store = self.state.as_ref().ok_or(ForecastError::FitRequired)?;

        if horizon == 0 {
            return Ok(ForecastBatch::new());
        }

        let entries: Vec<(&str, &RollingBuffer)> = store.iter().collect();

        #[cfg(feature = "parallel")]
        let iter = entries.par_iter();
        #[cfg(not(feature = "parallel"))]
        let iter = entries.iter();

        let mut results: Vec<(&str, Result<Vec<f64>>)> = iter
            .map(|&(id, buffer)| (id, self.forecast_buffer(id, buffer, horizon)))
            .collect();
        results.extend(
            store
                .rejected()
                .map(|id| (id, Err(ForecastError::MissingValues(id.to_string())))),
        );
        results.sort_by(|a, b| a.0.cmp(b.0));

        let mut batch = ForecastBatch::new();
        for (series_id, result) in results {
            match result {
                Ok(path) => batch.push_series(series_id, path),
                Err(err) => {
                    warn!(
                        event_type = "series_forecast_failed",
                        series_id,
                        error = %err,
                        "Skipping series"
                    );
                    batch.push_failure(series_id, err);
                }
            }
        }

        debug!(
            event_type = "forecast_complete",
            series = store.len(),
            horizon,
            records = batch.len(),
            failures = batch.failures().len(),
            "Forecast batch complete"
        );
        Ok(batch)
    }

    fn state(&self) -> Option<&SeriesStateStore> {
        self.state.as_ref()
    }

    fn name(&self) -> &str {
        "LagMovingAverage"
    }
}
