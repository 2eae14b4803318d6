//! LocalForecastModel trait defining the common interface for local models.

use crate::core::{ForecastBatch, ObservationTable};
use crate::error::Result;
use crate::state::SeriesStateStore;

/// Common interface for models that keep independent state per series.
///
/// `fit` replaces all state from a long-format table; `predict` forecasts
/// every fitted series. Per-series problems during `predict` are reported in
/// [`ForecastBatch::failures`] rather than failing the call.
///
/// This trait is object-safe and can be used with `Box<dyn LocalForecastModel>`.
pub trait LocalForecastModel {
    /// Fit the model to every series in the table.
    fn fit(&mut self, table: &ObservationTable) -> Result<()>;

    /// Forecast `horizon` steps for every fitted series.
    fn predict(&self, horizon: usize) -> Result<ForecastBatch>;

    /// Fitted per-series state, if any.
    fn state(&self) -> Option<&SeriesStateStore>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.state().is_some()
    }
}

/// Type alias for boxed local model trait objects.
///
/// # Example
///
/// ```
/// use local_forecast::models::{BoxedLocalModel, LagMovingAverage, LastValue};
///
/// let models: Vec<BoxedLocalModel> = vec![
///     Box::new(LagMovingAverage::default()),
///     Box::new(LastValue::new()),
/// ];
/// assert_eq!(models[0].name(), "LagMovingAverage");
/// assert!(!models[1].is_fitted());
/// ```
pub type BoxedLocalModel = Box<dyn LocalForecastModel + Send + Sync>;
