//! # local-forecast
//!
//! Short-horizon forecasting for many independent time series, each from its
//! own local history.
//!
//! Provides per-series lag and log-return features, a bounded rolling state
//! per series, and a recursive moving-average forecaster whose later steps
//! build on its own earlier forecasts.
//!
//! # Example
//!
//! ```
//! use local_forecast::prelude::*;
//!
//! let table = ObservationTable::from_observations(
//!     (0..30).map(|t| Observation::new("D1", t as i64, 100.0 + t as f64)),
//!     &ColumnNames::default(),
//! );
//!
//! let mut model = LagMovingAverage::default();
//! model.fit(&table).unwrap();
//! let batch = model.predict(7).unwrap();
//! assert_eq!(batch.len(), 7);
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod models;
pub mod state;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::config::{ColumnNames, ForecastConfig, LagSet};
    pub use crate::core::{Column, ForecastBatch, ForecastRecord, Observation, ObservationTable};
    pub use crate::error::{ForecastError, Result};
    pub use crate::features::{generate_lags, generate_log_change, FeatureGenerator};
    pub use crate::models::{LagMovingAverage, LastValue, LocalForecastModel};
    pub use crate::state::SeriesStateStore;
}
