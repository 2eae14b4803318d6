//! Error types for the local-forecast library.

use thiserror::Error;

/// Result type alias for forecast operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while building features, fitting or forecasting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Input data is empty.
    #[error("empty input data")]
    EmptyData,

    /// A requested lag is not a positive integer.
    #[error("invalid lag {0}: all lags must be positive integers")]
    InvalidLag(i64),

    /// A state lookup targeted a series that was never fitted.
    #[error("unknown series: {0}")]
    UnknownSeries(String),

    /// No configured lag offset fits into the series' working history.
    #[error(
        "insufficient history for series {series_id} at step {step}: \
         {available} values available, smallest lag is {min_lag}"
    )]
    InsufficientHistory {
        series_id: String,
        step: usize,
        available: usize,
        min_lag: usize,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,

    /// A referenced column does not exist in the table.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A column exists but holds a different kind of data.
    #[error("column {column} is not a {expected} column")]
    ColumnType {
        column: String,
        expected: &'static str,
    },

    /// A column with the same name was added twice.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// Dimension mismatch between data structures.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// Missing values detected when not allowed.
    #[error("missing values detected in series {0}")]
    MissingValues(String),

    /// Persisted state or configuration could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::Serialization(err.to_string())
    }
}
