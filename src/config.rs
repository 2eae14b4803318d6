//! Configuration surface: column names, lag sets and forecast settings.

use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};
use crate::models::LagMovingAverage;

/// Lags used when none are configured.
pub const DEFAULT_LAGS: [i64; 5] = [1, 7, 14, 21, 28];

/// Names of the series id, time and value columns of a long-format table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub id: String,
    pub time: String,
    pub value: String,
}

impl ColumnNames {
    pub fn new(id: impl Into<String>, time: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            time: time.into(),
            value: value.into(),
        }
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self::new("M4id", "time_idx", "value")
    }
}

/// Checks that every lag is a positive integer and returns them sorted and deduplicated.
///
/// An empty input is allowed here; callers that need at least one lag go
/// through [`LagSet::new`].
pub fn validate_lags(lags: &[i64]) -> Result<Vec<usize>> {
    let mut valid = Vec::with_capacity(lags.len());
    for &lag in lags {
        if lag <= 0 {
            return Err(ForecastError::InvalidLag(lag));
        }
        valid.push(lag as usize);
    }
    valid.sort_unstable();
    valid.dedup();
    Ok(valid)
}

/// A non-empty, ascending, duplicate-free set of positive lags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LagSet {
    lags: Vec<usize>,
}

impl LagSet {
    pub fn new(lags: &[i64]) -> Result<Self> {
        let lags = validate_lags(lags)?;
        if lags.is_empty() {
            return Err(ForecastError::InvalidParameter(
                "at least one lag is required".to_string(),
            ));
        }
        Ok(Self { lags })
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.lags
    }

    /// Smallest lag.
    pub fn min(&self) -> usize {
        self.lags[0]
    }

    /// Largest lag; also the capacity of each rolling buffer.
    pub fn max(&self) -> usize {
        self.lags[self.lags.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.lags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.lags.iter().copied()
    }
}

impl Default for LagSet {
    fn default() -> Self {
        Self {
            lags: DEFAULT_LAGS.iter().map(|&l| l as usize).collect(),
        }
    }
}

/// Settings for a forecasting run, loadable from JSON.
///
/// Every field is optional in the JSON form:
///
/// ```
/// use local_forecast::config::ForecastConfig;
///
/// let config = ForecastConfig::from_json(r#"{"lags": [1, 2], "horizon": 3}"#).unwrap();
/// assert_eq!(config.horizon, 3);
/// assert_eq!(config.columns.id, "M4id");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub lags: Vec<i64>,
    pub horizon: usize,
    pub columns: ColumnNames,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            lags: DEFAULT_LAGS.to_vec(),
            horizon: 1,
            columns: ColumnNames::default(),
        }
    }
}

impl ForecastConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn lag_set(&self) -> Result<LagSet> {
        LagSet::new(&self.lags)
    }

    /// Validate lags and horizon without building anything.
    pub fn validate(&self) -> Result<()> {
        self.lag_set()?;
        if self.horizon == 0 {
            return Err(ForecastError::InvalidParameter(
                "horizon must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }

    /// Build an unfitted moving-average model from this configuration.
    pub fn build_model(&self) -> Result<LagMovingAverage> {
        self.validate()?;
        LagMovingAverage::builder()
            .lags(&self.lags)
            .columns(self.columns.clone())
            .build()
    }
}
