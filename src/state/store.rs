//! Per-series rolling state built from a fit table.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::partition::partition_by_series;
use crate::core::ObservationTable;
use crate::error::{ForecastError, Result};
use crate::state::RollingBuffer;

/// Mapping from series id to that series' [`RollingBuffer`].
///
/// The store owns every buffer and hands out shared borrows only. It is
/// replaced wholesale by [`build`](Self::build); there is no incremental
/// update. Iteration is ordered by series id.
///
/// Series whose retained window has a missing value get no buffer. They are
/// listed by [`rejected`](Self::rejected) and [`get`](Self::get) reports them
/// as [`ForecastError::MissingValues`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeriesStateStore {
    max_lag: usize,
    buffers: BTreeMap<String, RollingBuffer>,
    rejected: BTreeSet<String>,
}

impl SeriesStateStore {
    /// Keep the last `max_lag` values of every series in `table`.
    ///
    /// Each series is ordered by `time_key` first. A series with a missing
    /// value among its retained values is rejected on its own; the other
    /// series are still built.
    pub fn build(
        table: &ObservationTable,
        grouping_key: &str,
        time_key: &str,
        value_key: &str,
        max_lag: usize,
    ) -> Result<Self> {
        if max_lag == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_lag must be at least 1".to_string(),
            ));
        }

        let partitions = partition_by_series(table, grouping_key, time_key)?;
        let values = table.floats(value_key)?;

        let mut buffers = BTreeMap::new();
        let mut rejected = BTreeSet::new();
        for partition in &partitions {
            let start = partition.len().saturating_sub(max_lag);
            let tail = partition.rows[start..]
                .iter()
                .map(|&row| values[row])
                .collect::<Option<Vec<f64>>>();
            match tail {
                Some(tail) => {
                    buffers.insert(
                        partition.key.to_string(),
                        RollingBuffer::from_tail(&tail, max_lag),
                    );
                }
                None => {
                    warn!(
                        event_type = "series_rejected",
                        series_id = partition.key,
                        "Missing value in retained window"
                    );
                    rejected.insert(partition.key.to_string());
                }
            }
        }

        debug!(
            event_type = "state_store_built",
            series = buffers.len(),
            rejected = rejected.len(),
            max_lag,
            "Built rolling state"
        );
        Ok(Self {
            max_lag,
            buffers,
            rejected,
        })
    }

    pub fn get(&self, series_id: &str) -> Result<&RollingBuffer> {
        match self.buffers.get(series_id) {
            Some(buffer) => Ok(buffer),
            None if self.rejected.contains(series_id) => {
                Err(ForecastError::MissingValues(series_id.to_string()))
            }
            None => Err(ForecastError::UnknownSeries(series_id.to_string())),
        }
    }

    pub fn contains(&self, series_id: &str) -> bool {
        self.buffers.contains_key(series_id)
    }

    /// Capacity of every buffer in the store.
    pub fn max_lag(&self) -> usize {
        self.max_lag
    }

    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    pub fn series_ids(&self) -> impl Iterator<Item = &str> {
        self.buffers.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RollingBuffer)> {
        self.buffers.iter().map(|(id, buf)| (id.as_str(), buf))
    }

    /// Series left out of the store because of missing values, by id.
    pub fn rejected(&self) -> impl Iterator<Item = &str> {
        self.rejected.iter().map(String::as_str)
    }

    /// Plain, serializable copy of the store.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            max_lag: self.max_lag,
            series: self
                .buffers
                .iter()
                .map(|(id, buf)| (id.clone(), buf.to_vec()))
                .collect(),
            rejected: self.rejected.clone(),
        }
    }

    /// Rebuild a store from a snapshot.
    pub fn from_snapshot(snapshot: StoreSnapshot) -> Result<Self> {
        if snapshot.max_lag == 0 {
            return Err(ForecastError::InvalidParameter(
                "max_lag must be at least 1".to_string(),
            ));
        }
        let mut buffers = BTreeMap::new();
        for (series_id, values) in snapshot.series {
            if values.len() > snapshot.max_lag {
                return Err(ForecastError::DimensionMismatch {
                    expected: snapshot.max_lag,
                    got: values.len(),
                });
            }
            let buffer = RollingBuffer::from_tail(&values, snapshot.max_lag);
            buffers.insert(series_id, buffer);
        }
        let rejected = snapshot
            .rejected
            .into_iter()
            .filter(|id| !buffers.contains_key(id))
            .collect();
        Ok(Self {
            max_lag: snapshot.max_lag,
            buffers,
            rejected,
        })
    }
}

/// Persisted form of a fitted store: series id → retained values, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub max_lag: usize,
    pub series: BTreeMap<String, Vec<f64>>,
    #[serde(default)]
    pub rejected: BTreeSet<String>,
}

impl StoreSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
