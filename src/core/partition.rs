//! Explicit per-series partitioning of a long-format table.
//!
//! Every groupwise operation in the crate starts here: the table is split
//! once into series partitions, each holding its row indices in time order,
//! and the partitions are then processed independently.

use std::collections::BTreeMap;

use crate::core::ObservationTable;
use crate::error::Result;

/// Row indices of one series, ordered by time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition<'a> {
    pub key: &'a str,
    pub rows: Vec<usize>,
}

impl Partition<'_> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Split `table` by `grouping_key`, ordering each partition by `time_key`.
///
/// Partitions come back sorted by key. Within a partition the sort is
/// stable, so rows with equal time keep their input order.
pub fn partition_by_series<'a>(
    table: &'a ObservationTable,
    grouping_key: &str,
    time_key: &str,
) -> Result<Vec<Partition<'a>>> {
    let keys = table.text(grouping_key)?;
    let times = table.time_keys(time_key)?;

    let mut groups: BTreeMap<&'a str, Vec<usize>> = BTreeMap::new();
    for (row, key) in keys.iter().enumerate() {
        groups.entry(key.as_str()).or_default().push(row);
    }

    Ok(groups
        .into_iter()
        .map(|(key, mut rows)| {
            rows.sort_by_key(|&row| times[row]);
            Partition { key, rows }
        })
        .collect())
}

/// Concatenated row order of all partitions: the `(group, time)` sort order.
pub fn row_order(partitions: &[Partition<'_>]) -> Vec<usize> {
    partitions
        .iter()
        .flat_map(|p| p.rows.iter().copied())
        .collect()
}
