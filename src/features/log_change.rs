//! Log-return (first difference of the natural log) within each series.

use tracing::debug;

use crate::core::partition::{partition_by_series, row_order};
use crate::core::{Column, ObservationTable};
use crate::error::Result;
use crate::features::lags::grouped_values;

/// Default name of the log-return column.
pub const LOG_CHANGE_COLUMN: &str = "log_change";

/// Add a `log_change` column: `ln(v_t) - ln(v_{t-1})` per series.
///
/// See [`generate_log_change_named`].
pub fn generate_log_change(
    table: &ObservationTable,
    grouping_key: &str,
    time_key: &str,
    value_key: &str,
) -> Result<ObservationTable> {
    generate_log_change_named(table, grouping_key, time_key, value_key, LOG_CHANGE_COLUMN)
}

/// Add a log-return column named `output_key`.
///
/// The result is sorted by `(grouping_key, time_key)`. The first row of each
/// series is missing. Log-returns are only defined for strictly positive
/// values: if either side of a step is non-positive or missing, that row is
/// missing and the rest of the column is still computed.
pub fn generate_log_change_named(
    table: &ObservationTable,
    grouping_key: &str,
    time_key: &str,
    value_key: &str,
    output_key: &str,
) -> Result<ObservationTable> {
    let partitions = partition_by_series(table, grouping_key, time_key)?;
    let grouped = grouped_values(table, value_key, &partitions)?;

    let mut column = Vec::with_capacity(table.num_rows());
    for values in &grouped {
        if values.is_empty() {
            continue;
        }
        column.push(None);
        column.extend(values.windows(2).map(|w| log_return(w[0], w[1])));
    }

    let undefined = column.iter().filter(|v| v.is_none()).count() - partitions.len();
    let mut output = table.take(&row_order(&partitions));
    output.insert_column(output_key, Column::Float(column))?;

    debug!(
        event_type = "log_change_generated",
        rows = table.num_rows(),
        series = partitions.len(),
        undefined_rows = undefined,
        "Generated log-return feature"
    );
    Ok(output)
}

fn log_return(prev: Option<f64>, curr: Option<f64>) -> Option<f64> {
    match (prev, curr) {
        (Some(p), Some(c)) if p > 0.0 && c > 0.0 => Some(c.ln() - p.ln()),
        _ => None,
    }
}
