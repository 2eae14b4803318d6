//! Lagged copies of a value column, shifted within each series.

use tracing::debug;

use crate::config::validate_lags;
use crate::core::partition::{partition_by_series, row_order, Partition};
use crate::core::{Column, ObservationTable};
use crate::error::Result;

/// Name of the column holding lag `k`.
pub fn lag_column_name(lag: usize) -> String {
    format!("lag_{}", lag)
}

/// Add one `lag_<k>` column per requested lag.
///
/// The result is sorted by `(grouping_key, time_key)`. Row `t` of a series
/// gets the value observed `k` rows earlier in the same series; the first `k`
/// rows of every series are missing. Duplicate lags yield one column, and an
/// existing column with the same name is replaced.
///
/// An empty `lags` returns an unmodified copy of `table`. Any lag that is not
/// a positive integer fails with [`ForecastError::InvalidLag`] before any
/// output is built.
///
/// [`ForecastError::InvalidLag`]: crate::error::ForecastError::InvalidLag
///
/// # Example
///
/// ```
/// use local_forecast::core::{Column, ObservationTable};
/// use local_forecast::features::generate_lags;
///
/// let table = ObservationTable::new()
///     .with_column("M4id", Column::text(["D1", "D1", "D1"])).unwrap()
///     .with_column("time_idx", Column::steps([0, 1, 2])).unwrap()
///     .with_column("value", Column::floats([10.0, 20.0, 30.0])).unwrap();
///
/// let lagged = generate_lags(&table, "M4id", "time_idx", "value", &[1]).unwrap();
/// assert_eq!(lagged.floats("lag_1").unwrap(), &[None, Some(10.0), Some(20.0)]);
/// ```
pub fn generate_lags(
    table: &ObservationTable,
    grouping_key: &str,
    time_key: &str,
    value_key: &str,
    lags: &[i64],
) -> Result<ObservationTable> {
    if lags.is_empty() {
        return Ok(table.clone());
    }
    let lags = validate_lags(lags)?;

    let partitions = partition_by_series(table, grouping_key, time_key)?;
    let grouped = grouped_values(table, value_key, &partitions)?;

    let mut output = table.take(&row_order(&partitions));
    for &lag in &lags {
        let mut column = Vec::with_capacity(table.num_rows());
        for values in &grouped {
            column.extend(shift(values, lag));
        }
        output.insert_column(lag_column_name(lag), Column::Float(column))?;
    }

    debug!(
        event_type = "lag_features_generated",
        rows = table.num_rows(),
        series = partitions.len(),
        lags = ?lags,
        "Generated lag features"
    );
    Ok(output)
}

/// Value column split per partition, each in time order.
pub(crate) fn grouped_values(
    table: &ObservationTable,
    value_key: &str,
    partitions: &[Partition<'_>],
) -> Result<Vec<Vec<Option<f64>>>> {
    let values = table.floats(value_key)?;
    Ok(partitions
        .iter()
        .map(|p| p.rows.iter().map(|&row| values[row]).collect())
        .collect())
}

fn shift(values: &[Option<f64>], lag: usize) -> impl Iterator<Item = Option<f64>> + '_ {
    (0..values.len()).map(move |i| if i >= lag { values[i - lag] } else { None })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;

    fn single_series(values: &[f64]) -> ObservationTable {
        let n = values.len();
        ObservationTable::new()
            .with_column("M4id", Column::text(vec!["D1"; n]))
            .unwrap()
            .with_column("time_idx", Column::steps(0..n as i64))
            .unwrap()
            .with_column("value", Column::floats(values.iter().copied()))
            .unwrap()
    }

    #[test]
    fn lags_shift_within_series() {
        let table = single_series(&[10.0, 20.0, 30.0, 40.0]);
        let lagged = generate_lags(&table, "M4id", "time_idx", "value", &[1, 2]).unwrap();

        assert_eq!(
            lagged.floats("lag_1").unwrap(),
            &[None, Some(10.0), Some(20.0), Some(30.0)]
        );
        assert_eq!(
            lagged.floats("lag_2").unwrap(),
            &[None, None, Some(10.0), Some(20.0)]
        );
    }

    #[test]
    fn lags_never_cross_series_boundaries() {
        let table = ObservationTable::new()
            .with_column("M4id", Column::text(["B", "A", "B", "A"]))
            .unwrap()
            .with_column("time_idx", Column::steps([1, 1, 0, 0]))
            .unwrap()
            .with_column("value", Column::floats([4.0, 2.0, 3.0, 1.0]))
            .unwrap();

        let lagged = generate_lags(&table, "M4id", "time_idx", "value", &[1]).unwrap();
        assert_eq!(lagged.text("M4id").unwrap(), &["A", "A", "B", "B"]);
        assert_eq!(
            lagged.floats("lag_1").unwrap(),
            &[None, Some(1.0), None, Some(3.0)]
        );
    }

    #[test]
    fn empty_lag_set_is_identity() {
        let table = ObservationTable::new()
            .with_column("M4id", Column::text(["B", "A"]))
            .unwrap()
            .with_column("time_idx", Column::steps([0, 0]))
            .unwrap()
            .with_column("value", Column::floats([2.0, 1.0]))
            .unwrap();

        let out = generate_lags(&table, "M4id", "time_idx", "value", &[]).unwrap();
        assert_eq!(out, table);
    }

    #[test]
    fn invalid_lag_aborts_whole_call() {
        let table = single_series(&[1.0, 2.0]);
        let err = generate_lags(&table, "M4id", "time_idx", "value", &[1, 0]).unwrap_err();
        assert_eq!(err, ForecastError::InvalidLag(0));

        let err = generate_lags(&table, "M4id", "time_idx", "value", &[-2]).unwrap_err();
        assert_eq!(err, ForecastError::InvalidLag(-2));
    }

    #[test]
    fn lag_longer_than_series_is_all_missing() {
        let table = single_series(&[1.0, 2.0]);
        let lagged = generate_lags(&table, "M4id", "time_idx", "value", &[5]).unwrap();
        assert_eq!(lagged.floats("lag_5").unwrap(), &[None, None]);
    }

    #[test]
    fn duplicate_lags_yield_one_column() {
        let table = single_series(&[1.0, 2.0, 3.0]);
        let lagged = generate_lags(&table, "M4id", "time_idx", "value", &[1, 1]).unwrap();
        assert_eq!(lagged.num_columns(), 4);
    }

    #[test]
    fn input_is_not_mutated() {
        let table = single_series(&[1.0, 2.0, 3.0]);
        let before = table.clone();
        generate_lags(&table, "M4id", "time_idx", "value", &[1]).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn missing_values_propagate() {
        let table = ObservationTable::new()
            .with_column("M4id", Column::text(["D1", "D1", "D1"]))
            .unwrap()
            .with_column("time_idx", Column::steps([0, 1, 2]))
            .unwrap()
            .with_column("value", Column::Float(vec![Some(1.0), None, Some(3.0)]))
            .unwrap();

        let lagged = generate_lags(&table, "M4id", "time_idx", "value", &[1]).unwrap();
        assert_eq!(lagged.floats("lag_1").unwrap(), &[None, Some(1.0), None]);
    }

    #[test]
    fn integer_time_column_is_accepted() {
        let table = ObservationTable::new()
            .with_column("M4id", Column::text(["D1", "D1", "D1"]))
            .unwrap()
            .with_column("time_idx", Column::Integer(vec![2, 0, 1]))
            .unwrap()
            .with_column("value", Column::floats([30.0, 10.0, 20.0]))
            .unwrap();

        let lagged = generate_lags(&table, "M4id", "time_idx", "value", &[1]).unwrap();
        assert_eq!(lagged.integers("time_idx").unwrap(), &[0, 1, 2]);
        assert_eq!(
            lagged.floats("lag_1").unwrap(),
            &[None, Some(10.0), Some(20.0)]
        );
    }

    #[test]
    fn wrong_value_column_type_is_reported() {
        let table = single_series(&[1.0]);
        let err = generate_lags(&table, "M4id", "time_idx", "M4id", &[1]).unwrap_err();
        assert!(matches!(err, ForecastError::ColumnType { .. }));
    }
}
