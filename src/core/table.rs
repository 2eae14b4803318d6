//! Long-format, column-oriented observation table.

use std::borrow::Cow;

use crate::config::ColumnNames;
use crate::core::partition::{partition_by_series, row_order};
use crate::core::TimeIndex;
use crate::error::{ForecastError, Result};

/// A single `(series_id, time_index, value)` observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub series_id: String,
    pub time_index: TimeIndex,
    pub value: f64,
}

impl Observation {
    pub fn new(series_id: impl Into<String>, time_index: impl Into<TimeIndex>, value: f64) -> Self {
        Self {
            series_id: series_id.into(),
            time_index: time_index.into(),
            value,
        }
    }
}

/// A typed column. Float cells may be missing (`None`).
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(Vec<String>),
    Time(Vec<TimeIndex>),
    Float(Vec<Option<f64>>),
    Integer(Vec<i64>),
}

impl Column {
    /// Float column without missing cells.
    pub fn floats(values: impl IntoIterator<Item = f64>) -> Self {
        Column::Float(values.into_iter().map(Some).collect())
    }

    /// Time column of integer steps.
    pub fn steps(steps: impl IntoIterator<Item = i64>) -> Self {
        Column::Time(steps.into_iter().map(TimeIndex::Step).collect())
    }

    pub fn text<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Column::Text(values.into_iter().map(Into::into).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Text(v) => v.len(),
            Column::Time(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Integer(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the column kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Column::Text(_) => "text",
            Column::Time(_) => "time",
            Column::Float(_) => "float",
            Column::Integer(_) => "integer",
        }
    }

    /// Gather the cells at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Text(v) => Column::Text(indices.iter().map(|&i| v[i].clone()).collect()),
            Column::Time(v) => Column::Time(indices.iter().map(|&i| v[i]).collect()),
            Column::Float(v) => Column::Float(indices.iter().map(|&i| v[i]).collect()),
            Column::Integer(v) => Column::Integer(indices.iter().map(|&i| v[i]).collect()),
        }
    }
}

/// An unordered collection of rows stored as named columns of equal length.
///
/// # Example
///
/// ```
/// use local_forecast::core::{Column, ObservationTable};
///
/// let table = ObservationTable::new()
///     .with_column("M4id", Column::text(["D1", "D1"])).unwrap()
///     .with_column("time_idx", Column::steps([0, 1])).unwrap()
///     .with_column("value", Column::floats([1.0, 2.0])).unwrap();
/// assert_eq!(table.num_rows(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl ObservationTable {
    /// Create a table with no columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a three-column table from observations using the given column names.
    pub fn from_observations<I>(observations: I, names: &ColumnNames) -> Self
    where
        I: IntoIterator<Item = Observation>,
    {
        let mut ids = Vec::new();
        let mut times = Vec::new();
        let mut values = Vec::new();
        for obs in observations {
            ids.push(obs.series_id);
            times.push(obs.time_index);
            values.push(Some(obs.value));
        }
        Self {
            names: vec![names.id.clone(), names.time.clone(), names.value.clone()],
            columns: vec![Column::Text(ids), Column::Time(times), Column::Float(values)],
        }
    }

    /// Add a column, failing on a name clash or a length mismatch.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> Result<Self> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(ForecastError::DuplicateColumn(name));
        }
        self.check_length(&column)?;
        self.names.push(name);
        self.columns.push(column);
        Ok(self)
    }

    /// Add a column, replacing any existing column of the same name in place.
    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        match self.position(&name) {
            Some(idx) => {
                if self.columns.len() > 1 && column.len() != self.num_rows() {
                    return Err(ForecastError::DimensionMismatch {
                        expected: self.num_rows(),
                        got: column.len(),
                    });
                }
                self.columns[idx] = column;
            }
            None => {
                self.check_length(&column)?;
                self.names.push(name);
                self.columns.push(column);
            }
        }
        Ok(())
    }

    fn check_length(&self, column: &Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.num_rows() {
            return Err(ForecastError::DimensionMismatch {
                expected: self.num_rows(),
                got: column.len(),
            });
        }
        Ok(())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.position(name)
            .map(|idx| &self.columns[idx])
            .ok_or_else(|| ForecastError::MissingColumn(name.to_string()))
    }

    pub fn text(&self, name: &str) -> Result<&[String]> {
        match self.column(name)? {
            Column::Text(v) => Ok(v),
            _ => Err(type_error(name, "text")),
        }
    }

    pub fn times(&self, name: &str) -> Result<&[TimeIndex]> {
        match self.column(name)? {
            Column::Time(v) => Ok(v),
            _ => Err(type_error(name, "time")),
        }
    }

    /// Ordering keys of a time column. Integer columns are read as steps.
    pub fn time_keys(&self, name: &str) -> Result<Cow<'_, [TimeIndex]>> {
        match self.column(name)? {
            Column::Time(v) => Ok(Cow::Borrowed(v)),
            Column::Integer(v) => Ok(Cow::Owned(
                v.iter().map(|&step| TimeIndex::Step(step)).collect(),
            )),
            _ => Err(type_error(name, "time")),
        }
    }

    pub fn floats(&self, name: &str) -> Result<&[Option<f64>]> {
        match self.column(name)? {
            Column::Float(v) => Ok(v),
            _ => Err(type_error(name, "float")),
        }
    }

    pub fn integers(&self, name: &str) -> Result<&[i64]> {
        match self.column(name)? {
            Column::Integer(v) => Ok(v),
            _ => Err(type_error(name, "integer")),
        }
    }

    /// New table holding the rows at `indices`, in that order.
    pub fn take(&self, indices: &[usize]) -> Self {
        Self {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.take(indices)).collect(),
        }
    }

    /// Copy of the table sorted by `(grouping_key, time_key)`.
    ///
    /// Rows sharing a key keep their input order.
    pub fn sorted_by(&self, grouping_key: &str, time_key: &str) -> Result<Self> {
        let partitions = partition_by_series(self, grouping_key, time_key)?;
        Ok(self.take(&row_order(&partitions)))
    }
}

fn type_error(column: &str, expected: &'static str) -> ForecastError {
    ForecastError::ColumnType {
        column: column.to_string(),
        expected,
    }
}
