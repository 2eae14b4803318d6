//! Fixed-capacity FIFO history of one series.

use std::collections::VecDeque;

/// The most recent values of a series, oldest first.
///
/// Holds at most `capacity` values. Pushing onto a full buffer evicts the
/// oldest value. A buffer built from fewer values than its capacity is not
/// padded.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingBuffer {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingBuffer {
    /// Create an empty buffer. A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
        }
    }

    /// Buffer holding the last `capacity` entries of `values`.
    pub fn from_tail(values: &[f64], capacity: usize) -> Self {
        let mut buffer = Self::new(capacity);
        let start = values.len().saturating_sub(buffer.capacity);
        buffer.values.extend(&values[start..]);
        buffer
    }

    /// Append at the newest end, returning the evicted oldest value if full.
    pub fn push(&mut self, value: f64) -> Option<f64> {
        let evicted = if self.is_full() {
            self.values.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        evicted
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.values.len() == self.capacity
    }

    /// Newest value.
    pub fn last(&self) -> Option<f64> {
        self.values.back().copied()
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }
}
