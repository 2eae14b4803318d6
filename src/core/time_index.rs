//! Totally ordered time keys for long-format tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of an observation in time.
///
/// Either an integer step (`time_idx` in M4-style data) or a UTC timestamp.
/// A single column is expected to use one flavour; if they are mixed, every
/// step sorts before every timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeIndex {
    Step(i64),
    Timestamp(DateTime<Utc>),
}

impl From<i64> for TimeIndex {
    fn from(step: i64) -> Self {
        TimeIndex::Step(step)
    }
}

impl From<i32> for TimeIndex {
    fn from(step: i32) -> Self {
        TimeIndex::Step(step as i64)
    }
}

impl From<DateTime<Utc>> for TimeIndex {
    fn from(ts: DateTime<Utc>) -> Self {
        TimeIndex::Timestamp(ts)
    }
}

impl fmt::Display for TimeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeIndex::Step(step) => write!(f, "{}", step),
            TimeIndex::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
        }
    }
}
