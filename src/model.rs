// Core structs: RawRecord, WeekdaySeries, SparseSeries, AlignedPair, errors
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One row as read from a CSV source, before any parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub line: usize,
    pub date: String,
    pub value: String,
}

/// A single parsed (date, value) pair. `value` is `None` for blank cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Date-indexed numeric series: dates unique and strictly increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdaySeries {
    pub name: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl WeekdaySeries {
    /// Builds a series from already-sorted, unique points.
    /// Points that break strict date ordering are skipped.
    pub fn from_sorted(name: impl Into<String>, points: impl IntoIterator<Item = (NaiveDate, f64)>) -> Self {
        let mut dates = Vec::new();
        let mut values = Vec::new();
        for (date, value) in points {
            if dates.last().is_some_and(|last| *last >= date) {
                continue;
            }
            dates.push(date);
            values.push(value);
        }
        Self {
            name: name.into(),
            dates,
            values,
        }
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.dates
            .binary_search(&date)
            .ok()
            .map(|idx| self.values[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.values.len() as f64)
    }
}

/// Date-indexed series that may still hold missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseSeries {
    pub name: String,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl SparseSeries {
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Converts to a dense series, dropping dates that are still missing.
    pub fn into_dense(self) -> WeekdaySeries {
        let points = self
            .dates
            .into_iter()
            .zip(self.values)
            .filter_map(|(date, value)| value.map(|v| (date, v)));
        WeekdaySeries::from_sorted(self.name, points)
    }
}

/// Two series sharing one gap-free date index.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    pub primary: WeekdaySeries,
    pub secondary: WeekdaySeries,
    /// Secondary dates that had to be filled during alignment.
    pub imputed: usize,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        self.primary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        self.primary.dates()
    }
}

/// How gaps in the secondary series are filled on load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputePolicy {
    /// Carry forward, then backward-fill leading gaps.
    #[default]
    ForwardFill,
    /// Linear interpolation between observed neighbours.
    Interpolate,
    /// Mean of all observed values.
    Mean,
}

/// How the two series are put onto a common date index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignPolicy {
    #[default]
    KeepAllPrimary,
    Intersection,
}

/// Decimal and grouping convention of a numeric column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberFormat {
    /// `1,234.56`
    #[default]
    Plain,
    /// `1.234,56`
    DecimalComma,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing column '{0}'")]
    MissingColumn(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ParserError {
    #[error("unparseable date '{0}'")]
    InvalidDate(String),
    #[error("unparseable number '{0}'")]
    InvalidNumber(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum AlignError {
    #[error("series '{0}' has no observed values")]
    EmptySeries(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Align(#[from] AlignError),
}

#[derive(Debug, Error, PartialEq)]
pub enum IndicatorError {
    #[error("log return undefined for non-positive value {value} at position {index}")]
    NonPositive { index: usize, value: f64 },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FitError {
    #[error("estimation did not converge: {0}")]
    NonConvergence(String),
    #[error("not enough observations: need {needed}, have {have}")]
    TooShort { needed: usize, have: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum SelectionError {
    #[error("no candidate model converged for {0}")]
    NoConvergence(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExamError {
    #[error("io error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("no question directories matching Q{0}-* under {1}")]
    NoQuestions(u32, String),
}
