use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which economic indicator a series measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    Currency,
    Cpi,
}

impl IndexKind {
    pub const ALL: [IndexKind; 2] = [IndexKind::Currency, IndexKind::Cpi];

    /// Name of the value column in a normalized table
    pub fn column_name(&self) -> &'static str {
        match self {
            IndexKind::Currency => "Currency",
            IndexKind::Cpi => "CPI",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexKind::Currency => "currency",
            IndexKind::Cpi => "cpi",
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Country {
    Argentina,
    Norway,
}

impl Country {
    pub const ALL: [Country; 2] = [Country::Argentina, Country::Norway];

    pub fn as_str(&self) -> &'static str {
        match self {
            Country::Argentina => "argentina",
            Country::Norway => "norway",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Country::Argentina => "Argentina",
            Country::Norway => "Norway",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one logical series: an indicator for a country
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSeriesKey {
    pub index_kind: IndexKind,
    pub country: Country,
}

impl TimeSeriesKey {
    pub fn new(index_kind: IndexKind, country: Country) -> Self {
        Self { index_kind, country }
    }

    /// Every key the dashboard knows about, in display order
    pub fn all() -> Vec<TimeSeriesKey> {
        IndexKind::ALL
            .iter()
            .flat_map(|kind| Country::ALL.iter().map(move |country| TimeSeriesKey::new(*kind, *country)))
            .collect()
    }
}

impl fmt::Display for TimeSeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.country, self.index_kind)
    }
}

/// Raw payload as returned by a statistics API, before any schema handling
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    Json(serde_json::Value),
    Text(String),
}

impl RawPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            RawPayload::Json(_) => "json",
            RawPayload::Text(_) => "text",
        }
    }
}

/// A single dated observation. `value` is `None` when the source reports no figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObservationPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl ObservationPoint {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// A point of a normalized series; the value is always present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Uniform table for one series: a date column and one named value column.
///
/// Points are sorted ascending by date with no duplicate dates. Built by
/// [`crate::pipeline::processing::normalize::Normalizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    pub key: TimeSeriesKey,
    pub column: String,
    pub points: Vec<SeriesPoint>,
    /// Set once the CPI scale policy has been applied to the values
    pub scaled: bool,
}

impl NormalizedSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Smallest and largest value, `None` for an empty series
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.points.iter().fold(None, |acc, p| match acc {
            None => Some((p.value, p.value)),
            Some((lo, hi)) => Some((lo.min(p.value), hi.max(p.value))),
        })
    }
}

/// Rendering hint passed alongside a normalized series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderHint {
    pub is_currency_like: bool,
}

impl RenderHint {
    pub fn for_kind(kind: IndexKind) -> Self {
        Self {
            is_currency_like: kind == IndexKind::Currency,
        }
    }
}
