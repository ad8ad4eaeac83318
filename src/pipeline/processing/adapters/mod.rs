// Schema adapters: source-specific payloads into ordered (date, value) pairs

pub mod argentina;
pub mod norway_csv;
pub mod norway_sdmx;
pub mod registry;

pub use argentina::ArgentinaAdapter;
pub use norway_csv::NorwayCpiCsvAdapter;
pub use norway_sdmx::NorwaySdmxAdapter;
pub use registry::AdapterRegistry;

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::{Result, SeriesError};
use crate::types::{ObservationPoint, RawPayload, TimeSeriesKey};

/// Converts one source's raw payload into observation points.
///
/// Implementations never substitute defaults: a missing key or an unparsable
/// field is a [`SeriesError::DataFormat`] naming the series.
pub trait SchemaAdapter: Send + Sync {
    fn adapt(&self, key: &TimeSeriesKey, raw: &RawPayload) -> Result<Vec<ObservationPoint>>;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

pub(crate) fn json_payload<'a>(key: &TimeSeriesKey, raw: &'a RawPayload) -> Result<&'a Value> {
    match raw {
        RawPayload::Json(value) => Ok(value),
        other => Err(SeriesError::data_format(
            *key,
            format!("expected a JSON payload, got {}", other.kind()),
        )),
    }
}

pub(crate) fn text_payload<'a>(key: &TimeSeriesKey, raw: &'a RawPayload) -> Result<&'a str> {
    match raw {
        RawPayload::Text(text) => Ok(text),
        other => Err(SeriesError::data_format(
            *key,
            format!("expected a text payload, got {}", other.kind()),
        )),
    }
}

pub(crate) fn parse_iso_date(key: &TimeSeriesKey, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| SeriesError::data_format(*key, format!("invalid date '{}': {}", raw, e)))
}

/// A JSON cell holding a number, a numeric string, or null
pub(crate) fn parse_json_value(key: &TimeSeriesKey, cell: &Value) -> Result<Option<f64>> {
    match cell {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| SeriesError::data_format(*key, format!("number out of range: {}", n))),
        Value::String(s) => parse_text_value(key, s),
        other => Err(SeriesError::data_format(
            *key,
            format!("expected a number or null, got {}", other),
        )),
    }
}

/// A text cell; empty means no observation
pub(crate) fn parse_text_value(key: &TimeSeriesKey, cell: &str) -> Result<Option<f64>> {
    let cell = cell.trim().trim_matches('"').trim();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>()
        .map(Some)
        .map_err(|e| SeriesError::data_format(*key, format!("invalid number '{}': {}", cell, e)))
}
