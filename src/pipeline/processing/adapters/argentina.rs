use serde_json::Value;
use tracing::debug;

use super::{json_payload, parse_iso_date, parse_json_value, SchemaAdapter};
use crate::error::{Result, SeriesError};
use crate::types::{ObservationPoint, RawPayload, TimeSeriesKey};

/// Adapter for the datos.gob.ar series API.
///
/// The payload carries a `data` array of `[date, value_or_null]` rows, already
/// in ascending date order; rows are passed through in source order.
pub struct ArgentinaAdapter;

impl SchemaAdapter for ArgentinaAdapter {
    fn adapt(&self, key: &TimeSeriesKey, raw: &RawPayload) -> Result<Vec<ObservationPoint>> {
        let payload = json_payload(key, raw)?;
        let rows = payload
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| SeriesError::data_format(*key, "missing 'data' array"))?;

        let points = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let cells = row
                    .as_array()
                    .filter(|cells| cells.len() >= 2)
                    .ok_or_else(|| SeriesError::data_format(*key, format!("data[{}] is not a [date, value] pair", i)))?;
                let date_str = cells[0]
                    .as_str()
                    .ok_or_else(|| SeriesError::data_format(*key, format!("data[{}][0] is not a date string", i)))?;
                let date = parse_iso_date(key, date_str)?;
                let value = parse_json_value(key, &cells[1])?;
                Ok(ObservationPoint::new(date, value))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("{}: adapted {} rows for {}", self.name(), points.len(), key);
        Ok(points)
    }

    fn name(&self) -> &str {
        "Argentina series adapter"
    }
}
