use serde_json::Value;
use tracing::debug;

use super::{json_payload, parse_iso_date, parse_json_value, SchemaAdapter};
use crate::constants::SDMX_SERIES_KEY;
use crate::error::{Result, SeriesError};
use crate::types::{ObservationPoint, RawPayload, TimeSeriesKey};

/// Adapter for Norges Bank SDMX-JSON exchange rates.
///
/// Dates live in `structure.dimensions.observation[0].values[*].name` and
/// values in `dataSets[0].series["0:0:0:0"].observations`, keyed by the
/// position of the matching date. The two arrays are joined on that position;
/// counts must agree and every key must point at an existing date.
pub struct NorwaySdmxAdapter;

impl NorwaySdmxAdapter {
    /// The API wraps the SDMX message in a top-level `data` object
    fn message(payload: &Value) -> &Value {
        match payload.get("data") {
            Some(inner) if inner.get("dataSets").is_some() => inner,
            _ => payload,
        }
    }

    fn dates<'a>(key: &TimeSeriesKey, message: &'a Value) -> Result<Vec<&'a str>> {
        let values = message
            .get("structure")
            .and_then(|s| s.get("dimensions"))
            .and_then(|d| d.get("observation"))
            .and_then(|o| o.get(0))
            .and_then(|o| o.get("values"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                SeriesError::data_format(*key, "missing structure.dimensions.observation[0].values")
            })?;

        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                v.get("name")
                    .or_else(|| v.get("id"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| SeriesError::data_format(*key, format!("observation value {} has no name", i)))
            })
            .collect()
    }

    fn observations<'a>(key: &TimeSeriesKey, message: &'a Value) -> Result<&'a serde_json::Map<String, Value>> {
        message
            .get("dataSets")
            .and_then(|d| d.get(0))
            .and_then(|d| d.get("series"))
            .and_then(|s| s.get(SDMX_SERIES_KEY))
            .and_then(|s| s.get("observations"))
            .and_then(Value::as_object)
            .ok_or_else(|| {
                SeriesError::data_format(
                    *key,
                    format!("missing dataSets[0].series[\"{}\"].observations", SDMX_SERIES_KEY),
                )
            })
    }
}

impl SchemaAdapter for NorwaySdmxAdapter {
    fn adapt(&self, key: &TimeSeriesKey, raw: &RawPayload) -> Result<Vec<ObservationPoint>> {
        let message = Self::message(json_payload(key, raw)?);
        let dates = Self::dates(key, message)?;
        let observations = Self::observations(key, message)?;

        if dates.len() != observations.len() {
            return Err(SeriesError::data_format(
                *key,
                format!(
                    "{} dates but {} observations; cannot join by position",
                    dates.len(),
                    observations.len()
                ),
            ));
        }

        // Object keys are not in positional order ("10" sorts before "2"), so place by index
        let mut values: Vec<Option<Option<f64>>> = vec![None; dates.len()];
        for (position, cells) in observations {
            let index: usize = position
                .parse()
                .map_err(|_| SeriesError::data_format(*key, format!("observation key '{}' is not an index", position)))?;
            let slot = values.get_mut(index).ok_or_else(|| {
                SeriesError::data_format(
                    *key,
                    format!("observation key {} is out of range for {} dates", index, dates.len()),
                )
            })?;
            let first = cells
                .as_array()
                .and_then(|cells| cells.first())
                .ok_or_else(|| SeriesError::data_format(*key, format!("observation {} has no value", index)))?;
            *slot = Some(parse_json_value(key, first)?);
        }

        let points = dates
            .iter()
            .zip(values)
            .enumerate()
            .map(|(i, (date, value))| {
                let value = value
                    .ok_or_else(|| SeriesError::data_format(*key, format!("no observation for date {}", i)))?;
                Ok(ObservationPoint::new(parse_iso_date(key, date)?, value))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("{}: joined {} observations for {}", self.name(), points.len(), key);
        Ok(points)
    }

    fn name(&self) -> &str {
        "Norway SDMX adapter"
    }
}
