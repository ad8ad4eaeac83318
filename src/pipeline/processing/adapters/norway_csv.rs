use chrono::NaiveDate;
use tracing::debug;

use super::{parse_text_value, text_payload, SchemaAdapter};
use crate::constants::CPI_CSV_HEADER_LINES;
use crate::error::{Result, SeriesError};
use crate::types::{ObservationPoint, RawPayload, TimeSeriesKey};

/// Adapter for the Norges Bank CPI table.
///
/// Three header lines, then one `Mon.YY,value` row per month. Each row is
/// dated on the first day of its month.
pub struct NorwayCpiCsvAdapter;

impl NorwayCpiCsvAdapter {
    /// `Jan.22` -> 2022-01-01
    pub fn parse_month_year(key: &TimeSeriesKey, period: &str) -> Result<NaiveDate> {
        let period = period.trim().trim_matches('"');
        NaiveDate::parse_from_str(&format!("1.{}", period), "%d.%b.%y").map_err(|e| {
            SeriesError::data_format(*key, format!("invalid month-year '{}': {}", period, e))
        })
    }
}

impl SchemaAdapter for NorwayCpiCsvAdapter {
    fn adapt(&self, key: &TimeSeriesKey, raw: &RawPayload) -> Result<Vec<ObservationPoint>> {
        let text = text_payload(key, raw)?;

        let points = text
            .lines()
            .enumerate()
            .skip(CPI_CSV_HEADER_LINES)
            .map(|(n, line)| (n + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty())
            .map(|(line_no, line)| {
                let (period, rest) = line.split_once(',').ok_or_else(|| {
                    SeriesError::data_format(*key, format!("line {}: expected 'month-year,value'", line_no))
                })?;
                let date = Self::parse_month_year(key, period)?;
                let value = parse_text_value(key, rest.split(',').next().unwrap_or(""))?;
                Ok(ObservationPoint::new(date, value))
            })
            .collect::<Result<Vec<_>>>()?;

        debug!("{}: parsed {} rows for {}", self.name(), points.len(), key);
        Ok(points)
    }

    fn name(&self) -> &str {
        "Norway CPI table adapter"
    }
}
