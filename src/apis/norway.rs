use super::{build_url, PayloadFormat, SeriesApi, SeriesEndpoint};
use crate::config::NorwayConfig;
use crate::error::{Result, SeriesError};
use crate::types::{Country, IndexKind, TimeSeriesKey};

/// Norges Bank: SDMX exchange rates and the CPI table
pub struct NorwayApi {
    config: NorwayConfig,
}

impl NorwayApi {
    pub fn new(config: NorwayConfig) -> Self {
        Self { config }
    }
}

impl SeriesApi for NorwayApi {
    fn endpoint(&self, index_kind: IndexKind) -> Result<SeriesEndpoint> {
        let key = TimeSeriesKey::new(index_kind, Country::Norway);
        match index_kind {
            IndexKind::Currency => {
                let path = format!("data/EXR/{}", self.config.currency_series);
                let url = build_url(
                    &self.config.base_url,
                    &path,
                    &[
                        ("format", "sdmx-json"),
                        ("startPeriod", &self.config.start_period),
                        ("endPeriod", &self.config.end_period),
                    ],
                )?;
                Ok(SeriesEndpoint {
                    key,
                    url,
                    format: PayloadFormat::Json,
                })
            }
            IndexKind::Cpi => {
                let url = reqwest::Url::parse(&self.config.cpi_csv_url).map_err(|e| {
                    SeriesError::Config(format!("Invalid URL '{}': {}", self.config.cpi_csv_url, e))
                })?;
                Ok(SeriesEndpoint {
                    key,
                    url: url.to_string(),
                    format: PayloadFormat::Csv,
                })
            }
        }
    }
}
