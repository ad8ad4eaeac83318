use super::{build_url, PayloadFormat, SeriesApi, SeriesEndpoint};
use crate::config::ArgentinaConfig;
use crate::constants::{ARGENTINA_CPI_REPRESENTATION, ARGENTINA_CURRENCY_START};
use crate::error::Result;
use crate::types::{Country, IndexKind, TimeSeriesKey};

/// datos.gob.ar time series API
pub struct ArgentinaApi {
    config: ArgentinaConfig,
}

impl ArgentinaApi {
    pub fn new(config: ArgentinaConfig) -> Self {
        Self { config }
    }

    fn series_id(&self, index_kind: IndexKind) -> &str {
        match index_kind {
            IndexKind::Currency => &self.config.currency_id,
            IndexKind::Cpi => &self.config.cpi_id,
        }
    }
}

impl SeriesApi for ArgentinaApi {
    fn endpoint(&self, index_kind: IndexKind) -> Result<SeriesEndpoint> {
        let ids = self.series_id(index_kind);
        // CPI is requested as year-over-year change, currency from the start of 2022
        let extra = match index_kind {
            IndexKind::Currency => ("start_date", ARGENTINA_CURRENCY_START),
            IndexKind::Cpi => ("representation_mode", ARGENTINA_CPI_REPRESENTATION),
        };
        let url = build_url(
            &self.config.base_url,
            "series",
            &[("ids", ids), ("format", "json"), extra],
        )?;

        Ok(SeriesEndpoint {
            key: TimeSeriesKey::new(index_kind, Country::Argentina),
            url,
            format: PayloadFormat::Json,
        })
    }
}
