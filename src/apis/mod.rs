//! Endpoint catalog: where each series is fetched from and in which format.

pub mod argentina;
pub mod norway;

use crate::config::Config;
use crate::error::{Result, SeriesError};
use crate::types::{Country, IndexKind, RawPayload, TimeSeriesKey};
use serde::Serialize;

pub use argentina::ArgentinaApi;
pub use norway::NorwayApi;

/// Body format returned by an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadFormat {
    Json,
    Csv,
}

/// A resolved request for one series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesEndpoint {
    pub key: TimeSeriesKey,
    pub url: String,
    pub format: PayloadFormat,
}

/// One statistics API serving the series of a single country
pub trait SeriesApi: Send + Sync {
    /// Build the request for an indicator
    fn endpoint(&self, index_kind: IndexKind) -> Result<SeriesEndpoint>;
}

pub fn create_api(country: Country, config: &Config) -> Box<dyn SeriesApi> {
    match country {
        Country::Argentina => Box::new(ArgentinaApi::new(config.argentina.clone())),
        Country::Norway => Box::new(NorwayApi::new(config.norway.clone())),
    }
}

pub fn endpoint_for(key: &TimeSeriesKey, config: &Config) -> Result<SeriesEndpoint> {
    create_api(key.country, config).endpoint(key.index_kind)
}

/// Turn a response body into a payload of the declared format
pub fn decode_payload(key: TimeSeriesKey, format: PayloadFormat, bytes: &[u8]) -> Result<RawPayload> {
    match format {
        PayloadFormat::Json => {
            let value: serde_json::Value = serde_json::from_slice(bytes)
                .map_err(|e| SeriesError::data_format(key, format!("body is not JSON: {}", e)))?;
            Ok(RawPayload::Json(value))
        }
        PayloadFormat::Csv => {
            let text = String::from_utf8(bytes.to_vec())
                .map_err(|e| SeriesError::data_format(key, format!("body is not UTF-8: {}", e)))?;
            Ok(RawPayload::Text(text))
        }
    }
}

pub(crate) fn build_url(base: &str, path: &str, params: &[(&str, &str)]) -> Result<String> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    let url = reqwest::Url::parse_with_params(&joined, params)
        .map_err(|e| SeriesError::Config(format!("Invalid URL '{}': {}", joined, e)))?;
    Ok(url.to_string())
}
