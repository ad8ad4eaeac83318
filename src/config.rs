use crate::constants::*;
use crate::error::{Result, SeriesError};
use crate::pipeline::processing::normalize::CpiScale;
use crate::types::{Country, IndexKind, TimeSeriesKey};
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Observations dated before this day are dropped
    pub since: NaiveDate,
    pub timeout_seconds: u64,
    pub output_dir: String,
    pub features: FeatureFlags,
    pub argentina: ArgentinaConfig,
    pub norway: NorwayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub norway_cpi: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ArgentinaConfig {
    pub base_url: String,
    pub currency_id: String,
    pub cpi_id: String,
    /// The API reports CPI change as a fraction
    pub cpi_scale: CpiScale,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NorwayConfig {
    pub base_url: String,
    pub currency_series: String,
    pub start_period: String,
    pub end_period: String,
    pub cpi_csv_url: String,
    /// The CPI table is already in percent
    pub cpi_scale: CpiScale,
}

impl Default for Config {
    fn default() -> Self {
        let (y, m, d) = DEFAULT_SINCE;
        Self {
            since: NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            features: FeatureFlags::default(),
            argentina: ArgentinaConfig::default(),
            norway: NorwayConfig::default(),
        }
    }
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self { norway_cpi: true }
    }
}

impl Default for ArgentinaConfig {
    fn default() -> Self {
        Self {
            base_url: ARGENTINA_BASE_URL.to_string(),
            currency_id: ARGENTINA_CURRENCY_ID.to_string(),
            cpi_id: ARGENTINA_CPI_ID.to_string(),
            cpi_scale: CpiScale::PercentFromFraction,
        }
    }
}

impl Default for NorwayConfig {
    fn default() -> Self {
        Self {
            base_url: NORWAY_BASE_URL.to_string(),
            currency_series: NORWAY_CURRENCY_SERIES.to_string(),
            start_period: NORWAY_START_PERIOD.to_string(),
            end_period: NORWAY_END_PERIOD.to_string(),
            cpi_csv_url: NORWAY_CPI_CSV_URL.to_string(),
            cpi_scale: CpiScale::AsIs,
        }
    }
}

impl Config {
    /// Load from `$MACRO_SERIES_CONFIG` or `config.toml`; built-in defaults when neither exists.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_path(path.trim()),
            _ => {
                if Path::new(DEFAULT_CONFIG_PATH).exists() {
                    Self::from_path(DEFAULT_CONFIG_PATH)
                } else {
                    debug!("No {} found, using built-in configuration", DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_content = fs::read_to_string(path).map_err(|e| {
            SeriesError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let config = Self::from_toml(&config_content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.timeout_seconds == 0 {
            return Err(SeriesError::Config("timeout_seconds must be positive".into()));
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Whether a series is fetched and shown at all
    pub fn is_enabled(&self, key: &TimeSeriesKey) -> bool {
        match (key.country, key.index_kind) {
            (Country::Norway, IndexKind::Cpi) => self.features.norway_cpi,
            _ => true,
        }
    }

    pub fn enabled_keys(&self) -> Vec<TimeSeriesKey> {
        TimeSeriesKey::all()
            .into_iter()
            .filter(|key| self.is_enabled(key))
            .collect()
    }

    /// CPI scale policy for a given source
    pub fn cpi_scale_for(&self, country: Country) -> CpiScale {
        match country {
            Country::Argentina => self.argentina.cpi_scale,
            Country::Norway => self.norway.cpi_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.since, NaiveDate::from_ymd_opt(2022, 1, 1).unwrap());
        assert_eq!(config.timeout_seconds, DEFAULT_TIMEOUT_SECONDS);
        assert!(config.features.norway_cpi);
        assert_eq!(config.enabled_keys().len(), 4);
        assert_eq!(config.cpi_scale_for(Country::Argentina), CpiScale::PercentFromFraction);
        assert_eq!(config.cpi_scale_for(Country::Norway), CpiScale::AsIs);
    }

    #[test]
    fn test_feature_flag_disables_norway_cpi() {
        let config = Config::from_toml("[features]\nnorway_cpi = false\n").unwrap();
        let norway_cpi = TimeSeriesKey::new(IndexKind::Cpi, Country::Norway);
        assert!(!config.is_enabled(&norway_cpi));
        assert_eq!(config.enabled_keys().len(), 3);
    }

    #[test]
    fn test_overrides_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "since = \"2023-06-01\"\ntimeout_seconds = 5\n\n[argentina]\ncurrency_id = \"custom\"\ncpi_scale = \"as_is\""
        )
        .unwrap();

        let config = Config::from_path(file.path()).unwrap();
        assert_eq!(config.since, NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.cpi_scale_for(Country::Argentina), CpiScale::AsIs);
        assert_eq!(config.cpi_scale_for(Country::Norway), CpiScale::AsIs);
        assert_eq!(config.argentina.currency_id, "custom");
        assert_eq!(config.argentina.cpi_id, ARGENTINA_CPI_ID);
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = Config::from_toml("timeout_seconds = 0");
        assert!(matches!(result, Err(SeriesError::Config(_))));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = Config::from_path("/definitely/not/here.toml");
        assert!(matches!(result, Err(SeriesError::Config(_))));
    }
}
