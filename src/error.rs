use crate::types::TimeSeriesKey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetch failed for {key}: {message}")]
    Fetch { key: TimeSeriesKey, message: String },

    #[error("Unexpected payload for {key}: {message}")]
    DataFormat { key: TimeSeriesKey, message: String },

    #[error("No observations left for {key} after filtering")]
    EmptySeries { key: TimeSeriesKey },

    #[error("Series {key} is not available")]
    Unavailable { key: TimeSeriesKey },

    #[error("Fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SeriesError {
    pub fn data_format(key: TimeSeriesKey, message: impl Into<String>) -> Self {
        SeriesError::DataFormat {
            key,
            message: message.into(),
        }
    }

    /// The series this error is about, when it concerns a single one
    pub fn key(&self) -> Option<TimeSeriesKey> {
        match self {
            SeriesError::Fetch { key, .. }
            | SeriesError::DataFormat { key, .. }
            | SeriesError::EmptySeries { key }
            | SeriesError::Unavailable { key } => Some(*key),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SeriesError>;
