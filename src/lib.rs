pub mod apis;
pub mod chart;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod types;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

pub use chart::{ChartRenderer, Figure, LineChartRenderer};
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{Result, SeriesError};
pub use pipeline::processing::adapters::{AdapterRegistry, SchemaAdapter};
pub use pipeline::processing::normalize::{CpiScale, NormalizeInput, Normalizer};
pub use pipeline::{Pipeline, PipelineResult};
pub use types::{Country, IndexKind, NormalizedSeries, ObservationPoint, RawPayload, TimeSeriesKey};
