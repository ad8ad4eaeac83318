// Fetch -> adapt -> normalize -> render, for every enabled series

pub mod processing;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument};

use crate::apis::{endpoint_for, SeriesEndpoint};
use crate::app::fetch_use_case::FetchUseCase;
use crate::app::ports::HttpClientPort;
use crate::chart::{ChartRenderer, LineChartRenderer};
use crate::config::Config;
use crate::constants::DASHBOARD_FILE;
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::types::{NormalizedSeries, RawPayload, RenderHint, TimeSeriesKey};
use processing::adapters::AdapterRegistry;
use processing::normalize::Normalizer;

/// Result of a complete pipeline run
pub struct PipelineResult {
    pub series: Vec<NormalizedSeries>,
    pub dashboard: Dashboard,
    pub duration_secs: f64,
}

impl PipelineResult {
    /// Write the dashboard JSON into `output_dir`
    pub fn write_dashboard(&self, output_dir: &str) -> Result<PathBuf> {
        let path = PathBuf::from(output_dir).join(DASHBOARD_FILE);
        self.dashboard.write_json(&path)?;
        Ok(path)
    }
}

pub struct Pipeline {
    config: Config,
    fetcher: FetchUseCase,
    adapters: AdapterRegistry,
    renderer: Box<dyn ChartRenderer>,
}

impl Pipeline {
    pub fn new(config: Config, http: Arc<dyn HttpClientPort>) -> Self {
        Self {
            config,
            fetcher: FetchUseCase::new(http),
            adapters: AdapterRegistry::new(),
            renderer: Box::new(LineChartRenderer::default()),
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn ChartRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Adapt and normalize one fetched payload
    pub fn process_payload(&self, key: TimeSeriesKey, raw: &RawPayload) -> Result<NormalizedSeries> {
        let points = self.adapters.adapt(&key, raw)?;
        let normalizer = Normalizer::new(self.config.cpi_scale_for(key.country));
        let series = normalizer.normalize(key, &points, self.config.since)?;
        debug!(
            "{}: {} observations -> {} points ({:?} .. {:?})",
            key,
            points.len(),
            series.len(),
            series.first_date(),
            series.last_date()
        );
        Ok(series)
    }

    pub fn endpoints(&self) -> Result<Vec<SeriesEndpoint>> {
        self.config
            .enabled_keys()
            .iter()
            .map(|key| endpoint_for(key, &self.config))
            .collect()
    }

    /// Fetch every enabled series concurrently; the first failure aborts the rest.
    #[instrument(skip(self))]
    pub async fn fetch_all(&self) -> Result<Vec<(TimeSeriesKey, RawPayload)>> {
        let mut tasks = JoinSet::new();
        for endpoint in self.endpoints()? {
            let fetcher = self.fetcher.clone();
            tasks.spawn(async move {
                let payload = fetcher.fetch(&endpoint).await?;
                Ok::<_, crate::error::SeriesError>((endpoint.key, payload))
            });
        }

        let mut payloads = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            // Returning drops the set, which aborts the remaining fetches
            let (key, payload) = joined??;
            info!("Fetched {} ({})", key, payload.kind());
            payloads.push((key, payload));
        }
        payloads.sort_by_key(|(key, _)| *key);
        Ok(payloads)
    }

    /// Run the complete pipeline and build the dashboard
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<PipelineResult> {
        let started = Instant::now();
        let payloads = self.fetch_all().await?;

        let mut series = Vec::with_capacity(payloads.len());
        let mut figures = HashMap::with_capacity(payloads.len());
        for (key, raw) in payloads {
            let normalized = self.process_payload(key, &raw)?;
            let figure = self
                .renderer
                .render(&normalized, RenderHint::for_kind(key.index_kind))?;
            figures.insert(key, figure);
            series.push(normalized);
        }

        let duration_secs = started.elapsed().as_secs_f64();
        info!("Pipeline finished: {} series in {:.2}s", series.len(), duration_secs);
        Ok(PipelineResult {
            series,
            dashboard: Dashboard::new(figures),
            duration_secs,
        })
    }
}
