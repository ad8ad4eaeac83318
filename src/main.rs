use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use macro_series::apis::{decode_payload, endpoint_for};
use macro_series::infra::ReqwestHttp;
use macro_series::logging;
use macro_series::{AdapterRegistry, Config, Country, IndexKind, Normalizer, Pipeline, TimeSeriesKey};

#[derive(Parser)]
#[command(name = "macro_series")]
#[command(about = "Currency and CPI series for Argentina and Norway")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to a config file (defaults to $MACRO_SERIES_CONFIG, then config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every enabled series, normalize, render and write the dashboard JSON
    Run {
        /// Directory for dashboard.json (overrides output_dir from config)
        #[arg(long)]
        output_dir: Option<String>,
    },
    /// Adapt and normalize a payload saved on disk, printing the series as JSON
    Normalize {
        #[arg(long, value_enum)]
        country: Country,
        #[arg(long, value_enum)]
        index: IndexKind,
        /// Raw API response (JSON, or CSV for the Norway CPI table)
        #[arg(long)]
        input: PathBuf,
        /// Drop observations before this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,
    },
    /// List the series and the URLs they are fetched from
    Sources,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::Run { output_dir } => {
            if let Some(dir) = output_dir {
                config.output_dir = dir;
            }
            let http = Arc::new(ReqwestHttp::new(config.timeout())?);
            let pipeline = Pipeline::new(config.clone(), http);

            let result = match pipeline.run().await {
                Ok(result) => result,
                Err(e) => {
                    error!("Pipeline failed: {}", e);
                    return Err(e.into());
                }
            };
            let path = result.write_dashboard(&config.output_dir)?;

            println!("📊 Series:");
            for series in &result.series {
                println!(
                    "   {:<20} {:>4} points  {} .. {}",
                    series.key.to_string(),
                    series.len(),
                    series.first_date().map(|d| d.to_string()).unwrap_or_default(),
                    series.last_date().map(|d| d.to_string()).unwrap_or_default(),
                );
            }
            println!("   Output file: {}", path.display());
        }
        Commands::Normalize {
            country,
            index,
            input,
            since,
        } => {
            let key = TimeSeriesKey::new(index, country);
            if let Some(since) = since {
                config.since = since;
            }
            let bytes = std::fs::read(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let endpoint = endpoint_for(&key, &config)?;
            let raw = decode_payload(key, endpoint.format, &bytes)?;

            let points = AdapterRegistry::new().adapt(&key, &raw)?;
            let series = Normalizer::new(config.cpi_scale_for(country)).normalize(key, &points, config.since)?;
            info!("Normalized {} into {} points", key, series.len());
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        Commands::Sources => {
            for key in TimeSeriesKey::all() {
                let endpoint = endpoint_for(&key, &config)?;
                let state = if config.is_enabled(&key) { "" } else { " (disabled)" };
                println!("{:<20} {}{}", key.to_string(), endpoint.url, state);
            }
        }
    }
    Ok(())
}
