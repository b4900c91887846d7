//! CLI entry point for thermostat savings summary statistics.
//!
//! Provides subcommands for summarising season metrics overall, by a custom
//! zipcode grouping, by zipcode, and by weather station.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use thermostat_stats::infra::reference::JsonReferenceIndex;
use thermostat_stats::output::{summary_statistics_to_csv, write_json};
use thermostat_stats::parser::read_all_seasons;
use thermostat_stats::schema::{ErrorMetric, Method};
use thermostat_stats::{
    GroupMapping, Summary, SummaryConfig, compute_summary_statistics,
    compute_summary_statistics_by_group, compute_summary_statistics_by_weather_station,
    compute_summary_statistics_by_zipcode,
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "thermostat_stats")]
#[command(about = "Summary statistics for per-season thermostat savings metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Input, output, and filtering options shared by every subcommand.
#[derive(Args)]
struct RunArgs {
    /// Season metric CSV file(s); several files are combined (.gz accepted)
    #[arg(short, long = "input", value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// CSV file to write summary statistics to (.gz to compress)
    #[arg(short, long, default_value = "stats.csv")]
    output: PathBuf,

    /// Optional JSON report path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Method used for filtering and statistical power: dailyavg, hourlyavg, or deltaT
    #[arg(long, default_value = "dailyavg")]
    method: Method,

    /// Error metric for the fit-quality rule: MSE, RMSE, CVRMSE, MAE, or MAPE
    #[arg(long, default_value = "CVRMSE")]
    error_metric: ErrorMetric,

    /// Seasons whose error metric is not below this are discarded
    #[arg(long, default_value_t = f64::INFINITY)]
    max_error: f64,

    /// Confidence level for the statistical power estimate
    #[arg(long, default_value_t = 0.95)]
    confidence: f64,

    /// Target confidence interval half-width as a fraction of the mean
    #[arg(long, default_value_t = 0.05)]
    ratio: f64,
}

impl RunArgs {
    fn config(&self) -> SummaryConfig {
        SummaryConfig {
            method: self.method,
            error_metric: self.error_metric,
            max_error: self.max_error,
            confidence: self.confidence,
            ratio: self.ratio,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise all seasons together
    Summarize {
        #[command(flatten)]
        run: RunArgs,

        /// Label prefix for the output rows
        #[arg(short, long, default_value = "all")]
        label: String,
    },
    /// Summarise by a zipcode -> group mapping
    ByGroup {
        #[command(flatten)]
        run: RunArgs,

        /// CSV file with `zipcode` and `group` columns
        #[arg(short, long)]
        group_file: Option<PathBuf>,

        /// Suffix appended to every group label
        #[arg(long)]
        group_label: Option<String>,
    },
    /// Summarise per zipcode, over every zipcode in the reference index
    ByZipcode {
        #[command(flatten)]
        run: RunArgs,

        /// JSON zipcode -> [lat, lng] index (defaults to $ZIPCODE_LAT_LNG_INDEX)
        #[arg(long)]
        zipcode_index: Option<PathBuf>,
    },
    /// Summarise per weather station
    ByStation {
        #[command(flatten)]
        run: RunArgs,

        /// JSON zipcode -> station index (defaults to $ZIPCODE_STATION_INDEX)
        #[arg(long)]
        station_index: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/thermostat_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("thermostat_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Summarize { run, label } => {
            execute(&run, |table, config| {
                Ok(compute_summary_statistics(table, &label, config)?)
            })?;
        }
        Commands::ByGroup {
            run,
            group_file,
            group_label,
        } => {
            let mut mapping = GroupMapping::resolve(group_file.as_deref(), None)?;
            if let Some(group_label) = group_label {
                mapping = mapping.with_label(group_label);
            }
            info!(zipcodes = mapping.len(), "Group mapping loaded");

            execute(&run, |table, config| {
                Ok(compute_summary_statistics_by_group(table, &mapping, config)?)
            })?;
        }
        Commands::ByZipcode { run, zipcode_index } => {
            let mut index = JsonReferenceIndex::from_env();
            if let Some(path) = zipcode_index {
                index = index.with_lat_lng_index(path);
            }

            execute(&run, |table, config| {
                Ok(compute_summary_statistics_by_zipcode(table, &index, config)?)
            })?;
        }
        Commands::ByStation { run, station_index } => {
            let mut index = JsonReferenceIndex::from_env();
            if let Some(path) = station_index {
                index = index.with_station_index(path);
            }

            execute(&run, |table, config| {
                Ok(compute_summary_statistics_by_weather_station(table, &index, config)?)
            })?;
        }
    }

    Ok(())
}

/// Loads the inputs, runs `summarise`, and writes the outputs.
#[tracing::instrument(skip_all, fields(inputs = run.inputs.len(), output = %run.output.display()))]
fn execute<F>(run: &RunArgs, summarise: F) -> Result<()>
where
    F: FnOnce(&thermostat_stats::SeasonTable, &SummaryConfig) -> Result<Summary>,
{
    let config = run.config();
    config.validate()?;
    info!(method = %config.method, error_metric = %config.error_metric, "Summary config");

    let table = read_all_seasons(&run.inputs).context("Failed to load season records")?;
    info!(rows = table.len(), "Season records loaded");

    let summary = summarise(&table, &config)?;

    summary_statistics_to_csv(&summary.records, &run.output)
        .with_context(|| format!("Failed to write {}", run.output.display()))?;

    if let Some(json) = &run.json {
        write_json(&summary.records, &config, json)
            .with_context(|| format!("Failed to write {}", json.display()))?;
    }

    info!(
        records = summary.records.len(),
        omitted = summary.warnings.len(),
        "Finished summary statistics"
    );
    Ok(())
}
