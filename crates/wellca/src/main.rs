mod cache;
mod config;
mod metrics;
mod report;
mod storage;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use wellca_core::cache::{Cache, PolicyTable};
use wellca_core::record::DailyRecord;
use wellca_core::storage::RecordRepository;

use crate::{
    cache::MemoryCache,
    config::{Config, LogFormat},
    metrics::{MetricsReporter, TracingSink},
    report::ReportService,
    storage::InMemoryRepository,
};

/// Wellca - cached reports over daily pharmacy operations records
#[derive(Parser, Debug)]
#[command(name = "wellca")]
#[command(version, about, long_about = None)]
struct Cli {
    /// JSON array of daily records to load before running the command
    /// (overrides SEED_PATH)
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record for a single date
    Entry { date: NaiveDate },
    /// Records between two dates, inclusive
    Range { start: NaiveDate, end: NaiveDate },
    /// Averages and totals for the seven days starting at a date
    WeeklyStats { week_start: NaiveDate },
    /// Daily chart for a month
    MonthlyChart { year: i32, month: u32 },
    /// Monthly chart for a quarter (1-4)
    QuarterlyChart { year: i32, quarter: u32 },
    /// One page of the weekly chart
    WeeklyChart {
        start: NaiveDate,
        end: NaiveDate,
        /// 1-based page number
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Number of weekly chart pages for a date range
    WeeklyPages { start: NaiveDate, end: NaiveDate },
    /// Records with a given professional service type, newest first
    Services {
        service_type: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Service counts and revenue for a month
    ServiceStats { year: i32, month: u32 },
    /// Count and total cost per service type between two dates
    ServiceTypeStats { start: NaiveDate, end: NaiveDate },
    /// Deliveries per carrier for each recorded date of a month
    MonthlyDeliveries { year: i32, month: u32 },
    /// Save a record read from a JSON file, replacing any record for its date
    Save { file: PathBuf },
    /// Delete a record by ID
    Delete { id: Uuid },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();

    init_tracing(config.log_format);

    let repository = Arc::new(InMemoryRepository::new());
    let cache = Arc::new(MemoryCache::new(PolicyTable::standard()));
    let service = ReportService::new(repository, Arc::clone(&cache));

    let (shutdown_tx, _) = broadcast::channel(1);
    let reporter = MetricsReporter::new(
        Arc::clone(&cache),
        Arc::new(TracingSink),
        config.metrics_interval(),
    )
    .spawn(shutdown_tx.subscribe());

    tracing::info!(
        caches = cache.names().await.len(),
        metrics_interval_secs = config.metrics_interval_seconds,
        "Cache tier ready"
    );

    if let Some(path) = cli.seed.or(config.seed_path) {
        let count = load_seed(&service, &path).await?;
        tracing::info!(count, path = %path.display(), "Loaded seed records");
    }

    let result = run(&service, cli.command).await;

    // Final metrics round, then stop the reporter
    if shutdown_tx.send(()).is_err() {
        tracing::debug!("Metrics reporter already stopped");
    }
    reporter.await?;

    println!("{}", serde_json::to_string_pretty(&result?)?);
    Ok(())
}

/// Installs the tracing subscriber. Logs go to stderr so stdout stays JSON.
fn init_tracing(format: LogFormat) {
    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "wellca=info".into()),
    );

    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

/// Saves every record of a JSON seed file through the write path.
async fn load_seed<R, C>(service: &ReportService<R, C>, path: &Path) -> Result<usize>
where
    R: RecordRepository,
    C: Cache,
{
    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let records: Vec<DailyRecord> = serde_json::from_str(&contents)
        .with_context(|| format!("Invalid seed file {}", path.display()))?;

    let count = records.len();
    for record in records {
        let date = record.date;
        service
            .save(record)
            .await
            .with_context(|| format!("Failed to seed record for {}", date))?;
    }
    Ok(count)
}

/// Runs one command and returns its output as JSON.
async fn run<R, C>(service: &ReportService<R, C>, command: Command) -> Result<serde_json::Value>
where
    R: RecordRepository,
    C: Cache,
{
    let output = match command {
        Command::Entry { date } => serde_json::to_value(service.entry_by_date(date).await?)?,
        Command::Range { start, end } => {
            serde_json::to_value(service.entries_in_range(start, end).await?)?
        }
        Command::WeeklyStats { week_start } => {
            serde_json::to_value(service.weekly_stats(week_start).await?)?
        }
        Command::MonthlyChart { year, month } => {
            serde_json::to_value(service.monthly_chart(year, month).await?)?
        }
        Command::QuarterlyChart { year, quarter } => {
            serde_json::to_value(service.quarterly_chart(year, quarter).await?)?
        }
        Command::WeeklyChart { start, end, page } => {
            serde_json::to_value(service.weekly_chart_page(start, end, page).await?)?
        }
        Command::WeeklyPages { start, end } => {
            serde_json::to_value(service.total_weekly_pages(start, end)?)?
        }
        Command::Services {
            service_type,
            start,
            end,
        } => serde_json::to_value(service.service_details(&service_type, start, end).await?)?,
        Command::ServiceStats { year, month } => {
            serde_json::to_value(service.monthly_service_stats(year, month).await?)?
        }
        Command::ServiceTypeStats { start, end } => {
            serde_json::to_value(service.service_type_stats(start, end).await?)?
        }
        Command::MonthlyDeliveries { year, month } => {
            serde_json::to_value(service.monthly_delivery_counts(year, month).await?)?
        }
        Command::Save { file } => {
            let contents = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let record: DailyRecord = serde_json::from_str(&contents)
                .with_context(|| format!("Invalid record in {}", file.display()))?;
            serde_json::to_value(service.save(record).await?)?
        }
        Command::Delete { id } => {
            service.delete(id).await?;
            serde_json::json!({ "deleted": id })
        }
    };

    Ok(output)
}
