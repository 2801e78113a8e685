use crate::{
    config::{Overrides, resolve_settings},
    conn::{CkanConnectionPinger, PostgresConnectionPinger, ping_all},
    env::EnvManager,
    error::CliError,
};
use clap::Parser;
use commands::Commands;
use connectors::ckan::client::CkanClient;
use engine_core::sync::{SyncMode, SyncReport};
use engine_runtime::execution::{executor, factory};
use model::dataset::freshness::FreshnessMarker;
use std::{fs::OpenOptions, path::PathBuf, sync::Mutex};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod conn;
mod env;
mod error;

#[derive(Parser)]
#[command(
    name = "aneel-sync",
    version = "0.1.0",
    about = "Incremental sync of ANEEL open data into a Postgres staging schema"
)]
struct Cli {
    #[arg(long, global = true, help = "Load variables from this .env file")]
    env_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Also write log lines to this file")]
    log_file: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Log filter, e.g. 'debug' or 'engine_core=debug'; overrides RUST_LOG"
    )]
    log_level: Option<String>,

    #[arg(long, global = true, help = "Postgres connection string; overrides DB_URL")]
    db_url: Option<String>,

    #[arg(long, global = true, help = "CKAN action API base URL; overrides CKAN_BASE_URL")]
    ckan_url: Option<String>,

    #[arg(long, global = true, help = "Staging schema; overrides STG_SCHEMA")]
    schema: Option<String>,

    #[arg(long, global = true, help = "Rows per page; overrides SYNC_PAGE_SIZE")]
    page_size: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            db_url: self.db_url.clone(),
            ckan_base_url: self.ckan_url.clone(),
            schema: self.schema.clone(),
            page_size: self.page_size,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref(), cli.log_file.as_ref())?;

    let mut env = EnvManager::new();
    if let Some(path) = &cli.env_file {
        env.load_from_file(path)?;
    }
    let settings = resolve_settings(&env, &cli.overrides())?;

    match cli.command {
        Commands::Sync {
            dataset,
            mode,
            year,
            json,
        } => {
            let jobs = commands::jobs(dataset, mode, year);
            let ctx = factory::create_context(&settings).await?;
            let results = executor::run_jobs(&ctx, &settings, &jobs).await;

            let reports: Vec<&SyncReport> =
                results.iter().filter_map(|r| r.result.as_ref().ok()).collect();
            if json {
                println!("{}", serde_json::to_string_pretty(&reports)?);
            } else {
                for report in &reports {
                    print_report(report);
                }
            }

            executor::summarize(&results)?;
        }
        Commands::Check { dataset, json } => {
            let ctx = factory::create_context(&settings).await?;
            let checks = executor::check(&ctx, &settings, &dataset.kinds()).await?;

            if json {
                let verdicts: Vec<serde_json::Value> = checks
                    .iter()
                    .map(|(kind, check)| {
                        serde_json::json!({
                            "dataset": kind,
                            "sink": check.sink,
                            "source": check.source,
                            "needs_sync": check.needs_sync(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&verdicts)?);
            } else {
                println!("{:<14} {:<22} {:<22} {}", "Dataset", "Sink", "Source", "Verdict");
                for (kind, check) in &checks {
                    println!(
                        "{:<14} {:<22} {:<22} {}",
                        kind.as_str(),
                        marker_or_dash(check.sink),
                        marker_or_dash(check.source),
                        if check.needs_sync() { "stale" } else { "up to date" }
                    );
                }
            }
        }
        Commands::TestConn => {
            let pg = PostgresConnectionPinger {
                conn_str: settings.db_url.clone(),
            };
            let ckan = CkanConnectionPinger {
                client: CkanClient::new(&settings.ckan_base_url, settings.http_timeout)?,
            };
            ping_all(&[&pg, &ckan]).await?;
        }
    }

    Ok(())
}

fn init_logging(level: Option<&str>, log_file: Option<&PathBuf>) -> Result<(), CliError> {
    let filter = match level {
        Some(directives) => EnvFilter::try_new(directives)
            .map_err(|e| CliError::Config(format!("invalid log filter '{directives}': {e}")))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .init();

    if let Some(path) = log_file {
        info!("Logging to {}", path.display());
    }
    Ok(())
}

fn marker_or_dash(marker: Option<FreshnessMarker>) -> String {
    marker
        .map(|m| m.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn print_report(report: &SyncReport) {
    let verb = if report.was_skipped() {
        "up to date".to_string()
    } else {
        format!("{} rows written", report.rows_written())
    };
    println!(
        "{:<14} {:<20} {:<10} {} ({} ms)",
        report.dataset,
        report.table,
        match report.mode {
            SyncMode::Full => "full".to_string(),
            SyncMode::Scoped { year } => year.to_string(),
        },
        verb,
        report.elapsed_ms
    );
}
