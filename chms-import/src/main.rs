//! chms-import - church membership CSV importer
//!
//! Subcommands:
//! - `import <CSV>`: load a membership spreadsheet into the database and
//!   print a summary
//! - `backfill-dates`: give legacy important-date entries an id and a
//!   yearly recurrence
//!
//! Exit code is 0 once a run completes, even if some rows failed; 1 when
//! the run cannot start.

use anyhow::{Context, Result};
use chms_common::config::{load_toml_config, DatabasePathResolver, TomlConfig};
use chms_common::db::init_database;
use chms_import::{backfill_important_dates, import_file, ImportOptions};
use clap::{Args, Parser, Subcommand};
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "chms-import")]
#[command(about = "Import church membership spreadsheets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import people and households from a CSV file
    Import {
        /// CSV file exported from the membership spreadsheet
        csv: PathBuf,

        #[command(flatten)]
        common: CommonArgs,

        /// Process everything but roll back every transaction
        #[arg(long)]
        dry_run: bool,

        /// Also write the summary as JSON to this file
        #[arg(long, value_name = "FILE")]
        summary_json: Option<PathBuf>,
    },

    /// Add missing ids and recurrences to stored important dates
    BackfillDates {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// SQLite database file (overrides CHMS_DATABASE and config)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Command {
    fn common(&self) -> &CommonArgs {
        match self {
            Command::Import { common, .. } | Command::BackfillDates { common } => common,
        }
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let common = cli.command.common();

    // Config loading logs through a bootstrap subscriber at `info`
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(env_filter("info"))
        .finish();
    let toml_config = tracing::subscriber::with_default(bootstrap, || {
        load_toml_config(common.config.as_deref())
    });

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&toml_config.logging.level))
        .init();

    info!(
        "Starting chms-import v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let pool = open_database(common.database.clone(), &toml_config).await?;

    match &cli.command {
        Command::Import {
            csv,
            dry_run,
            summary_json,
            ..
        } => run_import_command(&pool, csv, *dry_run, summary_json.as_deref()).await?,
        Command::BackfillDates { .. } => {
            let report = backfill_important_dates(&pool)
                .await
                .context("Backfill failed")?;
            println!(
                "Backfill complete: {} people updated out of {} total.",
                report.updated, report.scanned
            );
        }
    }

    pool.close().await;
    Ok(())
}

async fn open_database(
    cli_path: Option<PathBuf>,
    toml_config: &TomlConfig,
) -> Result<SqlitePool> {
    let db_path = DatabasePathResolver::new(cli_path, toml_config).resolve();
    info!("Database: {}", db_path.display());

    init_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))
}

async fn run_import_command(
    pool: &SqlitePool,
    csv: &Path,
    dry_run: bool,
    summary_json: Option<&Path>,
) -> Result<()> {
    let options = ImportOptions { dry_run };
    let summary = import_file(pool, csv, &options)
        .await
        .with_context(|| format!("Import of {} could not start", csv.display()))?;

    println!("\n{}", summary);

    if let Some(path) = summary_json {
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        info!("Summary written to {}", path.display());
    }

    Ok(())
}
