//! drecalc main entry point

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use drecalc_config::{Config, DefaultGranularity};
use drecalc_core::{DateRange, Granularity, SeriesMode};
use drecalc_store::{JsonSnapshotStore, Snapshot, SnapshotSource};
use std::path::PathBuf;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "drecalc")]
#[command(version = "0.1.0")]
#[command(about = "Income statement (DRE) reports from a ledger snapshot", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Snapshot file; overrides the configured location
    #[arg(short, long)]
    snapshot: Option<PathBuf>,

    /// Company id; falls back to report.default_company from the config
    #[arg(long)]
    company: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Income statement for a date window
    Statement {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        /// Also report scanned/skipped entry diagnostics
        #[arg(long)]
        diagnostics: bool,
    },
    /// Statement series over calendar-aligned sub-periods
    Series {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        /// month, quarter or year; defaults to the configured granularity
        #[arg(long)]
        granularity: Option<Granularity>,
        /// Emit only sub-periods that contain activity
        #[arg(long)]
        active_only: bool,
    },
    /// Per-account cost breakdown (non-revenue accounts, positive totals)
    Breakdown {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Cost-bucket distribution of debit spend
    Costs {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Compare a window against the preceding window of equal length
    Compare {
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let config = Config::load(args.config.clone())?;

    let snapshot_path = args
        .snapshot
        .clone()
        .unwrap_or_else(|| config.snapshot_path());
    log::info!("loading snapshot from {}", snapshot_path.display());

    let rt = Runtime::new()?;
    let snapshot = rt.block_on(JsonSnapshotStore.load(snapshot_path))?;
    log::info!(
        "snapshot loaded: {} accounts, {} entries",
        snapshot.accounts.len(),
        snapshot.entries.len()
    );

    let company = args
        .company
        .clone()
        .or_else(|| config.report.default_company.clone())
        .ok_or("no company id given; pass --company or set report.default_company")?;

    let output = run(&args.command, &config, &snapshot, &company)?;
    println!("{}", output);
    Ok(())
}

fn run(
    command: &Command,
    config: &Config,
    snapshot: &Snapshot,
    company: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let Snapshot { accounts, entries } = snapshot;

    let json = match command {
        Command::Statement {
            from,
            to,
            diagnostics,
        } => {
            let range = DateRange::new(*from, *to);
            if *diagnostics {
                let (statement, diagnostics) =
                    drecalc_core::calculate_with_diagnostics(entries, accounts, company, range);
                serde_json::to_string_pretty(&serde_json::json!({
                    "statement": statement,
                    "diagnostics": diagnostics,
                }))?
            } else {
                let statement = drecalc_core::calculate(entries, accounts, company, range);
                serde_json::to_string_pretty(&statement)?
            }
        }
        Command::Series {
            from,
            to,
            granularity,
            active_only,
        } => {
            let granularity = (*granularity)
                .unwrap_or_else(|| configured_granularity(config.report.default_granularity));
            let mode = if *active_only || config.report.activity_only {
                SeriesMode::ActiveOnly
            } else {
                SeriesMode::Full
            };
            let series = drecalc_core::build_series(
                entries,
                accounts,
                company,
                DateRange::new(*from, *to),
                granularity,
                mode,
            );
            serde_json::to_string_pretty(&series)?
        }
        Command::Breakdown { from, to } => {
            let breakdown = drecalc_core::aggregate_by_account(
                entries,
                accounts,
                company,
                DateRange::new(*from, *to),
            );
            serde_json::to_string_pretty(&breakdown)?
        }
        Command::Costs { from, to } => {
            let distribution = drecalc_core::cost_distribution(
                entries,
                accounts,
                company,
                DateRange::new(*from, *to),
            );
            serde_json::to_string_pretty(&distribution)?
        }
        Command::Compare { from, to } => {
            let current_range = DateRange::new(*from, *to);
            let previous_range = current_range.previous();
            let previous = drecalc_core::calculate(entries, accounts, company, previous_range);
            let current = drecalc_core::calculate(entries, accounts, company, current_range);
            let delta = drecalc_core::compare(&previous, &current);
            serde_json::to_string_pretty(&serde_json::json!({
                "previous": previous,
                "current": current,
                "delta": delta,
            }))?
        }
    };
    Ok(json)
}

fn configured_granularity(granularity: DefaultGranularity) -> Granularity {
    match granularity {
        DefaultGranularity::Month => Granularity::Month,
        DefaultGranularity::Quarter => Granularity::Quarter,
        DefaultGranularity::Year => Granularity::Year,
    }
}
