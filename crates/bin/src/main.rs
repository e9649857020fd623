//! Rebuy CLI binary.
//!
//! Builds the repurchase survival cohort from the raw marketplace extracts.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration as StdDuration;

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use rebuy_cohort::{
    CohortBuilder, CohortConfig, DEFAULT_MIN_FOLLOW_UP_DAYS, RepurchasePolicy, SnapshotPolicy,
};
use rebuy_data::paths::{customers_path, orders_path, resolve_data_dir};
use rebuy_data::records::TIMESTAMP_FORMAT;
use rebuy_data::{load_customers, load_orders};
use rebuy_output::{CohortMetadata, write_outputs};

#[derive(Parser)]
#[command(name = "rebuy")]
#[command(about = "Build the repurchase survival cohort from raw marketplace extracts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the pre-filter and analytic cohort tables
    Build {
        /// Directory containing the raw extracts
        /// (default: $REBUY_RAW_DIR, then raw_data/)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Output directory
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,

        /// Fixed administrative snapshot, "YYYY-MM-DD HH:MM:SS" or
        /// "YYYY-MM-DD" (default: derived from the data)
        #[arg(long, value_parser = parse_snapshot)]
        snapshot: Option<NaiveDateTime>,

        /// Minimum follow-up retained in the analytic cohort, days
        #[arg(long, default_value_t = DEFAULT_MIN_FOLLOW_UP_DAYS)]
        min_follow_up_days: f64,

        /// Qualifying-repurchase policy (see `rebuy policies`)
        #[arg(long, default_value = "delivered-only", value_parser = parse_policy)]
        repurchase_policy: RepurchasePolicy,
    },

    /// List the named qualifying-repurchase policies
    Policies,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            data_dir,
            out_dir,
            snapshot,
            min_follow_up_days,
            repurchase_policy,
        } => {
            let config = CohortConfig {
                snapshot: snapshot.map_or(SnapshotPolicy::FromData, SnapshotPolicy::Fixed),
                min_follow_up_days,
                repurchase: repurchase_policy,
            };
            build_cohort(data_dir, &out_dir, config)?;
        }
        Commands::Policies => list_policies(),
    }

    Ok(())
}

fn build_cohort(
    data_dir: Option<PathBuf>,
    out_dir: &Path,
    config: CohortConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== BUILD SURVIVAL COHORT ===\n");

    let data_dir = resolve_data_dir(data_dir.as_deref());
    println!("Raw data directory: {}", data_dir.display());

    // Loading is the slow step on the full extract.
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(StdDuration::from_millis(100));
    pb.set_message("Loading raw extracts...");

    let customers = load_customers(&customers_path(&data_dir));
    let customers = match customers {
        Ok(c) => c,
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };
    let table = match load_orders(&orders_path(&data_dir), &customers) {
        Ok(t) => t,
        Err(e) => {
            pb.finish_with_message("Failed!");
            return Err(e.into());
        }
    };
    pb.finish_with_message(format!(
        "Loaded {} orders from {} rows ({} customers)",
        table.stats.orders_kept,
        table.stats.order_rows_read,
        customers.len()
    ));

    if table.stats.rows_excluded() > 0 {
        println!(
            "  Excluded rows: {} (duplicates: {}, unknown status: {}, \
             malformed purchase ts: {}, unmatched customers: {})",
            table.stats.rows_excluded(),
            table.stats.duplicate_order_ids,
            table.stats.unknown_status_rows,
            table.stats.malformed_purchase_timestamps,
            table.stats.unmatched_customers
        );
    }
    if table.stats.malformed_delivery_timestamps > 0 {
        println!(
            "  Delivery timestamps cleared as unparseable: {}",
            table.stats.malformed_delivery_timestamps
        );
    }
    println!();

    let builder = CohortBuilder::new(config)?;
    let build = builder.build(&table.orders)?;
    let d = &build.diagnostics;

    println!(
        "Snapshot: {} ({})",
        build.snapshot.format(TIMESTAMP_FORMAT),
        match config.snapshot {
            SnapshotPolicy::FromData => "derived from max purchase timestamp",
            SnapshotPolicy::Fixed(_) => "fixed",
        }
    );
    println!("Repurchase policy: {}", config.repurchase);
    println!("Customers with delivered index order: {}", d.customers_indexed);
    if d.index_after_snapshot > 0 {
        println!(
            "  Excluded (anchor after snapshot): {}",
            d.index_after_snapshot
        );
    }
    println!(
        "Pre-filter cohort: {} rows, {} events ({:.2}%)",
        d.prefilter_rows,
        d.prefilter_events,
        d.prefilter_event_rate() * 100.0
    );
    println!(
        "  Repurchases within 24h of anchor: {:.2}% of rows (diagnostic)",
        d.pct_events_within_24h
    );
    println!(
        "Analytic cohort (follow-up >= {} days): {} rows, {} events ({:.2}%)",
        config.min_follow_up_days,
        d.analytic_rows,
        d.analytic_events,
        d.analytic_event_rate() * 100.0
    );

    if build.prefilter.is_empty() {
        eprintln!("Warning: cohort is empty; writing empty but well-formed tables");
    }

    let metadata = CohortMetadata::new(&build, table.stats, &data_dir);
    let written = write_outputs(out_dir, &build, &metadata)?;

    println!();
    for path in &written {
        println!("[OK] Saved: {}", path.display());
    }

    Ok(())
}

fn list_policies() {
    println!("Qualifying-repurchase policies:");
    println!("===============================\n");

    for policy in RepurchasePolicy::all() {
        println!("{:<18} {}", policy.name(), policy.description());
    }
}

fn parse_snapshot(raw: &str) -> Result<NaiveDateTime, String> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT) {
        return Ok(ts);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(ts) = date.and_hms_opt(0, 0, 0) {
            return Ok(ts);
        }
    }
    Err(format!(
        "invalid snapshot '{raw}': expected \"YYYY-MM-DD HH:MM:SS\" or \"YYYY-MM-DD\""
    ))
}

fn parse_policy(raw: &str) -> Result<RepurchasePolicy, String> {
    RepurchasePolicy::parse(raw).ok_or_else(|| {
        let known: Vec<_> = RepurchasePolicy::all()
            .into_iter()
            .map(|p| p.name())
            .collect();
        format!("unknown policy '{raw}': expected one of {}", known.join(", "))
    })
}
