#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the traffic/crash merge tool.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use crash_map_analytics::rank::{metric_value, rank};
use crash_map_analytics_models::{RankMetric, RankOptions};
use crash_map_export::features::{report_features, write_feature_collection};
use crash_map_export::geometry::GeometryMap;
use crash_map_export::table::write_segments_csv;
use crash_map_ingest::{MergeOutcome, run_merge};
use crash_map_ingest_models::{MergeConfig, RunSummary};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

#[derive(Parser)]
#[command(name = "crash_map_ingest", about = "Traffic count and crash record merge tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MetricArg {
    /// Crashes per vehicle of daily traffic
    Aadt,
    /// Crashes per daily vehicle-mile
    Mile,
    /// Crashes per hundred million vehicle-miles
    Vmt,
}

impl From<MetricArg> for RankMetric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Aadt => Self::CrashesPerAadt,
            MetricArg::Mile => Self::CrashesPerMile,
            MetricArg::Vmt => Self::CrashesPer100mVmt,
        }
    }
}

#[derive(clap::Args)]
struct InputArgs {
    /// Directory holding the yearly `TYC_{year}.csv` exports
    #[arg(long)]
    traffic_dir: PathBuf,
    /// The multi-year crash export CSV
    #[arg(long)]
    crash_csv: PathBuf,
    /// On-system route lookup CSV for signed route names
    #[arg(long)]
    routes_csv: Option<PathBuf>,
}

impl InputArgs {
    fn config(&self) -> MergeConfig {
        MergeConfig {
            traffic_dir: self.traffic_dir.clone(),
            crash_csv: self.crash_csv.clone(),
            routes_csv: self.routes_csv.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full merge and write the segment table, ranking boards,
    /// and GeoJSON outputs
    Merge {
        #[command(flatten)]
        inputs: InputArgs,
        /// Output directory
        #[arg(long, default_value = "output/merged_data")]
        out_dir: PathBuf,
        /// Skip the GeoJSON outputs (no `TYC_{year}.json` files needed)
        #[arg(long)]
        skip_geojson: bool,
    },
    /// Print the most dangerous segments to stdout
    Rank {
        #[command(flatten)]
        inputs: InputArgs,
        /// Metric to rank by
        #[arg(long, value_enum, default_value = "vmt")]
        by: MetricArg,
        /// Number of segments to print
        #[arg(long, default_value = "25")]
        top: usize,
        /// Rank segments without a signed route name too
        #[arg(long)]
        include_unsigned: bool,
    },
    /// Validate the inputs and print the run summary without writing files
    Check {
        #[command(flatten)]
        inputs: InputArgs,
    },
}

/// Initializes the logger wrapped in `indicatif-log-bridge` so log lines
/// and progress bars coexist. Returns the `MultiProgress` every bar must
/// be added to.
fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}

fn merge_with_spinner(multi: &MultiProgress, config: &MergeConfig) -> Result<MergeOutcome, crash_map_ingest::IngestError> {
    let spinner = multi.add(ProgressBar::new_spinner());
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("merging traffic and crash data...");

    let outcome = run_merge(config);

    match &outcome {
        Ok(merged) => spinner.finish_with_message(format!(
            "merged {} segment(s), {} crash(es) matched",
            merged.summary.segments, merged.summary.crashes_matched
        )),
        Err(_) => spinner.finish_and_clear(),
    }
    outcome
}

fn print_summary(summary: &RunSummary) {
    println!("{:<28} {}", "Traffic rows", summary.traffic_rows);
    println!("{:<28} {}", "Crash rows", summary.crash_rows);
    println!("{:<28} {}", "Segments", summary.segments);
    println!("{:<28} {}", "Unratable segments", summary.unratable_segments);
    println!("{:<28} {}", "Crashes matched", summary.crashes_matched);
    println!("{:<28} {}", "Unmatched crashes", summary.unmatched_crashes);
    println!("{:<28} {}", "Ambiguous matches", summary.ambiguous_matches);
    println!(
        "{:<28} {}",
        "Duplicate-year conflicts", summary.duplicate_year_conflicts
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::Merge {
            inputs,
            out_dir,
            skip_geojson,
        } => {
            let start = Instant::now();
            let outcome = merge_with_spinner(&multi, &inputs.config())?;

            std::fs::create_dir_all(&out_dir)?;
            write_segments_csv(&out_dir.join("merged_segments.csv"), &outcome.reports)?;

            for metric in [RankMetric::CrashesPerAadt, RankMetric::CrashesPer100mVmt] {
                let board = rank(&outcome.reports, &RankOptions::for_metric(metric));
                let name = format!("board_{}.csv", metric.to_string().to_lowercase());
                write_segments_csv(&out_dir.join(name), &board)?;
            }

            if skip_geojson {
                log::info!("skipping GeoJSON outputs (--skip-geojson)");
            } else {
                let geometry = GeometryMap::load_dir(&inputs.traffic_dir)?;
                if geometry.is_empty() {
                    log::warn!("no segment geometry available; GeoJSON outputs skipped");
                } else {
                    let (points, lines) = report_features(&outcome.reports, &geometry);
                    write_feature_collection(&out_dir.join("merged_segments_points.geojson"), &points)?;
                    write_feature_collection(&out_dir.join("merged_segments_lines.geojson"), &lines)?;
                }
            }

            print_summary(&outcome.summary);
            log::info!("merge finished in {:.1}s", start.elapsed().as_secs_f64());
        }
        Commands::Rank {
            inputs,
            by,
            top,
            include_unsigned,
        } => {
            let outcome = merge_with_spinner(&multi, &inputs.config())?;

            let metric = RankMetric::from(by);
            let mut options = RankOptions::for_metric(metric);
            options.limit = top;
            options.require_signed_route = !include_unsigned;

            let board = rank(&outcome.reports, &options);
            println!(
                "{:<5} {:<14} {:<10} {:<22} {:>9} {:>8} {:>14}",
                "#", "ROUTE", "DEPT", "MILEPOSTS", "AADT", "CRASHES", metric
            );
            println!("{}", "-".repeat(88));
            for (position, report) in board.iter().enumerate() {
                let value = metric_value(report, metric).unwrap_or_default();
                println!(
                    "{:<5} {:<14} {:<10} {:<22} {:>9.0} {:>8} {:>14.6}",
                    position + 1,
                    report.signed_route.as_deref().unwrap_or("-"),
                    report.key.dept_id,
                    format!(
                        "{} {}..{}",
                        report.key.corridor_id, report.key.corr_start_mp, report.key.corr_end_mp
                    ),
                    report.resolved_aadt.unwrap_or_default(),
                    report.crash_count,
                    value,
                );
            }
        }
        Commands::Check { inputs } => {
            let outcome = merge_with_spinner(&multi, &inputs.config())?;
            print_summary(&outcome.summary);
            if outcome.diagnostics.is_clean() {
                println!("inputs are clean");
            }
        }
    }

    Ok(())
}
