//! CLI entry point for the bikeshare explorer.
//!
//! Provides an interactive session that asks for a city and filters, a
//! one-shot report command for scripting, and a city listing.

mod prompt;

use crate::prompt::{Confirmation, Prompt, day_arg, month_arg};
use anyhow::{Context, Result};
use bikeshare_stats::{
    config::CityCatalog,
    dataset::Dataset,
    filter::{self, FilterCriteria},
    loader::load_city,
    output::{append_record, print_json, print_pretty, print_text},
    reports::aggregate_city,
};
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore bikeshare trip data for US cities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for a city, month and day, then show statistics
    Explore {
        #[command(flatten)]
        common: CommonArgs,
    },
    /// Print statistics for one city without prompting
    Report {
        /// City to analyze (e.g. "chicago", "new york city")
        #[arg(value_name = "CITY")]
        city: String,

        /// Month to filter by (January-June), or "all"
        #[arg(short, long, default_value = "all")]
        month: String,

        /// Day of week to filter by, or "all"
        #[arg(short, long, default_value = "all")]
        day: String,

        #[command(flatten)]
        common: CommonArgs,
    },
    /// List the configured cities and their data files
    ListCities {
        /// JSON file mapping city names to CSV paths
        #[arg(long, value_name = "FILE")]
        cities: Option<PathBuf>,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// JSON file mapping city names to CSV paths
    #[arg(long, value_name = "FILE")]
    cities: Option<PathBuf>,

    /// Print reports as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// CSV file to append a summary row to
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(io::stderr)
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
        Commands::Explore { common } => {
            let catalog = catalog(common.cities.as_deref())?;
            explore(&catalog, &common)?;
        }
        Commands::Report {
            city,
            month,
            day,
            common,
        } => {
            let catalog = catalog(common.cities.as_deref())?;
            let criteria = FilterCriteria::new(month_arg(&month)?, day_arg(&day)?);
            let dataset = load(&catalog, &city)?;
            report(&dataset, criteria, &common)?;
        }
        Commands::ListCities { cities } => {
            let catalog = catalog(cities.as_deref())?;
            for city in catalog.city_names() {
                let path = catalog
                    .path_for(&city)
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                println!("{city}: {path}");
            }
        }
    }

    Ok(())
}

/// The catalog from `--cities`, or the built-in one under `$BIKESHARE_DATA_DIR`.
fn catalog(cities: Option<&Path>) -> Result<CityCatalog> {
    match cities {
        Some(path) => CityCatalog::load(path),
        None => Ok(CityCatalog::from_env()),
    }
}

fn load(catalog: &CityCatalog, city: &str) -> Result<Dataset> {
    let path = catalog
        .path_for(city)
        .with_context(|| format!("no data file configured for '{city}'"))?;
    load_city(&city.to_lowercase(), path)
}

/// Filters `dataset`, computes every report and writes it to stdout.
#[tracing::instrument(skip_all, fields(city = %dataset.city))]
fn report(dataset: &Dataset, criteria: FilterCriteria, common: &CommonArgs) -> Result<()> {
    let filtered = filter::apply(dataset, &criteria);
    let mut stdout = io::stdout().lock();

    if filtered.is_empty() {
        warn!(
            month = criteria.month.label(),
            day = criteria.day.label(),
            "No trips match the selected filters"
        );
        writeln!(
            stdout,
            "No trips found for {} with {} and {}.",
            dataset.city,
            criteria.month.describe("month"),
            criteria.day.describe("day")
        )?;
        return Ok(());
    }

    let city_report = aggregate_city(&filtered, criteria)?;
    print_pretty(&city_report);

    if common.json {
        print_json(&mut stdout, &city_report)?;
    } else {
        print_text(&mut stdout, &city_report)?;
    }

    if let Some(path) = &common.output {
        append_record(path, &city_report)?;
        info!(path, "Summary row appended");
    }

    Ok(())
}

/// Interactive loop: select, confirm, report, and optionally restart.
fn explore(catalog: &CityCatalog, common: &CommonArgs) -> Result<()> {
    let cities = catalog.city_names();
    let stdin = io::stdin();
    let mut prompt = Prompt::new(stdin.lock(), io::stdout());

    loop {
        let city = prompt.city(&cities)?;
        let month = prompt.month()?;
        let day = prompt.day()?;
        prompt.say(&bikeshare_stats::output::rule())?;

        let criteria = FilterCriteria::new(month, day);
        let dataset = load(catalog, &city)?;

        match prompt.confirm(&city, &criteria)? {
            Confirmation::Change => continue,
            Confirmation::Exit => {
                prompt.say("Thank You !\nCome Again!!!")?;
                return Ok(());
            }
            Confirmation::Look => prompt.page(&filter::apply(&dataset, &criteria))?,
            Confirmation::Proceed => {}
        }

        report(&dataset, criteria, common)?;

        if !prompt.restart()? {
            prompt.say("See you around !!!")?;
            return Ok(());
        }
    }
}
