//! Healthboard - vaccination dashboard views from the command line
//!
//! A CLI tool that filters regional vaccination records and aggregates
//! demographic case series the way the health-board dashboard does,
//! then renders the resulting view as a Markdown or JSON report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Invalid arguments, unreadable config or fixtures, write failure

mod analysis;
mod cli;
mod config;
mod filter;
mod fixtures;
mod models;
mod report;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use fixtures::FixtureStore;
use report::{FixtureSource, Report, ReportMetadata};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is read before logging so that `verbose` from the file applies
    let (mut config, config_path) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);
    if let Err(e) = config.validate() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    init_logging(&args, config.general.verbose);

    info!("Healthboard v{}", env!("CARGO_PKG_VERSION"));
    match config_path {
        Some(path) => info!("Loaded config from: {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args, &config) {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .healthboard.toml.
fn handle_init_config() -> Result<()> {
    if let Err(e) = write_default_config(Path::new(CONFIG_FILE_NAME)) {
        eprintln!("⚠️  {:#}", e);
        std::process::exit(1);
    }

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize fixtures, default filters, and report output.");
    Ok(())
}

/// Write the default configuration to `path`. Never overwrites.
fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!(
            "{} already exists. Remove it first or edit it manually.",
            path.display()
        );
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, verbose: bool) {
    let level = if verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Build the fixture store, evaluate the filter, and write the report.
fn run(args: &Args, config: &Config) -> Result<()> {
    let start_time = Instant::now();

    // Handle --dump-fixtures: write the store and exit
    if let Some(ref path) = args.dump_fixtures {
        let source = dump_fixtures(config, path)?;
        println!("✅ Fixtures ({}) written to: {}", source, path.display());
        return Ok(());
    }

    // Step 1: Get the fixtures
    let (store, source) = load_store(config)?;

    // Step 2: Evaluate the filter
    let filter = config.filters.to_filter_state();
    let region_ignored = !filter.region_filter_enabled() && filter.region.is_some();
    let vaccines_ignored = !filter.vaccine_filter_enabled() && !filter.vaccines.is_empty();
    if region_ignored || vaccines_ignored {
        warn!("Region and vaccine filters are disabled while a demographic filter is active");
    }

    let view = analysis::evaluate(&store, &filter);

    // Step 3: Build and save the report
    let metadata = ReportMetadata {
        generated_at: Utc::now(),
        fixture_source: source,
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let mut report = Report::new(metadata, filter, view);
    if config.report.include_social {
        report = report.with_social(store.social().clone());
    }
    if config.report.include_audio {
        report = report.with_audio(store.audio().clone());
    }

    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &config.report),
    };

    let output_path = &config.general.output;
    std::fs::write(output_path, &output)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    if !args.quiet {
        print_summary(&report, start_time.elapsed().as_secs_f64());
    }
    println!("\n✅ Report saved to: {}", output_path.display());

    Ok(())
}

fn print_summary(report: &Report, duration: f64) {
    let summary = &report.summary;

    println!("\n📊 Dashboard Summary:");
    match summary.mean_willingness {
        Some(mean) => println!(
            "   🗺️  Regions shown: {} (mean willingness {:.1}%)",
            summary.regions_shown, mean
        ),
        None => println!("   🗺️  Regions shown: 0"),
    }
    if report.view.show_time_series {
        println!(
            "   📈 Time series: {} days, {} cases, {} deaths",
            summary.time_series_points, summary.total_cases, summary.total_deaths
        );
    }
    println!("   Duration: {:.2}s", duration);
}

/// Write the configured fixture store to `path` as JSON.
fn dump_fixtures(config: &Config, path: &Path) -> Result<FixtureSource> {
    let (store, source) = load_store(config)?;
    fixtures::save_to_file(&store, path)?;
    Ok(source)
}

/// Load the fixture store from a file or generate it.
fn load_store(config: &Config) -> Result<(FixtureStore, FixtureSource)> {
    if let Some(ref path) = config.fixtures.path {
        let store = fixtures::load_from_file(path)?;
        return Ok((store, FixtureSource::File { path: path.clone() }));
    }

    let options = config.fixtures.generator_options();
    info!(
        "Generating fixtures: seed {}, {} days from {}",
        options.seed, options.days, options.start_date
    );
    let store = fixtures::generate(&options).context("Failed to generate fixtures")?;

    Ok((
        store,
        FixtureSource::Generated {
            seed: options.seed,
            days: options.days,
        },
    ))
}

/// Load configuration from file or use defaults.
///
/// Also returns the path the configuration came from, if any.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Ok((Config::load(config_path)?, Some(config_path.clone())));
    }

    // Try default location
    match Config::load_default()? {
        Some(config) => Ok((config, Some(PathBuf::from(CONFIG_FILE_NAME)))),
        None => Ok((Config::default(), None)),
    }
}
