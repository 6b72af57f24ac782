//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::fixtures::MAX_GENERATED_DAYS;
use crate::models::{AgeGroup, Gender, HesitancyLevel, Region, VaccineType};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Healthboard - vaccination dashboard views from the command line
///
/// Filters regional vaccination data and aggregates demographic case
/// series the way the health-board dashboard does, then writes the
/// resulting view as a Markdown or JSON report.
///
/// Examples:
///   healthboard
///   healthboard --region "Greater London" --hesitancy low,moderate
///   healthboard --gender male,female --format json -o view.json
///   healthboard --age-group 60+ --fixtures fixtures.json
///   healthboard --seed 7 --dump-fixtures fixtures.json
///   healthboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Only show this region on the map
    #[arg(short, long, value_name = "REGION")]
    pub region: Option<Region>,

    /// Vaccine types to highlight (comma-separated)
    #[arg(long = "vaccine", value_name = "VACCINES", value_delimiter = ',')]
    pub vaccines: Option<Vec<VaccineType>>,

    /// Hesitancy levels to keep (comma-separated)
    ///
    /// Levels not listed are reported as 0. Defaults to all levels.
    #[arg(long, value_name = "LEVELS", value_delimiter = ',')]
    pub hesitancy: Option<Vec<HesitancyLevel>>,

    /// Gender slices to aggregate (comma-separated)
    #[arg(short, long = "gender", value_name = "GENDERS", value_delimiter = ',')]
    pub genders: Option<Vec<Gender>>,

    /// Age-group slices to aggregate (comma-separated)
    ///
    /// Values: 1-12, 13-19, 20-40, 41-60, 60+
    #[arg(short, long = "age-group", value_name = "GROUPS", value_delimiter = ',')]
    pub age_groups: Option<Vec<AgeGroup>>,

    /// Load fixtures from a JSON file instead of generating them
    #[arg(long, value_name = "FILE", env = "HEALTHBOARD_FIXTURES")]
    pub fixtures: Option<PathBuf>,

    /// Seed for generated fixtures
    #[arg(long, value_name = "SEED", env = "HEALTHBOARD_SEED")]
    pub seed: Option<u64>,

    /// Number of days in generated case series
    #[arg(long, value_name = "DAYS")]
    pub days: Option<usize>,

    /// First date of generated case series (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<NaiveDate>,

    /// Output file path for the report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .healthboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Write the fixture store as JSON to this file and exit
    #[arg(long, value_name = "FILE")]
    pub dump_fixtures: Option<PathBuf>,

    /// Generate a default .healthboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    clap::ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.days == Some(0) {
            return Err("Days must be at least 1".to_string());
        }

        if let Some(days) = self.days.filter(|&d| d > MAX_GENERATED_DAYS) {
            return Err(format!(
                "Days must be at most {}, got {}",
                MAX_GENERATED_DAYS, days
            ));
        }

        let generator_flags =
            self.seed.is_some() || self.days.is_some() || self.start_date.is_some();
        if self.fixtures.is_some() && generator_flags {
            return Err(
                "--seed, --days, and --start-date only apply to generated fixtures, not --fixtures"
                    .to_string(),
            );
        }

        if let Some(ref path) = self.fixtures {
            if !path.is_file() {
                return Err(format!("Fixture file does not exist: {}", path.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            region: None,
            vaccines: None,
            hesitancy: None,
            genders: None,
            age_groups: None,
            fixtures: None,
            seed: None,
            days: None,
            start_date: None,
            output: None,
            format: None,
            config: None,
            verbose: false,
            quiet: false,
            dump_fixtures: None,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_filters() {
        let args = Args::try_parse_from([
            "healthboard",
            "--region",
            "north-east",
            "--hesitancy",
            "low,severe",
            "--gender",
            "female",
            "--age-group",
            "60+,1-12",
            "--vaccine",
            "MonkeyPox MRNA",
        ])
        .unwrap();

        assert_eq!(args.region, Some(Region::NorthEast));
        assert_eq!(
            args.hesitancy,
            Some(vec![HesitancyLevel::Low, HesitancyLevel::Severe])
        );
        assert_eq!(args.genders, Some(vec![Gender::Female]));
        assert_eq!(
            args.age_groups,
            Some(vec![AgeGroup::Age60Plus, AgeGroup::Age1To12])
        );
        assert_eq!(args.vaccines, Some(vec![VaccineType::MonkeyPox]));
    }

    #[test]
    fn test_parse_rejects_unknown_region() {
        assert!(Args::try_parse_from(["healthboard", "--region", "Wales"]).is_err());
    }

    #[test]
    fn test_parse_generator_options() {
        let args = Args::try_parse_from([
            "healthboard",
            "--seed",
            "7",
            "--days",
            "14",
            "--start-date",
            "2024-01-01",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.seed, Some(7));
        assert_eq!(args.days, Some(14));
        assert_eq!(args.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_days() {
        let mut args = make_args();
        args.days = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_missing_fixture_file() {
        let mut args = make_args();
        args.fixtures = Some(PathBuf::from("/nonexistent/fixtures.json"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_seed_with_fixture_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut args = make_args();
        args.fixtures = Some(file.path().to_path_buf());
        assert!(args.validate().is_ok());

        args.seed = Some(1);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_start_date_with_fixture_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut args = make_args();
        args.fixtures = Some(file.path().to_path_buf());
        args.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);

        let err = args.validate().unwrap_err();
        assert!(err.contains("--start-date"));
    }

    #[test]
    fn test_validation_days_upper_bound() {
        let mut args = make_args();
        args.days = Some(MAX_GENERATED_DAYS);
        assert!(args.validate().is_ok());

        args.days = Some(MAX_GENERATED_DAYS + 1);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
