//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.healthboard.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::filter::FilterState;
use crate::fixtures::generator::{default_days, default_seed, default_start_date};
use crate::fixtures::GeneratorOptions;
use crate::models::{AgeGroup, Gender, HesitancyLevel, Region, TimeRange, VaccineType};
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".healthboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Fixture source settings.
    #[serde(default)]
    pub fixtures: FixturesConfig,

    /// Default filter selection.
    #[serde(default)]
    pub filters: FiltersConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Default report format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            verbose: false,
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("healthboard_report.md")
}

/// Where fixtures come from.
///
/// When `path` is set the store is loaded from that JSON file and the
/// generator settings are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixturesConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_days")]
    pub days: usize,

    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            path: None,
            seed: default_seed(),
            days: default_days(),
            start_date: default_start_date(),
        }
    }
}

impl FixturesConfig {
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            seed: self.seed,
            days: self.days,
            start_date: self.start_date,
        }
    }
}

/// Filter selection applied when the CLI does not override it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiltersConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,

    #[serde(default)]
    pub vaccines: Vec<VaccineType>,

    #[serde(default = "default_hesitancy")]
    pub hesitancy: Vec<HesitancyLevel>,

    #[serde(default)]
    pub genders: Vec<Gender>,

    #[serde(default)]
    pub age_groups: Vec<AgeGroup>,
}

impl Default for FiltersConfig {
    fn default() -> Self {
        Self {
            region: None,
            vaccines: Vec::new(),
            hesitancy: default_hesitancy(),
            genders: Vec::new(),
            age_groups: Vec::new(),
        }
    }
}

fn default_hesitancy() -> Vec<HesitancyLevel> {
    HesitancyLevel::ALL.to_vec()
}

impl FiltersConfig {
    /// Build the filter state this selection describes.
    pub fn to_filter_state(&self) -> FilterState {
        FilterState {
            region: self.region,
            vaccines: self.vaccines.iter().copied().collect(),
            hesitancy: self.hesitancy.iter().copied().collect(),
            genders: self.genders.iter().copied().collect(),
            age_groups: self.age_groups.iter().copied().collect(),
        }
    }
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include the per-date hesitancy case breakdown table.
    #[serde(default = "default_true")]
    pub include_breakdown: bool,

    /// Include region coordinates in the map table.
    #[serde(default)]
    pub include_coordinates: bool,

    /// Include the social-media sentiment section.
    #[serde(default)]
    pub include_social: bool,

    /// Window of the social-media time series.
    #[serde(default = "default_social_range")]
    pub social_range: TimeRange,

    /// Include the consultation audio section.
    #[serde(default)]
    pub include_audio: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_breakdown: true,
            include_coordinates: false,
            include_social: false,
            social_range: default_social_range(),
            include_audio: false,
        }
    }
}

fn default_social_range() -> TimeRange {
    TimeRange::Week
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only values the CLI provides explicitly are overridden.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.clone();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        // A fixture file on the command line wins over generator settings.
        if let Some(ref path) = args.fixtures {
            self.fixtures.path = Some(path.clone());
        }
        if let Some(seed) = args.seed {
            self.fixtures.seed = seed;
            self.fixtures.path = None;
        }
        if let Some(days) = args.days {
            self.fixtures.days = days;
            self.fixtures.path = None;
        }
        if let Some(start_date) = args.start_date {
            self.fixtures.start_date = start_date;
            self.fixtures.path = None;
        }

        if args.region.is_some() {
            self.filters.region = args.region;
        }
        if let Some(ref vaccines) = args.vaccines {
            self.filters.vaccines = vaccines.clone();
        }
        if let Some(ref hesitancy) = args.hesitancy {
            self.filters.hesitancy = hesitancy.clone();
        }
        if let Some(ref genders) = args.genders {
            self.filters.genders = genders.clone();
        }
        if let Some(ref age_groups) = args.age_groups {
            self.filters.age_groups = age_groups.clone();
        }
    }

    /// Check the merged settings before anything is generated.
    ///
    /// Generator settings are only checked when no fixture file is set.
    pub fn validate(&self) -> Result<()> {
        if self.fixtures.path.is_some() {
            return Ok(());
        }
        if self.fixtures.days == 0 {
            bail!("Invalid [fixtures] settings: days must be at least 1");
        }
        self.fixtures
            .generator_options()
            .check()
            .context("Invalid [fixtures] settings")?;
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
