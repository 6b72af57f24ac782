//! Report types and rendering.

mod generator;

pub use generator::{generate_json_report, generate_markdown_report};

use crate::analysis::{DashboardView, ViewSummary};
use crate::filter::FilterState;
use crate::models::{AudioAnalysis, SocialData};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// Where the fixture store of a report came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FixtureSource {
    /// Loaded from a JSON fixture file.
    File { path: PathBuf },
    /// Produced by the seeded generator.
    Generated { seed: u64, days: usize },
}

impl std::fmt::Display for FixtureSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixtureSource::File { path } => write!(f, "file `{}`", path.display()),
            FixtureSource::Generated { seed, days } => {
                write!(f, "generated (seed {}, {} days)", seed, days)
            }
        }
    }
}

/// Metadata about the report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    pub fixture_source: FixtureSource,
    /// Tool version that produced the report.
    pub version: String,
}

/// One rendered dashboard view with the filter that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub filters: FilterState,
    pub view: DashboardView,
    pub summary: ViewSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioAnalysis>,
}

impl Report {
    pub fn new(metadata: ReportMetadata, filters: FilterState, view: DashboardView) -> Self {
        let summary = ViewSummary::from_view(&view);
        Self {
            metadata,
            filters,
            view,
            summary,
            social: None,
            audio: None,
        }
    }

    pub fn with_social(mut self, social: SocialData) -> Self {
        self.social = Some(social);
        self
    }

    pub fn with_audio(mut self, audio: AudioAnalysis) -> Self {
        self.audio = Some(audio);
        self
    }
}
