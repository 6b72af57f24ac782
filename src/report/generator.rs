//! Markdown and JSON report generation.
//!
//! The Markdown report mirrors what the dashboard renders for one filter
//! state: the map table always, and the case charts as tables when a
//! demographic filter is active.

use super::{Report, ReportMetadata};
use crate::analysis::{hesitancy_case_breakdown, ViewSummary};
use crate::config::ReportConfig;
use crate::filter::FilterState;
use crate::models::{
    AudioAnalysis, HesitancyLevel, Sentiment, SocialData, SocialMetrics, TimeRange,
    TimeSeriesPoint, VaccinationRecord, VaccineType,
};
use anyhow::Result;
use std::fmt::Display;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, config: &ReportConfig) -> String {
    let mut output = String::new();

    // Title
    output.push_str("# Healthboard Report\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_filters_section(&report.filters));
    output.push_str(&generate_summary_section(&report.summary));

    let vaccines = visible_vaccines(&report.filters);
    output.push_str(&generate_map_section(
        &report.view.filtered_map_data,
        &vaccines,
        config.include_coordinates,
    ));

    if report.view.show_time_series {
        output.push_str(&generate_time_series_section(&report.view.time_series));
        if config.include_breakdown {
            output.push_str(&generate_breakdown_section(&report.view.time_series));
        }
    }

    if let Some(ref social) = report.social {
        output.push_str(&generate_social_section(social, config.social_range));
    }
    if let Some(ref audio) = report.audio {
        output.push_str(&generate_audio_section(audio));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Fixtures:** {}\n", metadata.fixture_source));
    section.push_str(&format!("- **Version:** {}\n", metadata.version));
    section.push('\n');

    section
}

fn join_or<T: Display>(items: impl IntoIterator<Item = T>, empty: &str) -> String {
    let parts: Vec<String> = items.into_iter().map(|item| item.to_string()).collect();
    if parts.is_empty() {
        empty.to_string()
    } else {
        parts.join(", ")
    }
}

fn generate_filters_section(filters: &FilterState) -> String {
    let mut section = String::new();

    section.push_str("## Active Filters\n\n");
    section.push_str(&format!(
        "- **Region:** {}\n",
        filters
            .region
            .map_or_else(|| "All regions".to_string(), |r| r.to_string())
    ));
    section.push_str(&format!(
        "- **Vaccines:** {}\n",
        join_or(&filters.vaccines, "All")
    ));
    section.push_str(&format!(
        "- **Hesitancy levels:** {}\n",
        join_or(&filters.hesitancy, "None")
    ));
    section.push_str(&format!(
        "- **Genders:** {}\n",
        join_or(&filters.genders, "None")
    ));
    section.push_str(&format!(
        "- **Age groups:** {}\n",
        join_or(&filters.age_groups, "None")
    ));
    section.push('\n');

    if filters.demographics_active() {
        section.push_str(
            "> Vaccine and region filters are disabled while a gender or age-group filter is active.\n\n",
        );
    }

    section
}

fn generate_summary_section(summary: &ViewSummary) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Regions | Mean willingness | Days | Total cases | Total deaths |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} | {} |\n\n",
        summary.regions_shown,
        summary
            .mean_willingness
            .map_or_else(|| "-".to_string(), percent),
        summary.time_series_points,
        summary.total_cases,
        summary.total_deaths,
    ));

    if let (Some(first), Some(last)) = (summary.first_date, summary.last_date) {
        section.push_str(&format!("*Series covers {} to {}*\n\n", first, last));
    }

    section
}

/// Vaccine columns shown in the map table.
///
/// Only the selected vaccines while the vaccine filter is enabled and
/// something is selected, every vaccine otherwise.
fn visible_vaccines(filters: &FilterState) -> Vec<VaccineType> {
    if filters.vaccine_filter_enabled() && !filters.vaccines.is_empty() {
        filters.vaccines.iter().copied().collect()
    } else {
        VaccineType::ALL.to_vec()
    }
}

fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

fn generate_map_section(
    records: &[VaccinationRecord],
    vaccines: &[VaccineType],
    include_coordinates: bool,
) -> String {
    let mut section = String::new();

    section.push_str("## Map Data\n\n");

    if records.is_empty() {
        section.push_str("No records\n\n");
        return section;
    }

    let mut header = vec!["Region".to_string()];
    if include_coordinates {
        header.push("Latitude".to_string());
        header.push("Longitude".to_string());
    }
    header.extend(vaccines.iter().map(|v| v.to_string()));
    header.push("Willingness".to_string());
    header.extend(HesitancyLevel::ALL.iter().map(|l| l.to_string()));

    section.push_str(&format!("| {} |\n", header.join(" | ")));
    section.push_str(&format!("|:---|{}\n", ":---:|".repeat(header.len() - 1)));

    for record in records {
        let mut row = vec![record.region.to_string()];
        if include_coordinates {
            row.push(format!("{:.4}", record.coordinates.latitude()));
            row.push(format!("{:.4}", record.coordinates.longitude()));
        }
        row.extend(vaccines.iter().map(|&v| percent(record.vaccine_types.get(v))));
        row.push(percent(record.willingness));
        row.extend(record.hesitancy.iter().map(|(_, value)| percent(value)));

        section.push_str(&format!("| {} |\n", row.join(" | ")));
    }
    section.push('\n');

    section
}

fn generate_time_series_section(series: &[TimeSeriesPoint]) -> String {
    let mut section = String::new();

    section.push_str("## Cases Over Time\n\n");

    if series.is_empty() {
        section.push_str("No records\n\n");
        return section;
    }

    section.push_str("| Date | New cases | 7-day average | Deaths | Deaths 7-day average |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|\n");
    for point in series {
        section.push_str(&format!(
            "| {} | {} | {:.1} | {} | {:.1} |\n",
            point.date,
            point.new_cases,
            point.seven_day_average,
            point.deaths,
            point.deaths_seven_day_average
        ));
    }
    section.push('\n');

    section
}

fn generate_breakdown_section(series: &[TimeSeriesPoint]) -> String {
    let mut section = String::new();

    section.push_str("## Cases by Hesitancy Level\n\n");

    if series.is_empty() {
        section.push_str("No records\n\n");
        return section;
    }

    let levels = join_or(HesitancyLevel::ALL, "").replace(", ", " | ");
    section.push_str(&format!("| Date | {} |\n", levels));
    section.push_str(&format!(
        "|:---|{}\n",
        ":---:|".repeat(HesitancyLevel::ALL.len())
    ));
    for point in series {
        let cells: Vec<String> = hesitancy_case_breakdown(point)
            .into_iter()
            .map(|(_, cases)| cases.to_string())
            .collect();
        section.push_str(&format!("| {} | {} |\n", point.date, cells.join(" | ")));
    }
    section.push('\n');

    section
}

fn change(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:+.1}%", v))
}

fn metrics_row(label: &str, metrics: &SocialMetrics) -> String {
    format!(
        "| {} | {} ({}) | {} ({}) | {} ({}) |\n",
        label,
        metrics.views,
        change(metrics.views_change()),
        metrics.likes,
        change(metrics.likes_change()),
        metrics.reposts,
        change(metrics.reposts_change()),
    )
}

/// Users of both sentiments by influence, with their most viewed tweet.
fn generate_users_table(social: &SocialData) -> String {
    let mut section = String::new();

    section.push_str("### Top Voices\n\n");

    if social.users.is_empty() {
        section.push_str("No records\n\n");
        return section;
    }

    section.push_str("| Sentiment | Name | Handle | Score | Top tweet views |\n");
    section.push_str("|:---|:---|:---|:---:|:---:|\n");
    for sentiment in [Sentiment::Positive, Sentiment::Negative] {
        for user in social.ranked_users(sentiment) {
            let top_views = user
                .tweets
                .iter()
                .map(|t| t.metrics.views)
                .max()
                .map_or_else(|| "-".to_string(), |v| v.to_string());
            section.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                sentiment, user.name, user.handle, user.influence_score, top_views
            ));
        }
    }
    section.push('\n');

    section
}

fn generate_social_section(social: &SocialData, range: TimeRange) -> String {
    let mut section = String::new();

    section.push_str("## Social Sentiment\n\n");
    section.push_str("| Sentiment | Views | Likes | Reposts |\n");
    section.push_str("|:---|:---:|:---:|:---:|\n");
    section.push_str(&metrics_row("Positive", &social.metrics.positive));
    section.push_str(&metrics_row("Negative", &social.metrics.negative));
    section.push('\n');

    section.push_str(&generate_users_table(social));

    let series = social.time_series.get(range);
    section.push_str(&format!("### Last {} day(s)\n\n", range.days()));

    if series.is_empty() {
        section.push_str("No records\n\n");
        return section;
    }

    section.push_str("| Date | Views | Likes | Reposts | Positive | Negative |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|\n");
    for point in series {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            point.date,
            point.total_views,
            point.total_likes,
            point.total_reposts,
            percent(point.positive.percentage),
            percent(point.negative.percentage),
        ));
    }
    section.push('\n');

    section
}

fn generate_audio_section(audio: &AudioAnalysis) -> String {
    let mut section = String::new();

    section.push_str("## Consultation Audio\n\n");
    section.push_str(&format!(
        "*File: {} | Duration: {:.0}s | Samples: {}*\n\n",
        audio.file_name,
        audio.duration,
        audio.emotion_data.len()
    ));

    let mut points = audio.hesitancy_points().peekable();
    if points.peek().is_none() {
        section.push_str("No records\n\n");
        return section;
    }

    for point in points {
        section.push_str(&format!(
            "#### {:.0}s (emotion {:+.2})\n\n",
            point.time, point.emotion_score
        ));
        if let Some(ref speech) = point.speech {
            section.push_str(&format!("> {}\n\n", speech));
        }
        if let Some(ref analysis) = point.ai_analysis {
            section.push_str(&format!("**Analysis:** {}\n\n", analysis));
        }
    }

    section
}

fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by Healthboard v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}
