//! Summary statistics over a computed dashboard view.

use super::DashboardView;
use crate::models::{HesitancyLevel, TimeSeriesPoint};
use chrono::NaiveDate;
use serde::Serialize;

/// Headline numbers shown above the map or chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewSummary {
    pub regions_shown: usize,
    /// Mean willingness over the shown regions, if any are shown.
    pub mean_willingness: Option<f64>,
    pub time_series_points: usize,
    pub total_cases: u64,
    pub total_deaths: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_date: Option<NaiveDate>,
}

impl ViewSummary {
    pub fn from_view(view: &DashboardView) -> Self {
        let regions_shown = view.filtered_map_data.len();
        let mean_willingness = if regions_shown == 0 {
            None
        } else {
            let total: f64 = view.filtered_map_data.iter().map(|r| r.willingness).sum();
            Some(total / regions_shown as f64)
        };

        Self {
            regions_shown,
            mean_willingness,
            time_series_points: view.time_series.len(),
            total_cases: view.time_series.iter().map(|p| p.new_cases).sum(),
            total_deaths: view.time_series.iter().map(|p| p.deaths).sum(),
            first_date: view.time_series.first().map(|p| p.date),
            last_date: view.time_series.last().map(|p| p.date),
        }
    }
}

/// New cases of one day split by hesitancy level.
///
/// Each level gets `round(cases * percentage / 100)`; the parts are not
/// forced to add up to the day's total.
pub fn hesitancy_case_breakdown(point: &TimeSeriesPoint) -> Vec<(HesitancyLevel, u64)> {
    point
        .hesitancy_breakdown
        .iter()
        .map(|(level, percentage)| {
            let cases = (point.new_cases as f64 * percentage / 100.0).round();
            (level, cases.max(0.0) as u64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HesitancyBreakdown, Region, VaccinationRecord, VaccineUptake};

    fn record(region: Region, willingness: f64) -> VaccinationRecord {
        VaccinationRecord {
            region,
            coordinates: region.coordinates(),
            vaccine_types: VaccineUptake::default(),
            willingness,
            hesitancy: HesitancyBreakdown::default(),
        }
    }

    fn point(day: u32, new_cases: u64, deaths: u64) -> TimeSeriesPoint {
        TimeSeriesPoint {
            new_cases,
            deaths,
            ..TimeSeriesPoint::zeroed(NaiveDate::from_ymd_opt(2023, 8, day).unwrap())
        }
    }

    #[test]
    fn test_summary_of_map_view() {
        let view = DashboardView {
            filtered_map_data: vec![
                record(Region::NorthEast, 70.0),
                record(Region::SouthWest, 80.0),
            ],
            time_series: Vec::new(),
            show_time_series: false,
        };

        let summary = ViewSummary::from_view(&view);
        assert_eq!(summary.regions_shown, 2);
        assert_eq!(summary.mean_willingness, Some(75.0));
        assert_eq!(summary.total_cases, 0);
        assert_eq!(summary.first_date, None);
    }

    #[test]
    fn test_summary_of_time_series() {
        let view = DashboardView {
            filtered_map_data: Vec::new(),
            time_series: vec![point(15, 100, 3), point(16, 250, 4)],
            show_time_series: true,
        };

        let summary = ViewSummary::from_view(&view);
        assert_eq!(summary.mean_willingness, None);
        assert_eq!(summary.total_cases, 350);
        assert_eq!(summary.total_deaths, 7);
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2023, 8, 15));
        assert_eq!(summary.last_date, NaiveDate::from_ymd_opt(2023, 8, 16));
    }

    #[test]
    fn test_hesitancy_case_breakdown() {
        let mut p = point(15, 1000, 0);
        p.hesitancy_breakdown = HesitancyBreakdown {
            low: 25.0,
            moderate: 33.3,
            high: 25.0,
            severe: 12.6,
        };

        let breakdown = hesitancy_case_breakdown(&p);
        assert_eq!(
            breakdown,
            vec![
                (HesitancyLevel::Low, 250),
                (HesitancyLevel::Moderate, 333),
                (HesitancyLevel::High, 250),
                (HesitancyLevel::Severe, 126),
            ]
        );
    }
}
