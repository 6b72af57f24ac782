//! Map-data filtering and demographic time-series aggregation.
//!
//! Everything here is a pure function of its inputs: the fixture store is
//! only borrowed, and calling twice with the same arguments yields equal
//! output.

use crate::filter::FilterState;
use crate::fixtures::FixtureStore;
use crate::models::{AgeGroup, Gender, HesitancyLevel, Region, TimeSeriesPoint, VaccinationRecord};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Everything the presentation layer renders for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filtered_map_data: Vec<VaccinationRecord>,
    pub time_series: Vec<TimeSeriesPoint>,
    pub show_time_series: bool,
}

/// Filter region records for the map.
///
/// Records outside the selected region are dropped. In the records that
/// remain, every hesitancy level not in `hesitancy` is set to 0; the level
/// itself stays in the record. Vaccine uptake is passed through unchanged
/// and input order is preserved.
pub fn filter_map_data(
    records: &[VaccinationRecord],
    region: Option<Region>,
    hesitancy: &BTreeSet<HesitancyLevel>,
) -> Vec<VaccinationRecord> {
    records
        .iter()
        .filter(|record| region.map_or(true, |r| record.region == r))
        .map(|record| {
            let mut filtered = record.clone();
            for level in HesitancyLevel::ALL {
                if !hesitancy.contains(&level) {
                    *filtered.hesitancy.get_mut(level) = 0.0;
                }
            }
            filtered
        })
        .collect()
}

/// Sum the selected demographic slices into one series per date.
///
/// Gender and age-group slices are added together point by point, so
/// selecting both a gender and an age group counts overlapping population
/// twice. The result is ascending by date, and empty when no slice is
/// selected.
pub fn aggregate_time_series(
    store: &FixtureStore,
    genders: &BTreeSet<Gender>,
    age_groups: &BTreeSet<AgeGroup>,
) -> Vec<TimeSeriesPoint> {
    if genders.is_empty() && age_groups.is_empty() {
        return Vec::new();
    }

    let slices = genders
        .iter()
        .map(|&gender| store.series_by_gender(gender))
        .chain(age_groups.iter().map(|&group| store.series_by_age_group(group)));

    let mut by_date: BTreeMap<_, TimeSeriesPoint> = BTreeMap::new();
    for series in slices {
        for point in series {
            by_date
                .entry(point.date)
                .or_insert_with(|| TimeSeriesPoint::zeroed(point.date))
                .accumulate(point);
        }
    }

    by_date.into_values().collect()
}

/// Whether the dashboard shows the time series instead of the map.
pub fn show_time_series(filter: &FilterState) -> bool {
    filter.demographics_active()
}

/// Compute the full dashboard view for `filter`.
pub fn evaluate(store: &FixtureStore, filter: &FilterState) -> DashboardView {
    let filtered_map_data =
        filter_map_data(store.list_region_records(), filter.region, &filter.hesitancy);
    let time_series = aggregate_time_series(store, &filter.genders, &filter.age_groups);
    let show_time_series = show_time_series(filter);

    debug!(
        "Evaluated view: {} map records, {} time-series points, show_time_series={}",
        filtered_map_data.len(),
        time_series.len(),
        show_time_series
    );

    DashboardView {
        filtered_map_data,
        time_series,
        show_time_series,
    }
}
