//! Fixture store: the in-memory data the dashboard is computed from.
//!
//! A store is either generated from a seed (see [`generator`]) or read
//! from a JSON file (see [`loader`]). Both paths go through
//! [`FixtureStore::new`], which validates the data once so the
//! aggregation engine never has to.

pub mod generator;
pub mod loader;

use crate::models::{
    AgeGroup, AudioAnalysis, Choice, Gender, HesitancyBreakdown, Region, SocialData,
    TimeSeriesPoint, VaccinationRecord,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::debug;

pub use generator::{generate, GeneratorOptions, MAX_GENERATED_DAYS};
pub use loader::{load_from_file, save_to_file};

/// Largest distance between a record's coordinates and its region's
/// fixed position that still counts as equal.
const COORDINATE_TOLERANCE: f64 = 1e-6;

/// Largest daily case or death count a series point may carry.
///
/// Summing every slice over the whole `NaiveDate` range stays below
/// `u64::MAX` with this bound.
pub const MAX_DAILY_COUNT: u64 = 10_000_000_000;

/// Rejection reasons for malformed fixture data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixtureError {
    #[error("no vaccination record for region '{0}'")]
    MissingRegion(Region),

    #[error("duplicate vaccination record for region '{0}'")]
    DuplicateRegion(Region),

    #[error("coordinates for region '{region}' do not match its map position")]
    CoordinateMismatch { region: Region },

    #[error("{field} for {context} is {value}, expected a percentage between 0 and 100")]
    PercentageOutOfRange {
        context: String,
        field: String,
        value: f64,
    },

    #[error("{field} for {context} is {value}, expected a finite non-negative number")]
    InvalidMeasure {
        context: String,
        field: String,
        value: f64,
    },

    #[error("{field} for {context} is {value}, expected at most {max}", max = MAX_DAILY_COUNT)]
    CountOutOfRange {
        context: String,
        field: String,
        value: u64,
    },

    #[error("{days} days from {start} run past the last representable date")]
    DateOutOfRange { start: NaiveDate, days: usize },

    #[error("cannot generate {days} days, the limit is {max}")]
    TooManyDays { days: usize, max: usize },

    #[error("no time series for {0}")]
    MissingSeries(String),

    #[error("duplicate date {date} in the {series} series")]
    DuplicateDate { series: String, date: NaiveDate },

    #[error("emotion point at {time}s is invalid: {reason}")]
    InvalidEmotionPoint { time: f64, reason: String },
}

/// Case/death series for every demographic slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemographicSeries {
    pub gender: BTreeMap<Gender, Vec<TimeSeriesPoint>>,
    pub age_groups: BTreeMap<AgeGroup, Vec<TimeSeriesPoint>>,
}

/// Shape of a fixture file before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFixtureStore {
    pub regions: Vec<VaccinationRecord>,
    pub demographics: DemographicSeries,
    #[serde(default)]
    pub social: SocialData,
    #[serde(default)]
    pub audio: AudioAnalysis,
}

/// Validated, read-only dashboard data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawFixtureStore")]
pub struct FixtureStore {
    regions: Vec<VaccinationRecord>,
    demographics: DemographicSeries,
    social: SocialData,
    audio: AudioAnalysis,
}

impl TryFrom<RawFixtureStore> for FixtureStore {
    type Error = FixtureError;

    fn try_from(raw: RawFixtureStore) -> Result<Self, Self::Error> {
        Self::new(raw.regions, raw.demographics, raw.social, raw.audio)
    }
}

impl FixtureStore {
    /// Build a store, rejecting malformed data.
    ///
    /// Region records keep the order they are given in.
    pub fn new(
        regions: Vec<VaccinationRecord>,
        demographics: DemographicSeries,
        social: SocialData,
        audio: AudioAnalysis,
    ) -> Result<Self, FixtureError> {
        validate_regions(&regions)?;
        validate_demographics(&demographics)?;
        validate_social(&social)?;
        validate_audio(&audio)?;

        debug!(
            "Fixture store validated: {} regions, {} gender and {} age-group series",
            regions.len(),
            demographics.gender.len(),
            demographics.age_groups.len()
        );

        Ok(Self {
            regions,
            demographics,
            social,
            audio,
        })
    }

    /// All region vaccination records, in store order.
    pub fn list_region_records(&self) -> &[VaccinationRecord] {
        &self.regions
    }

    pub fn series_by_gender(&self, gender: Gender) -> &[TimeSeriesPoint] {
        self.demographics
            .gender
            .get(&gender)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn series_by_age_group(&self, group: AgeGroup) -> &[TimeSeriesPoint] {
        self.demographics
            .age_groups
            .get(&group)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn social(&self) -> &SocialData {
        &self.social
    }

    pub fn audio(&self) -> &AudioAnalysis {
        &self.audio
    }
}

fn check_percentage(context: &str, field: &str, value: f64) -> Result<(), FixtureError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(FixtureError::PercentageOutOfRange {
            context: context.to_string(),
            field: field.to_string(),
            value,
        })
    }
}

fn check_measure(context: &str, field: &str, value: f64) -> Result<(), FixtureError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(FixtureError::InvalidMeasure {
            context: context.to_string(),
            field: field.to_string(),
            value,
        })
    }
}

fn check_count(context: &str, field: &str, value: u64) -> Result<(), FixtureError> {
    if value <= MAX_DAILY_COUNT {
        Ok(())
    } else {
        Err(FixtureError::CountOutOfRange {
            context: context.to_string(),
            field: field.to_string(),
            value,
        })
    }
}

fn check_hesitancy(context: &str, breakdown: &HesitancyBreakdown) -> Result<(), FixtureError> {
    for (level, value) in breakdown.iter() {
        check_percentage(context, &format!("{} hesitancy", level), value)?;
    }
    Ok(())
}

fn validate_regions(records: &[VaccinationRecord]) -> Result<(), FixtureError> {
    let mut seen = HashSet::new();

    for record in records {
        if !seen.insert(record.region) {
            return Err(FixtureError::DuplicateRegion(record.region));
        }

        let expected = record.region.coordinates();
        if (record.coordinates.latitude() - expected.latitude()).abs() > COORDINATE_TOLERANCE
            || (record.coordinates.longitude() - expected.longitude()).abs() > COORDINATE_TOLERANCE
        {
            return Err(FixtureError::CoordinateMismatch {
                region: record.region,
            });
        }

        let context = record.region.name();
        for (vaccine, value) in record.vaccine_types.iter() {
            check_percentage(context, vaccine.name(), value)?;
        }
        check_percentage(context, "willingness", record.willingness)?;
        check_hesitancy(context, &record.hesitancy)?;
    }

    // Every region in the closed set must be present.
    if let Some(missing) = Region::ALL.iter().find(|r| !seen.contains(*r)) {
        return Err(FixtureError::MissingRegion(*missing));
    }

    Ok(())
}

fn validate_series(series: &str, points: &[TimeSeriesPoint]) -> Result<(), FixtureError> {
    let mut dates = HashSet::new();

    for point in points {
        if !dates.insert(point.date) {
            return Err(FixtureError::DuplicateDate {
                series: series.to_string(),
                date: point.date,
            });
        }

        let context = format!("{} on {}", series, point.date);
        check_count(&context, "new cases", point.new_cases)?;
        check_count(&context, "deaths", point.deaths)?;
        check_measure(&context, "seven-day average", point.seven_day_average)?;
        check_measure(
            &context,
            "deaths seven-day average",
            point.deaths_seven_day_average,
        )?;
        check_hesitancy(&context, &point.hesitancy_breakdown)?;
    }

    Ok(())
}

fn validate_demographics(demographics: &DemographicSeries) -> Result<(), FixtureError> {
    for gender in Gender::ALL {
        let points = demographics
            .gender
            .get(&gender)
            .ok_or_else(|| FixtureError::MissingSeries(format!("gender {}", gender)))?;
        validate_series(gender.name(), points)?;
    }

    for group in AgeGroup::ALL {
        let points = demographics
            .age_groups
            .get(&group)
            .ok_or_else(|| FixtureError::MissingSeries(format!("age group {}", group)))?;
        validate_series(group.name(), points)?;
    }

    Ok(())
}

fn validate_social(social: &SocialData) -> Result<(), FixtureError> {
    for range in crate::models::TimeRange::ALL {
        for point in social.time_series.get(range) {
            let context = format!("social {:?} on {}", range, point.date);
            check_percentage(&context, "positive share", point.positive.percentage)?;
            check_percentage(&context, "negative share", point.negative.percentage)?;
            check_percentage(
                &context,
                "combined share",
                point.positive.percentage + point.negative.percentage,
            )?;
        }
    }

    for user in &social.users {
        check_percentage(
            &user.handle,
            "influence score",
            f64::from(user.influence_score),
        )?;
    }
    Ok(())
}

fn validate_audio(audio: &AudioAnalysis) -> Result<(), FixtureError> {
    for point in &audio.emotion_data {
        if !(-1.0..=1.0).contains(&point.emotion_score) {
            return Err(FixtureError::InvalidEmotionPoint {
                time: point.time,
                reason: format!("score {} is outside -1..1", point.emotion_score),
            });
        }
        if !point.time.is_finite() || point.time < 0.0 || point.time > audio.duration {
            return Err(FixtureError::InvalidEmotionPoint {
                time: point.time,
                reason: format!("outside the {}s recording", audio.duration),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FixtureStore {
        generate(&GeneratorOptions::default()).unwrap()
    }

    fn parts(
        store: &FixtureStore,
    ) -> (Vec<VaccinationRecord>, DemographicSeries, SocialData, AudioAnalysis) {
        (
            store.regions.clone(),
            store.demographics.clone(),
            store.social.clone(),
            store.audio.clone(),
        )
    }

    #[test]
    fn test_generated_store_is_valid() {
        let store = store();
        let (regions, demographics, social, audio) = parts(&store);
        assert!(FixtureStore::new(regions, demographics, social, audio).is_ok());
    }

    #[test]
    fn test_rejects_missing_region() {
        let (mut regions, demographics, social, audio) = parts(&store());
        regions.retain(|r| r.region != Region::NorthWest);

        let err = FixtureStore::new(regions, demographics, social, audio).unwrap_err();
        assert_eq!(err, FixtureError::MissingRegion(Region::NorthWest));
    }

    #[test]
    fn test_rejects_duplicate_region() {
        let (mut regions, demographics, social, audio) = parts(&store());
        regions.push(regions[0].clone());

        let err = FixtureStore::new(regions, demographics, social, audio).unwrap_err();
        assert_eq!(err, FixtureError::DuplicateRegion(Region::GreaterLondon));
    }

    #[test]
    fn test_rejects_out_of_range_percentage() {
        let (mut regions, demographics, social, audio) = parts(&store());
        regions[2].hesitancy.severe = 120.0;

        let err = FixtureStore::new(regions, demographics, social, audio).unwrap_err();
        assert!(matches!(err, FixtureError::PercentageOutOfRange { .. }));
        assert!(err.to_string().contains("Severe hesitancy"));
    }

    #[test]
    fn test_rejects_moved_coordinates() {
        let (mut regions, demographics, social, audio) = parts(&store());
        regions[0].coordinates = crate::models::Coordinates(0.0, 0.0);

        let err = FixtureStore::new(regions, demographics, social, audio).unwrap_err();
        assert_eq!(
            err,
            FixtureError::CoordinateMismatch {
                region: Region::GreaterLondon
            }
        );
    }

    #[test]
    fn test_rejects_missing_series() {
        let (regions, mut demographics, social, audio) = parts(&store());
        demographics.age_groups.remove(&AgeGroup::Age13To19);

        let err = FixtureStore::new(regions, demographics, social, audio).unwrap_err();
        assert!(matches!(err, FixtureError::MissingSeries(_)));
    }

    #[test]
    fn test_rejects_duplicate_date() {
        let (regions, mut demographics, social, audio) = parts(&store());
        let series = demographics.gender.get_mut(&Gender::Female).unwrap();
        let first = series[0].clone();
        series.push(first);

        let err = FixtureStore::new(regions, demographics, social, audio).unwrap_err();
        assert!(matches!(err, FixtureError::DuplicateDate { .. }));
    }

    #[test]
    fn test_rejects_negative_average() {
        let (regions, mut demographics, social, audio) = parts(&store());
        demographics.gender.get_mut(&Gender::Male).unwrap()[3].seven_day_average = -1.0;

        let err = FixtureStore::new(regions, demographics, social, audio).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidMeasure { .. }));
    }

    #[test]
    fn test_rejects_counts_that_could_overflow() {
        let (regions, mut demographics, social, audio) = parts(&store());
        for gender in Gender::ALL {
            demographics.gender.get_mut(&gender).unwrap()[0].new_cases = u64::MAX / 2 + 1;
        }

        let err = FixtureStore::new(regions, demographics, social, audio).unwrap_err();
        assert!(matches!(err, FixtureError::CountOutOfRange { value, .. } if value == u64::MAX / 2 + 1));
        assert!(err.to_string().contains("new cases"));
    }

    #[test]
    fn test_accepts_counts_at_the_bound() {
        let (regions, mut demographics, social, audio) = parts(&store());
        for series in demographics
            .gender
            .values_mut()
            .chain(demographics.age_groups.values_mut())
        {
            for point in series.iter_mut() {
                point.new_cases = MAX_DAILY_COUNT;
                point.deaths = MAX_DAILY_COUNT;
            }
        }

        let store = FixtureStore::new(regions, demographics, social, audio).unwrap();
        let series = crate::analysis::aggregate_time_series(
            &store,
            &Gender::ALL.into_iter().collect(),
            &AgeGroup::ALL.into_iter().collect(),
        );
        assert_eq!(series[0].new_cases, MAX_DAILY_COUNT * 7);
    }

    #[test]
    fn test_rejects_influence_score_over_100() {
        let (regions, demographics, mut social, audio) = parts(&store());
        social.users[0].influence_score = 101;

        let err = FixtureStore::new(regions, demographics, social, audio).unwrap_err();
        assert!(matches!(err, FixtureError::PercentageOutOfRange { .. }));
        assert!(err.to_string().contains("influence score"));
    }

    #[test]
    fn test_rejects_emotion_score_out_of_range() {
        let (regions, demographics, social, mut audio) = parts(&store());
        audio.emotion_data[1].emotion_score = 1.5;

        let err = FixtureStore::new(regions, demographics, social, audio).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidEmotionPoint { .. }));
    }

    #[test]
    fn test_series_accessors() {
        let store = store();
        assert_eq!(store.series_by_gender(Gender::Male).len(), 30);
        assert_eq!(store.series_by_age_group(AgeGroup::Age60Plus).len(), 30);
        assert_eq!(store.list_region_records().len(), Region::ALL.len());
    }
}
