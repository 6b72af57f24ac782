//! Data models for the health dashboard.
//!
//! This module contains the closed enumerations (regions, vaccine types,
//! hesitancy levels, demographic slices) and the record types the fixture
//! store holds and the aggregation engine produces.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a name does not match any member of a closed set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// A closed set of named values.
///
/// Every enum in this module implements it so that parsing and listing
/// work the same way for all of them.
pub trait Choice: Copy + Sized + 'static {
    /// Human-readable kind, used in error messages.
    const KIND: &'static str;

    /// Every member, in enumeration order.
    fn all() -> &'static [Self];

    /// Display name of this member.
    fn name(&self) -> &'static str;
}

/// Parse a display name into a member of `T`.
///
/// Matching ignores ASCII case, and `-`, `_` and spaces are treated alike,
/// so `greater-london` and `Greater London` both resolve.
pub fn parse_choice<T: Choice>(value: &str) -> Result<T, ParseError> {
    let wanted = normalize(value);

    T::all()
        .iter()
        .copied()
        .find(|member| normalize(member.name()) == wanted)
        .ok_or_else(|| ParseError {
            kind: T::KIND,
            value: value.to_string(),
            expected: T::all()
                .iter()
                .map(|m| m.name())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            '-' | '_' => ' ',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// Latitude/longitude pair used to position a region on the map.
///
/// Serialized as a two-element array `[lat, lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates(pub f64, pub f64);

impl Coordinates {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }
}

/// English NHS region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    #[serde(rename = "Greater London")]
    GreaterLondon,
    #[serde(rename = "South East")]
    SouthEast,
    #[serde(rename = "South West")]
    SouthWest,
    #[serde(rename = "East of England")]
    EastOfEngland,
    #[serde(rename = "West Midlands")]
    WestMidlands,
    #[serde(rename = "East Midlands")]
    EastMidlands,
    #[serde(rename = "Yorkshire and the Humber")]
    YorkshireAndTheHumber,
    #[serde(rename = "North West")]
    NorthWest,
    #[serde(rename = "North East")]
    NorthEast,
}

impl Region {
    pub const ALL: [Region; 9] = [
        Region::GreaterLondon,
        Region::SouthEast,
        Region::SouthWest,
        Region::EastOfEngland,
        Region::WestMidlands,
        Region::EastMidlands,
        Region::YorkshireAndTheHumber,
        Region::NorthWest,
        Region::NorthEast,
    ];

    /// Fixed map position of the region.
    pub fn coordinates(&self) -> Coordinates {
        match self {
            Region::GreaterLondon => Coordinates(51.5074, -0.1278),
            Region::SouthEast => Coordinates(51.1781, -0.5698),
            Region::SouthWest => Coordinates(50.7772, -3.9995),
            Region::EastOfEngland => Coordinates(52.1911, 0.1927),
            Region::WestMidlands => Coordinates(52.4862, -1.8904),
            Region::EastMidlands => Coordinates(52.8306, -1.3321),
            Region::YorkshireAndTheHumber => Coordinates(53.9591, -1.0792),
            Region::NorthWest => Coordinates(53.4084, -2.9916),
            Region::NorthEast => Coordinates(54.9783, -1.6178),
        }
    }
}

impl Choice for Region {
    const KIND: &'static str = "region";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn name(&self) -> &'static str {
        match self {
            Region::GreaterLondon => "Greater London",
            Region::SouthEast => "South East",
            Region::SouthWest => "South West",
            Region::EastOfEngland => "East of England",
            Region::WestMidlands => "West Midlands",
            Region::EastMidlands => "East Midlands",
            Region::YorkshireAndTheHumber => "Yorkshire and the Humber",
            Region::NorthWest => "North West",
            Region::NorthEast => "North East",
        }
    }
}

/// Vaccine product tracked on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VaccineType {
    #[serde(rename = "Moderna COVID MRNA")]
    Moderna,
    #[serde(rename = "Pfizer COVID MRNA")]
    Pfizer,
    #[serde(rename = "MonkeyPox MRNA")]
    MonkeyPox,
    #[serde(rename = "Astra Zenica COVID MRNA")]
    AstraZenica,
}

impl VaccineType {
    pub const ALL: [VaccineType; 4] = [
        VaccineType::Moderna,
        VaccineType::Pfizer,
        VaccineType::MonkeyPox,
        VaccineType::AstraZenica,
    ];
}

impl Choice for VaccineType {
    const KIND: &'static str = "vaccine type";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn name(&self) -> &'static str {
        match self {
            VaccineType::Moderna => "Moderna COVID MRNA",
            VaccineType::Pfizer => "Pfizer COVID MRNA",
            VaccineType::MonkeyPox => "MonkeyPox MRNA",
            VaccineType::AstraZenica => "Astra Zenica COVID MRNA",
        }
    }
}

/// Ordinal category of reluctance toward vaccination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HesitancyLevel {
    Low,
    Moderate,
    High,
    Severe,
}

impl HesitancyLevel {
    pub const ALL: [HesitancyLevel; 4] = [
        HesitancyLevel::Low,
        HesitancyLevel::Moderate,
        HesitancyLevel::High,
        HesitancyLevel::Severe,
    ];
}

impl Choice for HesitancyLevel {
    const KIND: &'static str = "hesitancy level";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn name(&self) -> &'static str {
        match self {
            HesitancyLevel::Low => "Low",
            HesitancyLevel::Moderate => "Moderate",
            HesitancyLevel::High => "High",
            HesitancyLevel::Severe => "Severe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];
}

impl Choice for Gender {
    const KIND: &'static str = "gender";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn name(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "1-12")]
    Age1To12,
    #[serde(rename = "13-19")]
    Age13To19,
    #[serde(rename = "20-40")]
    Age20To40,
    #[serde(rename = "41-60")]
    Age41To60,
    #[serde(rename = "60+")]
    Age60Plus,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 5] = [
        AgeGroup::Age1To12,
        AgeGroup::Age13To19,
        AgeGroup::Age20To40,
        AgeGroup::Age41To60,
        AgeGroup::Age60Plus,
    ];
}

impl Choice for AgeGroup {
    const KIND: &'static str = "age group";

    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn name(&self) -> &'static str {
        match self {
            AgeGroup::Age1To12 => "1-12",
            AgeGroup::Age13To19 => "13-19",
            AgeGroup::Age20To40 => "20-40",
            AgeGroup::Age41To60 => "41-60",
            AgeGroup::Age60Plus => "60+",
        }
    }
}

impl FromStr for Region {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s)
    }
}

impl FromStr for VaccineType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s)
    }
}

impl FromStr for HesitancyLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s)
    }
}

impl FromStr for Gender {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s)
    }
}

impl FromStr for AgeGroup {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(s)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for VaccineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for HesitancyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Percentage share per hesitancy level.
///
/// One field per level, so a value for every level is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HesitancyBreakdown {
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Moderate")]
    pub moderate: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Severe")]
    pub severe: f64,
}

impl HesitancyBreakdown {
    pub fn get(&self, level: HesitancyLevel) -> f64 {
        match level {
            HesitancyLevel::Low => self.low,
            HesitancyLevel::Moderate => self.moderate,
            HesitancyLevel::High => self.high,
            HesitancyLevel::Severe => self.severe,
        }
    }

    pub fn get_mut(&mut self, level: HesitancyLevel) -> &mut f64 {
        match level {
            HesitancyLevel::Low => &mut self.low,
            HesitancyLevel::Moderate => &mut self.moderate,
            HesitancyLevel::High => &mut self.high,
            HesitancyLevel::Severe => &mut self.severe,
        }
    }

    /// Iterate `(level, value)` pairs in level order.
    pub fn iter(&self) -> impl Iterator<Item = (HesitancyLevel, f64)> + '_ {
        HesitancyLevel::ALL.iter().map(move |&level| (level, self.get(level)))
    }

    #[allow(dead_code)]
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, value)| value).sum()
    }
}

impl AddAssign for HesitancyBreakdown {
    fn add_assign(&mut self, other: Self) {
        for level in HesitancyLevel::ALL {
            *self.get_mut(level) += other.get(level);
        }
    }
}

/// Adoption percentage per vaccine type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VaccineUptake {
    #[serde(rename = "Moderna COVID MRNA")]
    pub moderna: f64,
    #[serde(rename = "Pfizer COVID MRNA")]
    pub pfizer: f64,
    #[serde(rename = "MonkeyPox MRNA")]
    pub monkeypox: f64,
    #[serde(rename = "Astra Zenica COVID MRNA")]
    pub astra_zenica: f64,
}

impl VaccineUptake {
    pub fn get(&self, vaccine: VaccineType) -> f64 {
        match vaccine {
            VaccineType::Moderna => self.moderna,
            VaccineType::Pfizer => self.pfizer,
            VaccineType::MonkeyPox => self.monkeypox,
            VaccineType::AstraZenica => self.astra_zenica,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (VaccineType, f64)> + '_ {
        VaccineType::ALL.iter().map(move |&v| (v, self.get(v)))
    }
}

/// Vaccination figures for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaccinationRecord {
    pub region: Region,
    pub coordinates: Coordinates,
    pub vaccine_types: VaccineUptake,
    /// Overall willingness to vaccinate, 0-100.
    pub willingness: f64,
    pub hesitancy: HesitancyBreakdown,
}

/// Daily case/death figures for one demographic slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub new_cases: u64,
    pub deaths: u64,
    pub seven_day_average: f64,
    pub deaths_seven_day_average: f64,
    pub hesitancy_breakdown: HesitancyBreakdown,
}

impl TimeSeriesPoint {
    /// An all-zero point for `date`, used as an accumulator.
    pub fn zeroed(date: NaiveDate) -> Self {
        Self {
            date,
            new_cases: 0,
            deaths: 0,
            seven_day_average: 0.0,
            deaths_seven_day_average: 0.0,
            hesitancy_breakdown: HesitancyBreakdown::default(),
        }
    }

    /// Add every measure of `other` into this point. The date is kept.
    ///
    /// Counts of a validated store are bounded by
    /// [`MAX_DAILY_COUNT`](crate::fixtures::MAX_DAILY_COUNT), so sums over
    /// every slice and date stay well inside `u64`.
    pub fn accumulate(&mut self, other: &TimeSeriesPoint) {
        self.new_cases += other.new_cases;
        self.deaths += other.deaths;
        self.seven_day_average += other.seven_day_average;
        self.deaths_seven_day_average += other.deaths_seven_day_average;
        self.hesitancy_breakdown += other.hesitancy_breakdown;
    }
}

/// Social-media reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Day,
    Week,
    Month,
}

impl TimeRange {
    pub const ALL: [TimeRange; 3] = [TimeRange::Day, TimeRange::Week, TimeRange::Month];

    /// Number of daily points the window covers.
    pub fn days(&self) -> usize {
        match self {
            TimeRange::Day => 1,
            TimeRange::Week => 7,
            TimeRange::Month => 30,
        }
    }
}

/// Headline engagement for one sentiment, with the previous period for comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMetrics {
    pub views: u64,
    pub likes: u64,
    pub reposts: u64,
    pub previous_views: u64,
    pub previous_likes: u64,
    pub previous_reposts: u64,
}

impl SocialMetrics {
    /// Percent change of views against the previous period.
    ///
    /// Returns `None` when there is no previous value to compare with.
    pub fn views_change(&self) -> Option<f64> {
        percent_change(self.views, self.previous_views)
    }

    pub fn likes_change(&self) -> Option<f64> {
        percent_change(self.likes, self.previous_likes)
    }

    pub fn reposts_change(&self) -> Option<f64> {
        percent_change(self.reposts, self.previous_reposts)
    }
}

fn percent_change(current: u64, previous: u64) -> Option<f64> {
    if previous == 0 {
        return None;
    }
    Some((current as f64 - previous as f64) / previous as f64 * 100.0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentShare {
    pub percentage: f64,
    pub views: u64,
    pub likes: u64,
    pub reposts: u64,
}

/// Daily engagement totals split by sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialTimeSeriesPoint {
    pub date: NaiveDate,
    pub total_views: u64,
    pub total_likes: u64,
    pub total_reposts: u64,
    pub positive: SentimentShare,
    pub negative: SentimentShare,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentMetrics {
    pub positive: SocialMetrics,
    pub negative: SocialMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialTimeSeries {
    pub day: Vec<SocialTimeSeriesPoint>,
    pub week: Vec<SocialTimeSeriesPoint>,
    pub month: Vec<SocialTimeSeriesPoint>,
}

impl SocialTimeSeries {
    pub fn get(&self, range: TimeRange) -> &[SocialTimeSeriesPoint] {
        match range {
            TimeRange::Day => &self.day,
            TimeRange::Week => &self.week,
            TimeRange::Month => &self.month,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sentiment::Positive => "Positive",
            Sentiment::Negative => "Negative",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetMetrics {
    pub views: u64,
    pub likes: u64,
    pub reposts: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub content: String,
    pub timestamp: NaiveDateTime,
    pub metrics: TweetMetrics,
}

/// An account whose posts drive one side of the sentiment split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialUser {
    pub name: String,
    pub handle: String,
    /// Influence score, 0-100.
    pub influence_score: u8,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub tweets: Vec<Tweet>,
}

/// Social-media sentiment fixture.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialData {
    pub metrics: SentimentMetrics,
    #[serde(default)]
    pub users: Vec<SocialUser>,
    pub time_series: SocialTimeSeries,
}

impl SocialData {
    /// Users of one sentiment, highest influence first.
    ///
    /// Users with equal scores keep their fixture order.
    pub fn ranked_users(&self, sentiment: Sentiment) -> Vec<&SocialUser> {
        let mut users: Vec<&SocialUser> = self
            .users
            .iter()
            .filter(|u| u.sentiment == sentiment)
            .collect();
        users.sort_by(|a, b| b.influence_score.cmp(&a.influence_score));
        users
    }
}

/// One sample of an audio emotion track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionPoint {
    /// Offset into the recording, in seconds.
    pub time: f64,
    /// Score from -1 (negative) to 1 (positive).
    pub emotion_score: f64,
    #[serde(default)]
    pub is_hesitancy_point: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
}

/// Pre-baked emotion analysis of a recorded consultation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAnalysis {
    pub file_name: String,
    /// Total duration in seconds.
    pub duration: f64,
    pub emotion_data: Vec<EmotionPoint>,
}

impl AudioAnalysis {
    /// Points flagged as moments of vaccine hesitancy.
    pub fn hesitancy_points(&self) -> impl Iterator<Item = &EmotionPoint> {
        self.emotion_data.iter().filter(|p| p.is_hesitancy_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_parsing() {
        assert_eq!("Greater London".parse::<Region>(), Ok(Region::GreaterLondon));
        assert_eq!("greater-london".parse::<Region>(), Ok(Region::GreaterLondon));
        assert_eq!(
            "yorkshire and the humber".parse::<Region>(),
            Ok(Region::YorkshireAndTheHumber)
        );
        assert!("Scotland".parse::<Region>().is_err());
    }

    #[test]
    fn test_parse_error_lists_expected() {
        let err = "Extreme".parse::<HesitancyLevel>().unwrap_err();
        assert_eq!(err.kind, "hesitancy level");
        assert!(err.to_string().contains("Low, Moderate, High, Severe"));
    }

    #[test]
    fn test_age_group_parsing() {
        assert_eq!("60+".parse::<AgeGroup>(), Ok(AgeGroup::Age60Plus));
        assert_eq!("1-12".parse::<AgeGroup>(), Ok(AgeGroup::Age1To12));
        assert_eq!(" 20-40 ".parse::<AgeGroup>(), Ok(AgeGroup::Age20To40));
        assert!("12-20".parse::<AgeGroup>().is_err());
    }

    #[test]
    fn test_vaccine_display_round_trips_through_parse() {
        for vaccine in VaccineType::ALL {
            assert_eq!(vaccine.to_string().parse::<VaccineType>(), Ok(vaccine));
        }
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Region::EastOfEngland).unwrap(),
            "\"East of England\""
        );
        assert_eq!(serde_json::to_string(&AgeGroup::Age60Plus).unwrap(), "\"60+\"");
        let level: HesitancyLevel = serde_json::from_str("\"Severe\"").unwrap();
        assert_eq!(level, HesitancyLevel::Severe);
    }

    #[test]
    fn test_every_region_has_coordinates() {
        for region in Region::ALL {
            let coords = region.coordinates();
            assert!((49.0..56.0).contains(&coords.latitude()), "{}", region);
            assert!((-6.0..2.0).contains(&coords.longitude()), "{}", region);
        }
    }

    #[test]
    fn test_hesitancy_breakdown_access() {
        let mut breakdown = HesitancyBreakdown {
            low: 25.0,
            moderate: 30.0,
            high: 25.0,
            severe: 10.0,
        };
        assert_eq!(breakdown.get(HesitancyLevel::High), 25.0);
        assert_eq!(breakdown.total(), 90.0);

        *breakdown.get_mut(HesitancyLevel::Severe) = 0.0;
        assert_eq!(breakdown.severe, 0.0);

        breakdown += HesitancyBreakdown {
            low: 1.0,
            moderate: 2.0,
            high: 3.0,
            severe: 4.0,
        };
        assert_eq!(
            breakdown.iter().map(|(_, v)| v).collect::<Vec<_>>(),
            vec![26.0, 32.0, 28.0, 4.0]
        );
    }

    #[test]
    fn test_breakdown_rejects_missing_level() {
        let json = r#"{"Low": 25, "Moderate": 30, "High": 25}"#;
        assert!(serde_json::from_str::<HesitancyBreakdown>(json).is_err());
    }

    #[test]
    fn test_time_series_point_accumulate() {
        let date = NaiveDate::from_ymd_opt(2023, 8, 15).unwrap();
        let mut acc = TimeSeriesPoint::zeroed(date);
        let point = TimeSeriesPoint {
            date,
            new_cases: 100,
            deaths: 2,
            seven_day_average: 80.0,
            deaths_seven_day_average: 1.5,
            hesitancy_breakdown: HesitancyBreakdown {
                low: 25.0,
                moderate: 30.0,
                high: 25.0,
                severe: 10.0,
            },
        };

        acc.accumulate(&point);
        acc.accumulate(&point);

        assert_eq!(acc.new_cases, 200);
        assert_eq!(acc.deaths, 4);
        assert_eq!(acc.seven_day_average, 160.0);
        assert_eq!(acc.deaths_seven_day_average, 3.0);
        assert_eq!(acc.hesitancy_breakdown.moderate, 60.0);
    }

    #[test]
    fn test_time_series_point_json_shape() {
        let point = TimeSeriesPoint::zeroed(NaiveDate::from_ymd_opt(2023, 8, 15).unwrap());
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"date\":\"2023-08-15\""));
        assert!(json.contains("\"newCases\""));
        assert!(json.contains("\"deathsSevenDayAverage\""));
        assert!(json.contains("\"hesitancyBreakdown\""));
    }

    #[test]
    fn test_coordinates_serialize_as_pair() {
        let json = serde_json::to_string(&Coordinates(51.5, -0.1)).unwrap();
        assert_eq!(json, "[51.5,-0.1]");
    }

    #[test]
    fn test_social_metrics_change() {
        let metrics = SocialMetrics {
            views: 120,
            previous_views: 100,
            likes: 50,
            previous_likes: 0,
            ..Default::default()
        };
        assert_eq!(metrics.views_change(), Some(20.0));
        assert_eq!(metrics.likes_change(), None);
    }

    #[test]
    fn test_time_range_days() {
        assert_eq!(
            TimeRange::ALL.iter().map(|r| r.days()).collect::<Vec<_>>(),
            vec![1, 7, 30]
        );
    }

    fn user(handle: &str, influence_score: u8, sentiment: Sentiment) -> SocialUser {
        SocialUser {
            name: handle.to_string(),
            handle: handle.to_string(),
            influence_score,
            sentiment,
            tweets: Vec::new(),
        }
    }

    #[test]
    fn test_ranked_users() {
        let social = SocialData {
            users: vec![
                user("@a", 70, Sentiment::Positive),
                user("@b", 90, Sentiment::Negative),
                user("@c", 88, Sentiment::Positive),
                user("@d", 70, Sentiment::Positive),
            ],
            ..Default::default()
        };

        let positive: Vec<&str> = social
            .ranked_users(Sentiment::Positive)
            .iter()
            .map(|u| u.handle.as_str())
            .collect();
        assert_eq!(positive, vec!["@c", "@a", "@d"]);
        assert_eq!(social.ranked_users(Sentiment::Negative).len(), 1);
    }
}
