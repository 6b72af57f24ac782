//! Deterministic mock-data generation.
//!
//! Every random draw comes from a `StdRng` seeded with
//! [`GeneratorOptions::seed`], so equal options always produce an equal
//! store.

use super::{DemographicSeries, FixtureError, FixtureStore};
use crate::models::{
    AgeGroup, AudioAnalysis, EmotionPoint, Gender, HesitancyBreakdown, Region, Sentiment,
    SentimentMetrics, SentimentShare, SocialData, SocialMetrics, SocialTimeSeries,
    SocialTimeSeriesPoint, SocialUser, TimeRange, TimeSeriesPoint, Tweet, TweetMetrics,
    VaccinationRecord, VaccineUptake,
};
use chrono::{Duration, NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Longest case series the generator produces (100 years).
pub const MAX_GENERATED_DAYS: usize = 36_600;

/// Parameters for generating a fixture store.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOptions {
    pub seed: u64,
    /// Number of daily points in every case series.
    pub days: usize,
    /// Date of the first point.
    pub start_date: NaiveDate,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            days: default_days(),
            start_date: default_start_date(),
        }
    }
}

pub fn default_seed() -> u64 {
    42
}

pub fn default_days() -> usize {
    30
}

pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 8, 15).expect("2023-08-15 is a valid date")
}

/// Share of the base series attributed to each gender (cases and deaths alike).
fn gender_factor(gender: Gender) -> f64 {
    match gender {
        Gender::Male => 0.48,
        Gender::Female => 0.52,
    }
}

/// `(cases factor, deaths factor)` for each age group.
fn age_group_factors(group: AgeGroup) -> (f64, f64) {
    match group {
        AgeGroup::Age1To12 => (0.15, 0.05),
        AgeGroup::Age13To19 => (0.2, 0.1),
        AgeGroup::Age20To40 => (0.3, 0.2),
        AgeGroup::Age41To60 => (0.25, 0.3),
        AgeGroup::Age60Plus => (0.1, 0.35),
    }
}

impl GeneratorOptions {
    /// Check that every date the generator would produce is representable.
    pub fn check(&self) -> Result<(), FixtureError> {
        if self.days > MAX_GENERATED_DAYS {
            return Err(FixtureError::TooManyDays {
                days: self.days,
                max: MAX_GENERATED_DAYS,
            });
        }

        let longest_window = TimeRange::ALL.iter().map(|r| r.days()).max().unwrap_or(0);
        let end = offset_date(self.start_date, self.days.saturating_sub(1) as i64);
        let earliest = end.and_then(|end| offset_date(end, 1 - longest_window as i64));
        match earliest {
            Some(_) => Ok(()),
            None => Err(FixtureError::DateOutOfRange {
                start: self.start_date,
                days: self.days,
            }),
        }
    }
}

/// Generate a complete, validated fixture store.
///
/// Fails when `days` exceeds [`MAX_GENERATED_DAYS`] or the series would
/// run past the last date `NaiveDate` can represent.
pub fn generate(options: &GeneratorOptions) -> Result<FixtureStore, FixtureError> {
    options.check()?;
    let out_of_range = || FixtureError::DateOutOfRange {
        start: options.start_date,
        days: options.days,
    };

    let mut rng = StdRng::seed_from_u64(options.seed);

    let dates = (0..options.days)
        .map(|i| offset_date(options.start_date, i as i64))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(out_of_range)?;
    let base = base_series(&mut rng, &dates);

    let mut demographics = DemographicSeries::default();
    for gender in Gender::ALL {
        let factor = gender_factor(gender);
        demographics
            .gender
            .insert(gender, scale_series(&base, factor, factor));
    }
    for group in AgeGroup::ALL {
        let (cases, deaths) = age_group_factors(group);
        demographics
            .age_groups
            .insert(group, scale_series(&base, cases, deaths));
    }

    let regions: Vec<VaccinationRecord> = Region::ALL
        .iter()
        .map(|&region| region_record(&mut rng, region))
        .collect();

    let end_date = base.last().map_or(options.start_date, |p| p.date);
    let social = social_data(&mut rng, end_date).ok_or_else(out_of_range)?;

    debug!(
        "Generated fixtures with seed {}: {} days from {}",
        options.seed, options.days, options.start_date
    );

    FixtureStore::new(regions, demographics, social, consultation_audio())
}

fn random_hesitancy(rng: &mut StdRng) -> HesitancyBreakdown {
    HesitancyBreakdown {
        low: (25 + rng.gen_range(0..10)) as f64,
        moderate: (30 + rng.gen_range(0..10)) as f64,
        high: (25 + rng.gen_range(0..10)) as f64,
        severe: (10 + rng.gen_range(0..5)) as f64,
    }
}

/// `date` moved by `days`, or `None` outside the representable range.
fn offset_date(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|d| date.checked_add_signed(d))
}

fn base_series(rng: &mut StdRng, dates: &[NaiveDate]) -> Vec<TimeSeriesPoint> {
    dates
        .iter()
        .map(|&date| {
            let new_cases = (rng.gen::<f64>() * 100_000.0 + 20_000.0).floor() as u64;
            // 1-3% of cases
            let deaths = (new_cases as f64 * (rng.gen::<f64>() * 0.02 + 0.01)).floor() as u64;

            TimeSeriesPoint {
                date,
                new_cases,
                deaths,
                seven_day_average: (rng.gen::<f64>() * 80_000.0 + 40_000.0).floor(),
                deaths_seven_day_average: (rng.gen::<f64>() * 2_000.0 + 1_000.0).floor(),
                hesitancy_breakdown: random_hesitancy(rng),
            }
        })
        .collect()
}

fn scale_series(base: &[TimeSeriesPoint], cases: f64, deaths: f64) -> Vec<TimeSeriesPoint> {
    base.iter()
        .map(|point| TimeSeriesPoint {
            date: point.date,
            new_cases: (point.new_cases as f64 * cases).floor() as u64,
            deaths: (point.deaths as f64 * deaths).floor() as u64,
            seven_day_average: (point.seven_day_average * cases).floor(),
            deaths_seven_day_average: (point.deaths_seven_day_average * deaths).floor(),
            hesitancy_breakdown: point.hesitancy_breakdown,
        })
        .collect()
}

fn region_record(rng: &mut StdRng, region: Region) -> VaccinationRecord {
    VaccinationRecord {
        region,
        coordinates: region.coordinates(),
        vaccine_types: VaccineUptake {
            moderna: (35 + rng.gen_range(0..20)) as f64,
            pfizer: (40 + rng.gen_range(0..20)) as f64,
            monkeypox: (15 + rng.gen_range(0..20)) as f64,
            astra_zenica: (30 + rng.gen_range(0..20)) as f64,
        },
        willingness: (70 + rng.gen_range(0..20)) as f64,
        hesitancy: random_hesitancy(rng),
    }
}

fn sentiment_share(percentage: u64, views: u64, likes: u64, reposts: u64) -> SentimentShare {
    SentimentShare {
        percentage: percentage as f64,
        views: views * percentage / 100,
        likes: likes * percentage / 100,
        reposts: reposts * percentage / 100,
    }
}

fn social_series(
    rng: &mut StdRng,
    end: NaiveDate,
    days: usize,
) -> Option<Vec<SocialTimeSeriesPoint>> {
    (0..days)
        .map(|i| {
            let date = offset_date(end, -((days - 1 - i) as i64))?;
            let positive = rng.gen_range(30..70);
            let negative = 100 - positive;

            let total_views = rng.gen_range(160_000..240_000);
            let total_likes = rng.gen_range(50_000..85_000);
            let total_reposts = rng.gen_range(15_000..28_000);

            Some(SocialTimeSeriesPoint {
                date,
                total_views,
                total_likes,
                total_reposts,
                positive: sentiment_share(positive, total_views, total_likes, total_reposts),
                negative: sentiment_share(negative, total_views, total_likes, total_reposts),
            })
        })
        .collect()
}

fn headline(share: &SentimentShare, previous_factor: f64) -> SocialMetrics {
    SocialMetrics {
        views: share.views,
        likes: share.likes,
        reposts: share.reposts,
        previous_views: (share.views as f64 * previous_factor).floor() as u64,
        previous_likes: (share.likes as f64 * previous_factor).floor() as u64,
        previous_reposts: (share.reposts as f64 * previous_factor).floor() as u64,
    }
}

/// Accounts listed on the social page: name, handle, influence score, sentiment.
const INFLUENCERS: [(&str, &str, u8, Sentiment); 10] = [
    ("Sarah Johnson", "@sarahj_health", 88, Sentiment::Positive),
    ("Dr. Michael Chen", "@dr_chen_med", 84, Sentiment::Positive),
    ("Emma Williams", "@emma_wellness", 82, Sentiment::Positive),
    ("James Wilson", "@jwilson_health", 70, Sentiment::Positive),
    ("Lisa Brown", "@lisa_healthcare", 69, Sentiment::Positive),
    ("Robert Smith", "@rob_smith", 88, Sentiment::Negative),
    ("Anna Martinez", "@anna_m", 84, Sentiment::Negative),
    ("David Lee", "@david_lee", 82, Sentiment::Negative),
    ("Rachel Green", "@rachel_g", 70, Sentiment::Negative),
    ("Tom Anderson", "@tom_anderson", 69, Sentiment::Negative),
];

const TWEETS_PER_USER: usize = 3;

fn tweet_content(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => {
            "The new NHS vaccination program has shown remarkable success in reducing \
             infection rates. Great to see such positive results! #NHS #Healthcare"
        }
        Sentiment::Negative => {
            "Concerned about the long waiting times at local NHS facilities. We need better \
             resource allocation. #NHSCrisis"
        }
    }
}

fn tweets(rng: &mut StdRng, handle: &str, sentiment: Sentiment, day: NaiveDate) -> Vec<Tweet> {
    // (views, likes, reposts) floors
    let (views, likes, reposts) = match sentiment {
        Sentiment::Positive => (10_000, 5_000, 2_000),
        Sentiment::Negative => (8_000, 4_000, 1_500),
    };

    (0..TWEETS_PER_USER)
        .map(|i| Tweet {
            id: format!("tweet-{}-{}", handle.trim_start_matches('@'), i),
            content: tweet_content(sentiment).to_string(),
            timestamp: day.and_time(NaiveTime::MIN),
            metrics: TweetMetrics {
                views: views + rng.gen_range(0..5_000),
                likes: likes + rng.gen_range(0..2_000),
                reposts: reposts + rng.gen_range(0..1_000),
            },
        })
        .collect()
}

fn influencers(rng: &mut StdRng, day: NaiveDate) -> Vec<SocialUser> {
    INFLUENCERS
        .iter()
        .map(|&(name, handle, influence_score, sentiment)| SocialUser {
            name: name.to_string(),
            handle: handle.to_string(),
            influence_score,
            sentiment,
            tweets: tweets(rng, handle, sentiment, day),
        })
        .collect()
}

fn social_data(rng: &mut StdRng, end: NaiveDate) -> Option<SocialData> {
    let mut time_series = SocialTimeSeries::default();
    for range in TimeRange::ALL {
        let points = social_series(rng, end, range.days())?;
        match range {
            TimeRange::Day => time_series.day = points,
            TimeRange::Week => time_series.week = points,
            TimeRange::Month => time_series.month = points,
        }
    }

    let metrics = time_series
        .day
        .first()
        .map(|today| SentimentMetrics {
            positive: headline(&today.positive, 0.8),
            negative: headline(&today.negative, 1.2),
        })
        .unwrap_or_default();

    let users = influencers(rng, end);

    Some(SocialData {
        metrics,
        users,
        time_series,
    })
}

fn emotion(time: f64, emotion_score: f64) -> EmotionPoint {
    EmotionPoint {
        time,
        emotion_score,
        is_hesitancy_point: false,
        speech: None,
        ai_analysis: None,
    }
}

fn hesitancy_moment(time: f64, emotion_score: f64, speech: &str, analysis: &str) -> EmotionPoint {
    EmotionPoint {
        time,
        emotion_score,
        is_hesitancy_point: true,
        speech: Some(speech.to_string()),
        ai_analysis: Some(analysis.to_string()),
    }
}

/// The recorded consultation shown on the audio-emotion page.
fn consultation_audio() -> AudioAnalysis {
    AudioAnalysis {
        file_name: "patient_consultation_01.mp3".to_string(),
        duration: 180.0,
        emotion_data: vec![
            emotion(0.0, 0.0),
            emotion(15.0, 0.2),
            emotion(30.0, 0.1),
            hesitancy_moment(
                45.0,
                -0.3,
                "I've heard some stories about vaccine side effects that worry me...",
                "Patient expresses anxiety about vaccine safety based on anecdotal evidence, \
                 indicating potential information gap that needs addressing.",
            ),
            emotion(60.0, -0.2),
            emotion(75.0, 0.0),
            hesitancy_moment(
                90.0,
                -0.4,
                "My friend got really sick after the shot, and I'm not sure if it's worth the risk.",
                "Personal experience of acquaintance is influencing risk assessment, showing \
                 need for statistical context and risk-benefit explanation.",
            ),
            emotion(105.0, -0.3),
            emotion(120.0, -0.1),
            emotion(135.0, 0.2),
            emotion(150.0, 0.3),
            emotion(165.0, 0.4),
            emotion(180.0, 0.5),
        ],
    }
}
