//! Wearable (Apple Health) import producer.
//!
//! # Responsibility
//! - Pull sleep, workout and heart-rate samples for one day from a
//!   `WearableClient` and map them onto category entries.
//!
//! # Invariants
//! - The day window is `[date 00:00 UTC, date + 24h)`.
//! - All three fetches must succeed; otherwise nothing is produced.
//! - Produced sleep and workout entries are tagged `apple-health`.
//! - Non-finite readings never reach an entry: heart-rate samples are dropped
//!   and optional workout metrics become absent.

use super::source::{ClientResult, SourceError, SourceProducer, SourceResult};
use crate::model::daily::PartialDailyStats;
use crate::model::entry::{
    EntrySource, HeartRateSample, MuscleGroup, SleepEntry, SleepQuality, WorkoutEntry, WorkoutType,
};
use crate::model::keys::DayKey;
use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, TimeDelta, Utc};
use log::debug;

pub const APPLE_HEALTH_SOURCE_ID: &str = "apple_health";

/// Time range requested from the wearable API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    pub fn for_day(date: DayKey) -> Self {
        let start = date.date().and_time(NaiveTime::MIN).and_utc();
        Self {
            start,
            end: start + TimeDelta::days(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawSleepSample {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawWorkoutSample {
    pub id: String,
    /// HealthKit activity identifier, e.g. `HKWorkoutActivityTypeCycling`.
    pub activity_type: Option<String>,
    pub duration_seconds: Option<f64>,
    pub calories: Option<f64>,
    pub average_heart_rate: Option<f64>,
    pub start: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawHeartRateSample {
    pub value: f64,
    pub start: DateTime<Utc>,
}

/// External wearable API.
#[async_trait]
pub trait WearableClient: Send + Sync {
    /// Requests read permissions; called before every sync.
    async fn authorize(&self) -> ClientResult<()>;
    async fn fetch_sleep(&self, window: DayWindow) -> ClientResult<Vec<RawSleepSample>>;
    async fn fetch_workouts(&self, window: DayWindow) -> ClientResult<Vec<RawWorkoutSample>>;
    async fn fetch_heart_rate(&self, window: DayWindow) -> ClientResult<Vec<RawHeartRateSample>>;
}

pub struct WearableProducer<C: WearableClient> {
    client: C,
}

impl<C: WearableClient> WearableProducer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C: WearableClient> SourceProducer for WearableProducer<C> {
    fn source_id(&self) -> &str {
        APPLE_HEALTH_SOURCE_ID
    }

    async fn produce(&self, date: DayKey) -> SourceResult<PartialDailyStats> {
        self.client
            .authorize()
            .await
            .map_err(|err| SourceError::unavailable(APPLE_HEALTH_SOURCE_ID, err.to_string()))?;

        let window = DayWindow::for_day(date);
        let (sleep, workouts, heart_rate) = tokio::try_join!(
            self.client.fetch_sleep(window),
            self.client.fetch_workouts(window),
            self.client.fetch_heart_rate(window),
        )
        .map_err(|err| SourceError::fetch(APPLE_HEALTH_SOURCE_ID, err.to_string()))?;

        debug!(
            "event=source_fetch module=sync source={} date={} sleep={} workouts={} heart_rate={}",
            APPLE_HEALTH_SOURCE_ID,
            date,
            sleep.len(),
            workouts.len(),
            heart_rate.len()
        );

        Ok(PartialDailyStats {
            sleep: Some(sleep.into_iter().map(map_sleep).collect()),
            workouts: Some(workouts.into_iter().map(map_workout).collect()),
            heart_rate: Some(heart_rate.into_iter().filter_map(map_heart_rate).collect()),
            ..PartialDailyStats::default()
        })
    }
}

fn map_sleep(sample: RawSleepSample) -> SleepEntry {
    let minutes = (sample.end - sample.start).num_milliseconds() as f64 / 60_000.0;
    SleepEntry {
        id: sample.id,
        duration_minutes: minutes.max(0.0),
        quality: SleepQuality::Good,
        start: sample.start,
        end: sample.end,
        source: EntrySource::AppleHealth,
    }
}

fn map_workout(sample: RawWorkoutSample) -> WorkoutEntry {
    WorkoutEntry {
        muscle_groups: muscle_groups_for_activity(sample.activity_type.as_deref()),
        id: sample.id,
        kind: WorkoutType::Strength,
        duration_minutes: finite(sample.duration_seconds).map_or(0.0, |seconds| seconds / 60.0),
        calories_burned: finite(sample.calories),
        average_heart_rate: finite(sample.average_heart_rate),
        timestamp: sample.start,
        source: EntrySource::AppleHealth,
    }
}

// A reading without a finite value carries nothing worth keeping.
fn map_heart_rate(sample: RawHeartRateSample) -> Option<HeartRateSample> {
    sample.value.is_finite().then(|| HeartRateSample {
        bpm: sample.value,
        timestamp: sample.start,
    })
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite())
}

/// Muscle groups credited for a HealthKit activity type.
pub fn muscle_groups_for_activity(activity_type: Option<&str>) -> Vec<MuscleGroup> {
    match activity_type {
        Some("HKWorkoutActivityTypeCycling") => vec![MuscleGroup::Legs],
        Some("HKWorkoutActivityTypeWalking") | Some("HKWorkoutActivityTypeRunning") => {
            vec![MuscleGroup::Legs, MuscleGroup::Core]
        }
        // Functional strength, swimming and anything unrecognised.
        _ => vec![MuscleGroup::FullBody],
    }
}

#[cfg(test)]
mod tests {
    use super::{muscle_groups_for_activity, DayWindow};
    use crate::model::entry::MuscleGroup;
    use crate::model::keys::DayKey;

    #[test]
    fn day_window_spans_one_utc_day() {
        let window = DayWindow::for_day("2024-02-28".parse::<DayKey>().unwrap());
        assert_eq!(window.start.to_rfc3339(), "2024-02-28T00:00:00+00:00");
        assert_eq!(window.end.to_rfc3339(), "2024-02-29T00:00:00+00:00");
    }

    #[test]
    fn maps_activity_types_to_muscle_groups() {
        assert_eq!(
            muscle_groups_for_activity(Some("HKWorkoutActivityTypeRunning")),
            vec![MuscleGroup::Legs, MuscleGroup::Core]
        );
        assert_eq!(
            muscle_groups_for_activity(Some("HKWorkoutActivityTypeCycling")),
            vec![MuscleGroup::Legs]
        );
        assert_eq!(
            muscle_groups_for_activity(None),
            vec![MuscleGroup::FullBody]
        );
    }
}
