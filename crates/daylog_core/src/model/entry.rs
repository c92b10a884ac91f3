//! Category entry models.
//!
//! # Responsibility
//! - Define the seven entry shapes a daily record is made of.
//! - Expose one uniform key capability per category (`Keyed`).
//! - Expose the numeric fields that must stay finite (`Measured`).
//!
//! # Invariants
//! - Six categories are keyed by their producer-assigned `id`.
//! - Heart-rate samples have no id; their `timestamp` is the natural key.
//! - Persisted field names are camelCase and enum values kebab-case.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// Uniform key extraction shared by every category entry.
pub trait Keyed {
    /// Key that must be unique within one category of one daily record.
    fn key(&self) -> Cow<'_, str>;
}

/// Numeric fields that must be finite for a record to be persisted.
pub trait Measured {
    /// Name of the first field holding NaN or an infinity.
    fn non_finite_field(&self) -> Option<&'static str>;
}

fn first_non_finite<const N: usize>(
    fields: [(&'static str, Option<f64>); N],
) -> Option<&'static str> {
    fields
        .into_iter()
        .find(|(_, value)| value.is_some_and(|value| !value.is_finite()))
        .map(|(name, _)| name)
}

/// The seven categories tracked per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Sleep,
    Workouts,
    Meals,
    Work,
    Social,
    Gaming,
    HeartRate,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Sleep,
        Category::Workouts,
        Category::Meals,
        Category::Work,
        Category::Social,
        Category::Gaming,
        Category::HeartRate,
    ];

    /// Stable field name used in persisted records and log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sleep => "sleep",
            Self::Workouts => "workouts",
            Self::Meals => "meals",
            Self::Work => "work",
            Self::Social => "social",
            Self::Gaming => "gaming",
            Self::HeartRate => "heartRate",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SleepQuality {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl SleepQuality {
    /// Numeric score used for monthly averages.
    ///
    /// excellent=4, good=3, fair=2, poor=1.
    pub fn score(self) -> f64 {
        match self {
            Self::Excellent => 4.0,
            Self::Good => 3.0,
            Self::Fair => 2.0,
            Self::Poor => 1.0,
        }
    }
}

/// Where an entry was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntrySource {
    Manual,
    AppleHealth,
    DiscordGame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkoutType {
    Strength,
    Cardio,
    Hiit,
    Mobility,
    Sport,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Arms,
    Core,
    Legs,
    Glutes,
    FullBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkKind {
    Work,
    Homework,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePlatform {
    Discord,
    Manual,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEntry {
    pub id: String,
    pub duration_minutes: f64,
    pub quality: SleepQuality,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Only `manual` and `apple-health` are produced for sleep.
    pub source: EntrySource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WorkoutType,
    pub muscle_groups: Vec<MuscleGroup>,
    pub duration_minutes: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories_burned: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_heart_rate: Option<f64>,
    pub timestamp: DateTime<Utc>,
    pub source: EntrySource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    pub id: String,
    pub calories: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: WorkKind,
    pub duration_minutes: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialEntry {
    pub id: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSession {
    pub id: String,
    pub platform: GamePlatform,
    pub title: String,
    pub duration_minutes: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guild_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRateSample {
    pub bpm: f64,
    pub timestamp: DateTime<Utc>,
}

impl HeartRateSample {
    /// Canonical text form of the timestamp used as this sample's key.
    pub fn timestamp_key(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

macro_rules! keyed_by_id {
    ($($entry:ty),+ $(,)?) => {
        $(
            impl Keyed for $entry {
                fn key(&self) -> Cow<'_, str> {
                    Cow::Borrowed(self.id.as_str())
                }
            }
        )+
    };
}

keyed_by_id!(
    SleepEntry,
    WorkoutEntry,
    MealEntry,
    WorkEntry,
    SocialEntry,
    GameSession
);

impl Keyed for HeartRateSample {
    fn key(&self) -> Cow<'_, str> {
        Cow::Owned(self.timestamp_key())
    }
}

impl Measured for SleepEntry {
    fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite([("durationMinutes", Some(self.duration_minutes))])
    }
}

impl Measured for WorkoutEntry {
    fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite([
            ("durationMinutes", Some(self.duration_minutes)),
            ("caloriesBurned", self.calories_burned),
            ("averageHeartRate", self.average_heart_rate),
        ])
    }
}

impl Measured for MealEntry {
    fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite([
            ("calories", Some(self.calories)),
            ("protein", self.protein),
            ("carbs", self.carbs),
            ("fat", self.fat),
        ])
    }
}

impl Measured for WorkEntry {
    fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite([("durationMinutes", Some(self.duration_minutes))])
    }
}

impl Measured for SocialEntry {
    fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite([("durationMinutes", self.duration_minutes)])
    }
}

impl Measured for GameSession {
    fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite([("durationMinutes", Some(self.duration_minutes))])
    }
}

impl Measured for HeartRateSample {
    fn non_finite_field(&self) -> Option<&'static str> {
        first_non_finite([("bpm", Some(self.bpm))])
    }
}

/// One entry of any category, tagged with its category.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryEntry {
    Sleep(SleepEntry),
    Workout(WorkoutEntry),
    Meal(MealEntry),
    Work(WorkEntry),
    Social(SocialEntry),
    Gaming(GameSession),
    HeartRate(HeartRateSample),
}

impl CategoryEntry {
    pub fn category(&self) -> Category {
        match self {
            Self::Sleep(_) => Category::Sleep,
            Self::Workout(_) => Category::Workouts,
            Self::Meal(_) => Category::Meals,
            Self::Work(_) => Category::Work,
            Self::Social(_) => Category::Social,
            Self::Gaming(_) => Category::Gaming,
            Self::HeartRate(_) => Category::HeartRate,
        }
    }
}

impl Keyed for CategoryEntry {
    fn key(&self) -> Cow<'_, str> {
        match self {
            Self::Sleep(entry) => entry.key(),
            Self::Workout(entry) => entry.key(),
            Self::Meal(entry) => entry.key(),
            Self::Work(entry) => entry.key(),
            Self::Social(entry) => entry.key(),
            Self::Gaming(entry) => entry.key(),
            Self::HeartRate(entry) => entry.key(),
        }
    }
}
