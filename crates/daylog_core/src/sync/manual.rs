//! Manual entry producer.
//!
//! # Responsibility
//! - Turn raw form input into category entries for one partial update.
//! - Reject input with no usable number before it reaches the reconciler.
//!
//! # Invariants
//! - Numeric fields are accepted only when finite and strictly positive.
//! - Every produced entry gets a fresh id, so manual entries never
//!   overwrite each other.

use crate::model::daily::PartialDailyStats;
use crate::model::entry::{
    CategoryEntry, EntrySource, GamePlatform, GameSession, MealEntry, MuscleGroup, SleepEntry,
    SleepQuality, SocialEntry, WorkEntry, WorkKind, WorkoutEntry, WorkoutType,
};
use chrono::{DateTime, TimeDelta, Utc};
use thiserror::Error;
use uuid::Uuid;

const FULL_BODY_WORKOUT_MINUTES: f64 = 45.0;
const WORKOUT_CALORIES_PER_MINUTE: f64 = 7.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManualEntryError {
    #[error("nothing to apply; enter at least one value")]
    NothingToApply,
    #[error("{field} value is out of range")]
    OutOfRange { field: &'static str },
}

/// Raw form values as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualEntryInput {
    pub sleep_hours: Option<String>,
    pub workout_minutes: Option<String>,
    pub calories: Option<String>,
    pub gaming_minutes: Option<String>,
    pub work_minutes: Option<String>,
    /// Defaults to `WorkKind::Work`.
    pub work_kind: Option<WorkKind>,
    pub social_event: Option<String>,
}

impl ManualEntryInput {
    /// Builds the partial update for this input, stamped at `now`.
    ///
    /// # Errors
    /// - `NothingToApply` when no field holds a usable value.
    /// - `OutOfRange` when sleep hours cannot be represented as a time span, or
    ///   a derived number such as workout calories overflows.
    pub fn into_partial(&self, now: DateTime<Utc>) -> Result<PartialDailyStats, ManualEntryError> {
        let mut entries = Vec::new();

        if let Some(hours) = parse_field(&self.sleep_hours) {
            let span = TimeDelta::try_milliseconds((hours * 3_600_000.0).round() as i64)
                .ok_or(ManualEntryError::OutOfRange { field: "sleep" })?;
            let end = now
                .checked_add_signed(span)
                .ok_or(ManualEntryError::OutOfRange { field: "sleep" })?;
            entries.push(CategoryEntry::Sleep(SleepEntry {
                id: new_entry_id("sleep"),
                duration_minutes: scaled(hours, 60.0, "sleep")?,
                quality: SleepQuality::Good,
                start: now,
                end,
                source: EntrySource::Manual,
            }));
        }

        if let Some(minutes) = parse_field(&self.workout_minutes) {
            let muscle_group = if minutes >= FULL_BODY_WORKOUT_MINUTES {
                MuscleGroup::FullBody
            } else {
                MuscleGroup::Core
            };
            let calories_burned = scaled(minutes, WORKOUT_CALORIES_PER_MINUTE, "workout")?;
            entries.push(CategoryEntry::Workout(WorkoutEntry {
                id: new_entry_id("workout"),
                kind: WorkoutType::Strength,
                muscle_groups: vec![muscle_group],
                duration_minutes: minutes,
                calories_burned: Some(calories_burned),
                average_heart_rate: None,
                timestamp: now,
                source: EntrySource::Manual,
            }));
        }

        if let Some(calories) = parse_field(&self.calories) {
            entries.push(CategoryEntry::Meal(MealEntry {
                id: new_entry_id("meal"),
                calories,
                protein: None,
                carbs: None,
                fat: None,
                description: Some("Manual calorie entry".to_string()),
                timestamp: now,
            }));
        }

        if let Some(minutes) = parse_field(&self.gaming_minutes) {
            entries.push(CategoryEntry::Gaming(GameSession {
                id: new_entry_id("gaming"),
                platform: GamePlatform::Manual,
                title: "Manual session".to_string(),
                duration_minutes: minutes,
                timestamp: now,
                guild_name: None,
            }));
        }

        if let Some(minutes) = parse_field(&self.work_minutes) {
            entries.push(CategoryEntry::Work(WorkEntry {
                id: new_entry_id("work"),
                kind: self.work_kind.unwrap_or(WorkKind::Work),
                duration_minutes: minutes,
                description: None,
                timestamp: now,
            }));
        }

        if let Some(description) = self
            .social_event
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
        {
            entries.push(CategoryEntry::Social(SocialEntry {
                id: new_entry_id("social"),
                description: description.to_string(),
                duration_minutes: None,
                timestamp: now,
            }));
        }

        if entries.is_empty() {
            return Err(ManualEntryError::NothingToApply);
        }
        Ok(PartialDailyStats::from_entries(entries))
    }
}

/// Parses user text into a finite, strictly positive number.
pub fn parse_positive(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value > 0.0)
}

fn parse_field(value: &Option<String>) -> Option<f64> {
    value.as_deref().and_then(parse_positive)
}

fn scaled(value: f64, factor: f64, field: &'static str) -> Result<f64, ManualEntryError> {
    Some(value * factor)
        .filter(|product| product.is_finite())
        .ok_or(ManualEntryError::OutOfRange { field })
}

fn new_entry_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}
