//! Monthly and yearly rollup models.
//!
//! Summaries are derived values. They are never edited directly; a rollup
//! recomputes them from finer-grained records.

use super::entry::MuscleGroup;
use super::keys::{MonthKey, YearKey};
use serde::{Deserialize, Serialize};

/// Totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub total_workouts: u32,
    pub total_workout_minutes: f64,
    pub total_sleep_minutes: f64,
    /// Mean sleep quality score, `0.0` when the month has no sleep entries.
    pub average_sleep_quality: f64,
    pub total_calories: f64,
    pub total_work_minutes: f64,
    pub total_social_events: u32,
    pub total_gaming_minutes: f64,
}

impl MonthlySummary {
    /// All-zero summary for a month with no data.
    pub fn empty(month: MonthKey) -> Self {
        Self {
            month,
            total_workouts: 0,
            total_workout_minutes: 0.0,
            total_sleep_minutes: 0.0,
            average_sleep_quality: 0.0,
            total_calories: 0.0,
            total_work_minutes: 0.0,
            total_social_events: 0,
            total_gaming_minutes: 0.0,
        }
    }
}

/// Monthly summaries of one year, ascending by month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySummary {
    pub year: YearKey,
    pub months: Vec<MonthlySummary>,
}

/// Per-day gauges shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayVitals {
    /// 0..=100.
    pub hp: u8,
    /// 0..=100.
    pub energy: u8,
    pub muscle_groups: Vec<MuscleGroup>,
}
