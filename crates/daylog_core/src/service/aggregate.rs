//! Rollup derivations from daily records.
//!
//! # Responsibility
//! - Derive monthly totals from daily records and yearly views from months.
//! - Derive per-day dashboard gauges.
//!
//! # Invariants
//! - Every function here is total: empty input yields a zero-valued result.
//! - Results do not depend on input order.
//! - Inputs are never mutated.

use crate::model::daily::DailyStats;
use crate::model::entry::MuscleGroup;
use crate::model::keys::{MonthKey, YearKey};
use crate::model::summary::{DayVitals, MonthlySummary, YearlySummary};
use log::debug;
use std::cmp::Ordering;

/// Average sleep quality reported for a month without sleep entries.
pub const NEUTRAL_SLEEP_QUALITY: f64 = 0.0;

const HP_BASE: f64 = 40.0;
const HP_PER_SLEEP_HOUR: f64 = 5.0;
const HP_WORKOUT_MINUTES_PER_POINT: f64 = 3.0;
const HP_HEART_RATE_BONUS: f64 = 10.0;
const ENERGY_FULL_SLEEP_HOURS: f64 = 8.0;
const GAUGE_MAX: f64 = 100.0;

/// Derives the summary of `month` from the daily records supplied.
///
/// Records dated outside `month` are ignored. Missing days contribute nothing.
pub fn aggregate_month(month: MonthKey, days: &[DailyStats]) -> MonthlySummary {
    let mut workout_minutes = Vec::new();
    let mut sleep_minutes = Vec::new();
    let mut sleep_scores = Vec::new();
    let mut calories = Vec::new();
    let mut work_minutes = Vec::new();
    let mut gaming_minutes = Vec::new();
    let mut social_events = 0usize;

    for day in days {
        if !month.contains(day.date) {
            debug!(
                "event=month_aggregate module=aggregate status=skipped month={} date={}",
                month, day.date
            );
            continue;
        }

        workout_minutes.extend(day.workouts.iter().map(|w| w.duration_minutes));
        sleep_minutes.extend(day.sleep.iter().map(|s| s.duration_minutes));
        sleep_scores.extend(day.sleep.iter().map(|s| s.quality.score()));
        calories.extend(day.meals.iter().map(|m| m.calories));
        work_minutes.extend(day.work.iter().map(|w| w.duration_minutes));
        gaming_minutes.extend(day.gaming.iter().map(|g| g.duration_minutes));
        social_events += day.social.len();
    }

    let average_sleep_quality = if sleep_scores.is_empty() {
        NEUTRAL_SLEEP_QUALITY
    } else {
        let count = sleep_scores.len() as f64;
        order_independent_sum(sleep_scores) / count
    };

    MonthlySummary {
        month,
        total_workouts: saturating_u32(workout_minutes.len()),
        total_workout_minutes: order_independent_sum(workout_minutes),
        total_sleep_minutes: order_independent_sum(sleep_minutes),
        average_sleep_quality,
        total_calories: order_independent_sum(calories),
        total_work_minutes: order_independent_sum(work_minutes),
        total_social_events: saturating_u32(social_events),
        total_gaming_minutes: order_independent_sum(gaming_minutes),
    }
}

/// Orders monthly summaries ascending by month. No further reduction.
///
/// Summaries sharing a month are ordered by their totals, so the output never
/// depends on input order.
pub fn aggregate_year(year: YearKey, months: &[MonthlySummary]) -> YearlySummary {
    let mut months = months.to_vec();
    months.sort_by(|a, b| a.month.cmp(&b.month).then_with(|| compare_totals(a, b)));
    YearlySummary { year, months }
}

fn compare_totals(a: &MonthlySummary, b: &MonthlySummary) -> Ordering {
    a.total_workouts
        .cmp(&b.total_workouts)
        .then_with(|| a.total_workout_minutes.total_cmp(&b.total_workout_minutes))
        .then_with(|| a.total_sleep_minutes.total_cmp(&b.total_sleep_minutes))
        .then_with(|| a.average_sleep_quality.total_cmp(&b.average_sleep_quality))
        .then_with(|| a.total_calories.total_cmp(&b.total_calories))
        .then_with(|| a.total_work_minutes.total_cmp(&b.total_work_minutes))
        .then_with(|| a.total_social_events.cmp(&b.total_social_events))
        .then_with(|| a.total_gaming_minutes.total_cmp(&b.total_gaming_minutes))
}

/// Dashboard gauges for one day.
pub fn day_vitals(stats: &DailyStats) -> DayVitals {
    let sleep_hours: f64 = stats.sleep.iter().map(|s| s.duration_minutes).sum::<f64>() / 60.0;
    let workout_minutes: f64 = stats.workouts.iter().map(|w| w.duration_minutes).sum();
    let heart_rate_bonus = if stats.heart_rate.is_empty() {
        0.0
    } else {
        HP_HEART_RATE_BONUS
    };

    let hp = HP_BASE
        + sleep_hours * HP_PER_SLEEP_HOUR
        + workout_minutes / HP_WORKOUT_MINUTES_PER_POINT
        + heart_rate_bonus;
    let energy = sleep_hours / ENERGY_FULL_SLEEP_HOURS * GAUGE_MAX;

    let mut muscle_groups: Vec<MuscleGroup> = Vec::new();
    for group in stats.workouts.iter().flat_map(|w| w.muscle_groups.iter()) {
        if !muscle_groups.contains(group) {
            muscle_groups.push(*group);
        }
    }

    DayVitals {
        hp: gauge(hp),
        energy: gauge(energy),
        muscle_groups,
    }
}

// Float addition is not associative; summing in sorted order makes the
// total independent of the order records were supplied in.
fn order_independent_sum(mut values: Vec<f64>) -> f64 {
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn gauge(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, GAUGE_MAX) as u8
}

#[cfg(test)]
mod tests {
    use super::{gauge, order_independent_sum};

    #[test]
    fn gauge_clamps_and_rounds() {
        assert_eq!(gauge(140.2), 100);
        assert_eq!(gauge(-3.0), 0);
        assert_eq!(gauge(62.5), 63);
        assert_eq!(gauge(f64::NAN), 0);
    }

    #[test]
    fn sorted_sum_ignores_input_order() {
        let forward = vec![0.1, 1e16, 0.2, -1e16, 0.3];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(
            order_independent_sum(forward),
            order_independent_sum(backward)
        );
    }
}
