use chrono::{TimeZone, Utc};
use daylog_core::model::entry::{
    EntrySource, HeartRateSample, MealEntry, MuscleGroup, SleepEntry, SleepQuality, SocialEntry,
    WorkoutEntry, WorkoutType,
};
use daylog_core::service::aggregate::NEUTRAL_SLEEP_QUALITY;
use daylog_core::{
    aggregate_month, aggregate_year, day_vitals, DailyStats, DayKey, KvStore, MemoryKvStore,
    MonthKey, MonthlySummary, RollupService, StatsRepository, YearKey,
};
use std::sync::Arc;

fn day(text: &str) -> DayKey {
    text.parse().unwrap()
}

fn month(text: &str) -> MonthKey {
    text.parse().unwrap()
}

fn year(value: i32) -> YearKey {
    YearKey::new(value).unwrap()
}

fn workout(id: &str, minutes: f64, groups: Vec<MuscleGroup>) -> WorkoutEntry {
    WorkoutEntry {
        id: id.to_string(),
        kind: WorkoutType::Strength,
        muscle_groups: groups,
        duration_minutes: minutes,
        calories_burned: None,
        average_heart_rate: None,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap(),
        source: EntrySource::Manual,
    }
}

fn sleep(id: &str, minutes: f64, quality: SleepQuality) -> SleepEntry {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    SleepEntry {
        id: id.to_string(),
        duration_minutes: minutes,
        quality,
        start,
        end: start,
        source: EntrySource::Manual,
    }
}

fn meal(id: &str, calories: f64) -> MealEntry {
    MealEntry {
        id: id.to_string(),
        calories,
        protein: None,
        carbs: None,
        fat: None,
        description: None,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
    }
}

fn social(id: &str) -> SocialEntry {
    SocialEntry {
        id: id.to_string(),
        description: "board games".to_string(),
        duration_minutes: Some(120.0),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 19, 0, 0).unwrap(),
    }
}

fn march_days() -> Vec<DailyStats> {
    let mut first = DailyStats::empty(day("2024-03-01"));
    first.workouts = vec![workout("w1", 30.0, vec![MuscleGroup::Legs])];
    first.sleep = vec![sleep("s1", 420.0, SleepQuality::Excellent)];
    first.meals = vec![meal("m1", 600.0), meal("m2", 850.5)];

    let mut second = DailyStats::empty(day("2024-03-02"));
    second.workouts = vec![workout("w2", 45.0, vec![MuscleGroup::FullBody])];
    second.sleep = vec![sleep("s2", 360.0, SleepQuality::Fair)];
    second.social = vec![social("e1")];

    vec![first, second]
}

#[test]
fn month_totals_sum_across_days() {
    let summary = aggregate_month(month("2024-03"), &march_days());

    assert_eq!(summary.month, month("2024-03"));
    assert_eq!(summary.total_workouts, 2);
    assert_eq!(summary.total_workout_minutes, 75.0);
    assert_eq!(summary.total_sleep_minutes, 780.0);
    assert_eq!(summary.average_sleep_quality, 3.0);
    assert_eq!(summary.total_calories, 1450.5);
    assert_eq!(summary.total_social_events, 1);
    assert_eq!(summary.total_gaming_minutes, 0.0);
}

#[test]
fn month_summary_does_not_depend_on_input_order() {
    let mut days = march_days();
    let forward = aggregate_month(month("2024-03"), &days);
    days.reverse();
    let backward = aggregate_month(month("2024-03"), &days);
    assert_eq!(forward, backward);
}

#[test]
fn empty_month_is_all_zero_with_neutral_quality() {
    let summary = aggregate_month(month("2024-04"), &[]);
    assert_eq!(summary, MonthlySummary::empty(month("2024-04")));
    assert_eq!(summary.average_sleep_quality, NEUTRAL_SLEEP_QUALITY);
}

#[test]
fn days_outside_the_month_are_ignored() {
    let mut days = march_days();
    let mut stray = DailyStats::empty(day("2024-04-01"));
    stray.workouts = vec![workout("w9", 60.0, vec![])];
    days.push(stray);

    let summary = aggregate_month(month("2024-03"), &days);
    assert_eq!(summary.total_workouts, 2);
}

#[test]
fn year_orders_months_ascending_without_reducing() {
    let months = vec![
        MonthlySummary::empty(month("2024-11")),
        MonthlySummary::empty(month("2024-02")),
        MonthlySummary::empty(month("2024-07")),
    ];
    let summary = aggregate_year(year(2024), &months);

    let order: Vec<u32> = summary.months.iter().map(|m| m.month.month()).collect();
    assert_eq!(order, vec![2, 7, 11]);
    assert_eq!(summary.year, year(2024));
}

#[test]
fn year_with_repeated_month_is_the_same_for_any_input_order() {
    let busy = MonthlySummary {
        total_workouts: 4,
        total_calories: 9000.0,
        ..MonthlySummary::empty(month("2024-03"))
    };
    let quiet = MonthlySummary {
        total_workouts: 1,
        ..MonthlySummary::empty(month("2024-03"))
    };
    let january = MonthlySummary::empty(month("2024-01"));

    let forward = aggregate_year(year(2024), &[busy.clone(), january.clone(), quiet.clone()]);
    let backward = aggregate_year(year(2024), &[quiet.clone(), busy.clone(), january.clone()]);

    assert_eq!(forward, backward);
    assert_eq!(forward.months, vec![january, quiet, busy]);
}

#[test]
fn day_vitals_reflect_sleep_workouts_and_heart_rate() {
    let mut stats = DailyStats::empty(day("2024-03-01"));
    stats.sleep = vec![sleep("s1", 480.0, SleepQuality::Good)];
    stats.workouts = vec![
        workout("w1", 30.0, vec![MuscleGroup::Legs, MuscleGroup::Core]),
        workout("w2", 15.0, vec![MuscleGroup::Core, MuscleGroup::Arms]),
    ];
    stats.heart_rate = vec![HeartRateSample {
        bpm: 58.0,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap(),
    }];

    let vitals = day_vitals(&stats);
    // 40 + 8h * 5 + 45min / 3 + 10
    assert_eq!(vitals.hp, 100);
    assert_eq!(vitals.energy, 100);
    assert_eq!(
        vitals.muscle_groups,
        vec![MuscleGroup::Legs, MuscleGroup::Core, MuscleGroup::Arms]
    );

    let rested = day_vitals(&DailyStats::empty(day("2024-03-02")));
    assert_eq!(rested.hp, 40);
    assert_eq!(rested.energy, 0);
    assert!(rested.muscle_groups.is_empty());
}

#[test]
fn refresh_month_persists_summary_from_stored_days() {
    let store = Arc::new(MemoryKvStore::new());
    let repo = StatsRepository::new(Arc::clone(&store));
    for stats in march_days() {
        repo.save_daily(&stats).unwrap();
    }
    let mut april = DailyStats::empty(day("2024-04-01"));
    april.workouts = vec![workout("w3", 20.0, vec![])];
    repo.save_daily(&april).unwrap();

    let rollups = RollupService::new(Arc::clone(&store));
    let summary = rollups.refresh_month(month("2024-03")).unwrap();

    assert_eq!(summary.total_workout_minutes, 75.0);
    assert_eq!(summary.total_workouts, 2);
    assert_eq!(repo.load_monthly(month("2024-03")).unwrap(), Some(summary));
    assert!(store.get("monthly:2024-04").unwrap().is_none());
}

#[test]
fn refresh_year_uses_persisted_months_only() {
    let rollups = RollupService::new(MemoryKvStore::new());
    let repo = rollups.repository();
    repo.save_monthly(&MonthlySummary::empty(month("2024-05")))
        .unwrap();
    repo.save_monthly(&MonthlySummary::empty(month("2024-01")))
        .unwrap();
    repo.save_monthly(&MonthlySummary::empty(month("2023-12")))
        .unwrap();

    let summary = rollups.refresh_year(year(2024)).unwrap();
    let order: Vec<String> = summary.months.iter().map(|m| m.month.to_string()).collect();
    assert_eq!(order, vec!["2024-01", "2024-05"]);
    assert_eq!(repo.load_yearly(year(2024)).unwrap(), Some(summary));
}

#[test]
fn refresh_year_from_days_rolls_up_every_month_with_data() {
    let rollups = RollupService::new(MemoryKvStore::new());
    let repo = rollups.repository();
    for stats in march_days() {
        repo.save_daily(&stats).unwrap();
    }
    repo.save_daily(&DailyStats::empty(day("2024-06-10"))).unwrap();

    let summary = rollups.refresh_year_from_days(year(2024)).unwrap();

    assert_eq!(summary.months.len(), 2);
    assert_eq!(summary.months[0].total_workouts, 2);
    assert_eq!(summary.months[1], MonthlySummary::empty(month("2024-06")));
    assert!(repo.load_monthly(month("2024-06")).unwrap().is_some());
}

#[test]
fn rollups_leave_daily_records_untouched() {
    let rollups = RollupService::new(MemoryKvStore::new());
    let repo = rollups.repository();
    let days = march_days();
    for stats in &days {
        repo.save_daily(stats).unwrap();
    }

    rollups.refresh_year_from_days(year(2024)).unwrap();

    assert_eq!(repo.list_daily_for_month(month("2024-03")).unwrap(), days);
}
