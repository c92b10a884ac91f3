use chrono::{TimeZone, Utc};
use daylog_core::model::entry::{
    EntrySource, HeartRateSample, MealEntry, MuscleGroup, SleepEntry, SleepQuality, WorkoutEntry,
    WorkoutType,
};
use daylog_core::{
    Category, CategoryEntry, DailyStats, DailyStatsValidationError, DayKey, MonthKey,
    PartialDailyStats,
};
use serde_json::json;

fn day(text: &str) -> DayKey {
    text.parse().unwrap()
}

fn sleep(id: &str, minutes: f64, quality: SleepQuality) -> SleepEntry {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 23, 0, 0).unwrap();
    SleepEntry {
        id: id.to_string(),
        duration_minutes: minutes,
        quality,
        start,
        end: start + chrono::TimeDelta::minutes(minutes as i64),
        source: EntrySource::Manual,
    }
}

fn workout(id: &str, minutes: f64) -> WorkoutEntry {
    WorkoutEntry {
        id: id.to_string(),
        kind: WorkoutType::Cardio,
        muscle_groups: vec![MuscleGroup::Legs],
        duration_minutes: minutes,
        calories_burned: None,
        average_heart_rate: Some(142.0),
        timestamp: Utc.with_ymd_and_hms(2024, 3, 2, 7, 30, 0).unwrap(),
        source: EntrySource::AppleHealth,
    }
}

#[test]
fn keys_parse_and_format_canonically() {
    let date = day("2024-02-29");
    assert_eq!(date.to_string(), "2024-02-29");
    assert_eq!(date.month().to_string(), "2024-02");
    assert_eq!(date.year().to_string(), "2024");

    assert!("2023-02-29".parse::<DayKey>().is_err());
    assert!("2024-2-01".parse::<DayKey>().is_err());
    assert!("2024-13".parse::<MonthKey>().is_err());
}

#[test]
fn day_keys_stay_within_four_digit_years() {
    let last = DayKey::from_ymd(9999, 12, 31).unwrap();
    assert_eq!(last.to_string(), "9999-12-31");
    assert_eq!(last.to_string().parse::<DayKey>().unwrap(), last);
    assert_eq!(last.month().to_string(), "9999-12");

    assert!(DayKey::from_ymd(10000, 1, 1).is_none());
    assert!(DayKey::from_ymd(-1, 12, 31).is_none());
    let far = chrono::NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
    assert!(DayKey::new(far).is_none());
    assert!("+10000-01-01".parse::<DayKey>().is_err());
    assert!(serde_json::from_value::<DayKey>(json!("+10000-01-01")).is_err());
}

#[test]
fn empty_record_validates_and_has_no_entries() {
    let stats = DailyStats::empty(day("2024-03-02"));
    assert!(stats.validate().is_ok());
    assert!(stats.is_empty());
    for category in Category::ALL {
        assert_eq!(stats.category_len(category), 0);
    }
}

#[test]
fn duplicate_ids_within_a_category_fail_validation() {
    let mut stats = DailyStats::empty(day("2024-03-02"));
    stats.workouts = vec![workout("w1", 30.0), workout("w1", 45.0)];

    let err = stats.validate().unwrap_err();
    assert_eq!(
        err,
        DailyStatsValidationError::DuplicateKey {
            category: Category::Workouts,
            key: "w1".to_string(),
        }
    );
}

#[test]
fn non_finite_numbers_fail_validation() {
    let mut stats = DailyStats::empty(day("2024-03-02"));
    let mut hot = workout("w1", 30.0);
    hot.calories_burned = Some(f64::INFINITY);
    stats.workouts = vec![workout("w0", 20.0), hot];

    assert_eq!(
        stats.validate().unwrap_err(),
        DailyStatsValidationError::NonFinite {
            category: Category::Workouts,
            key: "w1".to_string(),
            field: "caloriesBurned",
        }
    );

    stats.workouts[1].calories_burned = Some(310.0);
    stats.sleep = vec![sleep("s1", f64::NAN, SleepQuality::Poor)];
    assert!(matches!(
        stats.ensure_finite(),
        Err(DailyStatsValidationError::NonFinite {
            category: Category::Sleep,
            field: "durationMinutes",
            ..
        })
    ));
}

#[test]
fn same_id_in_different_categories_is_allowed() {
    let mut stats = DailyStats::empty(day("2024-03-02"));
    stats.sleep = vec![sleep("x", 420.0, SleepQuality::Good)];
    stats.workouts = vec![workout("x", 30.0)];
    assert!(stats.validate().is_ok());
}

#[test]
fn heart_rate_samples_are_unique_by_timestamp() {
    let at = Utc.with_ymd_and_hms(2024, 3, 2, 10, 0, 0).unwrap();
    let mut stats = DailyStats::empty(day("2024-03-02"));
    stats.heart_rate = vec![
        HeartRateSample { bpm: 61.0, timestamp: at },
        HeartRateSample { bpm: 64.0, timestamp: at },
    ];

    let err = stats.validate().unwrap_err();
    assert!(matches!(
        err,
        DailyStatsValidationError::DuplicateKey {
            category: Category::HeartRate,
            ..
        }
    ));
}

#[test]
fn persisted_shape_uses_camel_case_fields_and_kebab_case_values() {
    let mut stats = DailyStats::empty(day("2024-03-02"));
    stats.workouts = vec![workout("w1", 30.0)];

    let value = serde_json::to_value(&stats).unwrap();
    assert_eq!(value["date"], json!("2024-03-02"));
    assert_eq!(value["heartRate"], json!([]));
    let entry = &value["workouts"][0];
    assert_eq!(entry["type"], json!("cardio"));
    assert_eq!(entry["durationMinutes"], json!(30.0));
    assert_eq!(entry["averageHeartRate"], json!(142.0));
    assert_eq!(entry["source"], json!("apple-health"));
    assert!(entry.get("caloriesBurned").is_none());
}

#[test]
fn records_missing_categories_deserialize_as_empty() {
    let stats: DailyStats = serde_json::from_value(json!({
        "date": "2024-03-02",
        "meals": [{
            "id": "m1",
            "calories": 650.0,
            "timestamp": "2024-03-02T12:15:00Z"
        }]
    }))
    .unwrap();

    assert_eq!(stats.meals.len(), 1);
    assert!(stats.sleep.is_empty());
    assert!(stats.heart_rate.is_empty());
    assert_eq!(stats.entry_count(), 1);
}

#[test]
fn partial_from_entries_groups_by_category_and_keeps_order() {
    let meal = MealEntry {
        id: "m1".to_string(),
        calories: 500.0,
        protein: Some(30.0),
        carbs: None,
        fat: None,
        description: None,
        timestamp: Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap(),
    };
    let partial = PartialDailyStats::from_entries([
        CategoryEntry::Workout(workout("w2", 20.0)),
        CategoryEntry::Meal(meal),
        CategoryEntry::Workout(workout("w1", 40.0)),
    ]);

    assert_eq!(partial.categories(), vec![Category::Workouts, Category::Meals]);
    assert_eq!(partial.entry_count(), 3);
    let ids: Vec<&str> = partial
        .workouts
        .as_ref()
        .unwrap()
        .iter()
        .map(|w| w.id.as_str())
        .collect();
    assert_eq!(ids, vec!["w2", "w1"]);
    assert!(partial.sleep.is_none());
}

#[test]
fn present_but_empty_category_is_distinct_from_absent() {
    let partial = PartialDailyStats {
        social: Some(Vec::new()),
        ..PartialDailyStats::default()
    };
    assert!(!partial.is_empty());
    assert_eq!(partial.entry_count(), 0);
    assert!(PartialDailyStats::new().is_empty());

    let value = serde_json::to_value(&partial).unwrap();
    assert_eq!(value, json!({ "social": [] }));
}
