//! Daily record and partial update models.
//!
//! # Responsibility
//! - Define the canonical per-date record (`DailyStats`).
//! - Define the sparse update shape used as the unit of merge.
//!
//! # Invariants
//! - Within one category of one record, no two entries share a key.
//! - Every numeric field of a valid record is finite.
//! - `date` is fixed at creation and never changed by a merge.

use super::entry::{
    Category, CategoryEntry, GameSession, HeartRateSample, Keyed, MealEntry, Measured,
    SleepEntry, SocialEntry, WorkEntry, WorkoutEntry,
};
use super::keys::DayKey;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Validation errors for daily records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DailyStatsValidationError {
    #[error("duplicate {category} key `{key}` in daily record")]
    DuplicateKey { category: Category, key: String },
    #[error("non-finite {field} in {category} entry `{key}`")]
    NonFinite {
        category: Category,
        key: String,
        field: &'static str,
    },
}

/// Canonical record for one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: DayKey,
    #[serde(default)]
    pub sleep: Vec<SleepEntry>,
    #[serde(default)]
    pub workouts: Vec<WorkoutEntry>,
    #[serde(default)]
    pub meals: Vec<MealEntry>,
    #[serde(default)]
    pub work: Vec<WorkEntry>,
    #[serde(default)]
    pub social: Vec<SocialEntry>,
    #[serde(default)]
    pub gaming: Vec<GameSession>,
    #[serde(default)]
    pub heart_rate: Vec<HeartRateSample>,
}

impl DailyStats {
    /// Creates the all-empty record used before the first write for `date`.
    pub fn empty(date: DayKey) -> Self {
        Self {
            date,
            sleep: Vec::new(),
            workouts: Vec::new(),
            meals: Vec::new(),
            work: Vec::new(),
            social: Vec::new(),
            gaming: Vec::new(),
            heart_rate: Vec::new(),
        }
    }

    /// Checks per-category key uniqueness and that every number is finite.
    pub fn validate(&self) -> Result<(), DailyStatsValidationError> {
        ensure_unique(Category::Sleep, &self.sleep)?;
        ensure_unique(Category::Workouts, &self.workouts)?;
        ensure_unique(Category::Meals, &self.meals)?;
        ensure_unique(Category::Work, &self.work)?;
        ensure_unique(Category::Social, &self.social)?;
        ensure_unique(Category::Gaming, &self.gaming)?;
        ensure_unique(Category::HeartRate, &self.heart_rate)?;
        self.ensure_finite()
    }

    /// Rejects NaN and infinities, which JSON cannot carry.
    pub fn ensure_finite(&self) -> Result<(), DailyStatsValidationError> {
        ensure_finite(Category::Sleep, &self.sleep)?;
        ensure_finite(Category::Workouts, &self.workouts)?;
        ensure_finite(Category::Meals, &self.meals)?;
        ensure_finite(Category::Work, &self.work)?;
        ensure_finite(Category::Social, &self.social)?;
        ensure_finite(Category::Gaming, &self.gaming)?;
        ensure_finite(Category::HeartRate, &self.heart_rate)
    }

    /// Returns whether every category is empty.
    pub fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    pub fn entry_count(&self) -> usize {
        self.sleep.len()
            + self.workouts.len()
            + self.meals.len()
            + self.work.len()
            + self.social.len()
            + self.gaming.len()
            + self.heart_rate.len()
    }

    /// Number of entries in one category.
    pub fn category_len(&self, category: Category) -> usize {
        match category {
            Category::Sleep => self.sleep.len(),
            Category::Workouts => self.workouts.len(),
            Category::Meals => self.meals.len(),
            Category::Work => self.work.len(),
            Category::Social => self.social.len(),
            Category::Gaming => self.gaming.len(),
            Category::HeartRate => self.heart_rate.len(),
        }
    }

    /// Iterates every entry tagged with its category, in category order.
    pub fn entries(&self) -> impl Iterator<Item = CategoryEntry> + '_ {
        self.sleep
            .iter()
            .cloned()
            .map(CategoryEntry::Sleep)
            .chain(self.workouts.iter().cloned().map(CategoryEntry::Workout))
            .chain(self.meals.iter().cloned().map(CategoryEntry::Meal))
            .chain(self.work.iter().cloned().map(CategoryEntry::Work))
            .chain(self.social.iter().cloned().map(CategoryEntry::Social))
            .chain(self.gaming.iter().cloned().map(CategoryEntry::Gaming))
            .chain(self.heart_rate.iter().cloned().map(CategoryEntry::HeartRate))
    }
}

fn ensure_unique<T: Keyed>(
    category: Category,
    entries: &[T],
) -> Result<(), DailyStatsValidationError> {
    let mut seen = HashSet::with_capacity(entries.len());
    for entry in entries {
        let key = entry.key();
        if !seen.insert(key.clone()) {
            return Err(DailyStatsValidationError::DuplicateKey {
                category,
                key: key.into_owned(),
            });
        }
    }
    Ok(())
}

fn ensure_finite<T: Keyed + Measured>(
    category: Category,
    entries: &[T],
) -> Result<(), DailyStatsValidationError> {
    match entries
        .iter()
        .find_map(|entry| entry.non_finite_field().map(|field| (entry, field)))
    {
        Some((entry, field)) => Err(DailyStatsValidationError::NonFinite {
            category,
            key: entry.key().into_owned(),
            field,
        }),
        None => Ok(()),
    }
}

/// Sparse update for one date.
///
/// `None` leaves a category untouched; `Some(vec![])` is a present but empty
/// update and also leaves existing entries in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialDailyStats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep: Option<Vec<SleepEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workouts: Option<Vec<WorkoutEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meals: Option<Vec<MealEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work: Option<Vec<WorkEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social: Option<Vec<SocialEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gaming: Option<Vec<GameSession>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<Vec<HeartRateSample>>,
}

impl PartialDailyStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups tagged entries into their category sequences, keeping order.
    pub fn from_entries(entries: impl IntoIterator<Item = CategoryEntry>) -> Self {
        let mut partial = Self::default();
        for entry in entries {
            partial.push(entry);
        }
        partial
    }

    /// Appends one tagged entry to its category sequence.
    pub fn push(&mut self, entry: CategoryEntry) {
        match entry {
            CategoryEntry::Sleep(e) => self.sleep.get_or_insert_with(Vec::new).push(e),
            CategoryEntry::Workout(e) => self.workouts.get_or_insert_with(Vec::new).push(e),
            CategoryEntry::Meal(e) => self.meals.get_or_insert_with(Vec::new).push(e),
            CategoryEntry::Work(e) => self.work.get_or_insert_with(Vec::new).push(e),
            CategoryEntry::Social(e) => self.social.get_or_insert_with(Vec::new).push(e),
            CategoryEntry::Gaming(e) => self.gaming.get_or_insert_with(Vec::new).push(e),
            CategoryEntry::HeartRate(e) => self.heart_rate.get_or_insert_with(Vec::new).push(e),
        }
    }

    /// Categories this update supplies, in canonical order.
    pub fn categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|category| match category {
                Category::Sleep => self.sleep.is_some(),
                Category::Workouts => self.workouts.is_some(),
                Category::Meals => self.meals.is_some(),
                Category::Work => self.work.is_some(),
                Category::Social => self.social.is_some(),
                Category::Gaming => self.gaming.is_some(),
                Category::HeartRate => self.heart_rate.is_some(),
            })
            .collect()
    }

    /// Returns whether no category is supplied at all.
    pub fn is_empty(&self) -> bool {
        self.categories().is_empty()
    }

    /// Total number of supplied entries across categories.
    pub fn entry_count(&self) -> usize {
        fn len<T>(value: &Option<Vec<T>>) -> usize {
            value.as_ref().map_or(0, Vec::len)
        }
        len(&self.sleep)
            + len(&self.workouts)
            + len(&self.meals)
            + len(&self.work)
            + len(&self.social)
            + len(&self.gaming)
            + len(&self.heart_rate)
    }
}
