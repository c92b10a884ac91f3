//! Typed repository for daily records and summaries.
//!
//! # Responsibility
//! - Map records to namespaced store keys and JSON values.
//! - Treat malformed persisted values as absent instead of failing reads.
//!
//! # Invariants
//! - Keys are `daily:<YYYY-MM-DD>`, `monthly:<YYYY-MM>`, `yearly:<YYYY>`.
//! - A loaded daily record always satisfies `DailyStats::validate()`.
//! - A value is only written when it reads back; the previous value survives
//!   a refused write.
//! - Store failures are surfaced, never swallowed.

use super::kv::{KvStore, StoreError, StoreResult};
use crate::model::daily::{DailyStats, PartialDailyStats};
use crate::model::keys::{DayKey, MonthKey, YearKey};
use crate::model::summary::{MonthlySummary, YearlySummary};
use crate::service::reconcile::merge_partial;
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

pub const DAILY_KEY_PREFIX: &str = "daily:";
pub const MONTHLY_KEY_PREFIX: &str = "monthly:";
pub const YEARLY_KEY_PREFIX: &str = "yearly:";

pub fn daily_key(date: DayKey) -> String {
    format!("{DAILY_KEY_PREFIX}{date}")
}

pub fn monthly_key(month: MonthKey) -> String {
    format!("{MONTHLY_KEY_PREFIX}{month}")
}

pub fn yearly_key(year: YearKey) -> String {
    format!("{YEARLY_KEY_PREFIX}{year}")
}

/// Record-level access over any `KvStore`.
pub struct StatsRepository<S: KvStore> {
    store: S,
}

impl<S: KvStore> StatsRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the daily record for `date`, or `None` when absent or malformed.
    pub fn load_daily(&self, date: DayKey) -> StoreResult<Option<DailyStats>> {
        let key = daily_key(date);
        let Some(mut stats) = self.load_json::<DailyStats>(&key)? else {
            return Ok(None);
        };

        if stats.date != date {
            warn!(
                "event=daily_load module=repo status=repaired reason=date_mismatch key={} stored_date={}",
                key, stats.date
            );
            stats.date = date;
        }

        if let Err(err) = stats.validate() {
            warn!(
                "event=daily_load module=repo status=repaired reason=duplicate_key key={} error={}",
                key, err
            );
            stats = collapse_duplicates(stats);
        }

        Ok(Some(stats))
    }

    /// Persists `stats` unless it holds a non-finite number.
    pub fn save_daily(&self, stats: &DailyStats) -> StoreResult<()> {
        let key = daily_key(stats.date);
        if let Err(source) = stats.ensure_finite() {
            return Err(StoreError::Invalid { key, source });
        }
        self.save_json(&key, stats)
    }

    pub fn load_monthly(&self, month: MonthKey) -> StoreResult<Option<MonthlySummary>> {
        self.load_json(&monthly_key(month))
    }

    pub fn save_monthly(&self, summary: &MonthlySummary) -> StoreResult<()> {
        self.save_json(&monthly_key(summary.month), summary)
    }

    pub fn load_yearly(&self, year: YearKey) -> StoreResult<Option<YearlySummary>> {
        self.load_json(&yearly_key(year))
    }

    pub fn save_yearly(&self, summary: &YearlySummary) -> StoreResult<()> {
        self.save_json(&yearly_key(summary.year), summary)
    }

    /// Days of `month` that have a persisted record, ascending.
    pub fn list_days_in_month(&self, month: MonthKey) -> StoreResult<Vec<DayKey>> {
        let prefix = format!("{DAILY_KEY_PREFIX}{month}-");
        Ok(self
            .store
            .list_keys(&prefix)?
            .iter()
            .filter_map(|key| key[DAILY_KEY_PREFIX.len()..].parse().ok())
            .collect())
    }

    /// Every readable daily record of `month`, ascending by date.
    pub fn list_daily_for_month(&self, month: MonthKey) -> StoreResult<Vec<DailyStats>> {
        let mut days = Vec::new();
        for date in self.list_days_in_month(month)? {
            if let Some(stats) = self.load_daily(date)? {
                days.push(stats);
            }
        }
        Ok(days)
    }

    /// Months of `year` that have any persisted daily record, ascending.
    pub fn list_months_with_days(&self, year: YearKey) -> StoreResult<Vec<MonthKey>> {
        let prefix = format!("{DAILY_KEY_PREFIX}{year}-");
        let mut months: Vec<MonthKey> = self
            .store
            .list_keys(&prefix)?
            .iter()
            .filter_map(|key| key[DAILY_KEY_PREFIX.len()..].parse::<DayKey>().ok())
            .map(DayKey::month)
            .collect();
        months.dedup();
        Ok(months)
    }

    /// Every readable monthly summary of `year`, ascending by month.
    pub fn list_monthly_for_year(&self, year: YearKey) -> StoreResult<Vec<MonthlySummary>> {
        let prefix = format!("{MONTHLY_KEY_PREFIX}{year}-");
        let mut summaries = Vec::new();
        for key in self.store.list_keys(&prefix)? {
            if let Some(summary) = self.load_json::<MonthlySummary>(&key)? {
                summaries.push(summary);
            }
        }
        Ok(summaries)
    }

    /// Deletes every daily, monthly and yearly record in one batch.
    ///
    /// Keys outside the three namespaces are left alone.
    pub fn clear_all(&self) -> StoreResult<usize> {
        let mut keys = Vec::new();
        for prefix in [DAILY_KEY_PREFIX, MONTHLY_KEY_PREFIX, YEARLY_KEY_PREFIX] {
            keys.extend(self.store.list_keys(prefix)?);
        }
        self.store.delete_many(&keys)
    }

    fn load_json<T: DeserializeOwned>(&self, key: &str) -> StoreResult<Option<T>> {
        let Some(raw) = self.store.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_slice(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                warn!(
                    "event=record_load module=repo status=skipped reason=malformed key={} error={}",
                    key, err
                );
                Ok(None)
            }
        }
    }

    fn save_json<T: Serialize + DeserializeOwned>(&self, key: &str, value: &T) -> StoreResult<()> {
        let encode_error = |source| StoreError::Encode {
            key: key.to_string(),
            source,
        };
        let raw = serde_json::to_vec(value).map_err(encode_error)?;
        // serde_json writes NaN and infinities as `null`, which would not load.
        serde_json::from_slice::<T>(&raw).map_err(encode_error)?;
        self.store.set(key, &raw)
    }
}

// Re-merging every category into an empty record keeps the first slot of
// each key and the last value written for it.
fn collapse_duplicates(stats: DailyStats) -> DailyStats {
    let date = stats.date;
    let partial = PartialDailyStats {
        sleep: Some(stats.sleep),
        workouts: Some(stats.workouts),
        meals: Some(stats.meals),
        work: Some(stats.work),
        social: Some(stats.social),
        gaming: Some(stats.gaming),
        heart_rate: Some(stats.heart_rate),
    };
    merge_partial(DailyStats::empty(date), &partial)
}
