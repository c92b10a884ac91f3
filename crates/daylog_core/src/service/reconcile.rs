//! Record reconciler.
//!
//! # Responsibility
//! - Merge partial updates from any source into the canonical daily record.
//! - Serialize read-merge-write cycles per date.
//!
//! # Invariants
//! - After any merge, keys are unique within every category.
//! - An entry keeps the slot of its first insertion; later updates replace
//!   its value in place.
//! - Merges for one date run one at a time in arrival order; merges for
//!   different dates never wait on each other.
//! - `date` is never altered by a merge.

use crate::model::daily::{DailyStats, PartialDailyStats};
use crate::model::entry::Keyed;
use crate::model::keys::DayKey;
use crate::repo::kv::{KvStore, StoreError};
use crate::repo::stats_repo::StatsRepository;
use dashmap::mapref::entry::Entry as DashEntry;
use dashmap::DashMap;
use log::{error, info};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Merges `incoming` over `existing` by key.
///
/// The output holds every existing entry once, then every new incoming key in
/// incoming order. A key present in both keeps its original slot and takes
/// the incoming value. `incoming = None` returns `existing` unchanged.
pub fn merge_category<T, K, F>(existing: &[T], incoming: Option<&[T]>, key_of: F) -> Vec<T>
where
    T: Clone,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let Some(incoming) = incoming else {
        return existing.to_vec();
    };

    let mut merged: Vec<T> = Vec::with_capacity(existing.len() + incoming.len());
    let mut slots: HashMap<K, usize> = HashMap::with_capacity(merged.capacity());
    for entry in existing.iter().chain(incoming) {
        match slots.entry(key_of(entry)) {
            Entry::Occupied(slot) => merged[*slot.get()] = entry.clone(),
            Entry::Vacant(slot) => {
                slot.insert(merged.len());
                merged.push(entry.clone());
            }
        }
    }
    merged
}

/// `merge_category` keyed by the entry's own `Keyed` capability.
pub fn merge_keyed<T: Keyed + Clone>(existing: &[T], incoming: Option<&[T]>) -> Vec<T> {
    merge_category(existing, incoming, |entry| entry.key().into_owned())
}

/// Applies every supplied category of `partial` to `existing`.
pub fn merge_partial(existing: DailyStats, partial: &PartialDailyStats) -> DailyStats {
    DailyStats {
        date: existing.date,
        sleep: merge_keyed(&existing.sleep, partial.sleep.as_deref()),
        workouts: merge_keyed(&existing.workouts, partial.workouts.as_deref()),
        meals: merge_keyed(&existing.meals, partial.meals.as_deref()),
        work: merge_keyed(&existing.work, partial.work.as_deref()),
        social: merge_keyed(&existing.social, partial.social.as_deref()),
        gaming: merge_keyed(&existing.gaming, partial.gaming.as_deref()),
        heart_rate: merge_keyed(&existing.heart_rate, partial.heart_rate.as_deref()),
    }
}

/// Per-date mutual exclusion.
///
/// tokio's mutex queues waiters in FIFO order, which gives arrival-order
/// execution for merges on the same date. A date's slot lives while any
/// caller holds or waits for it.
#[derive(Debug, Default)]
pub struct DateLocks {
    locks: DashMap<DayKey, DateSlot>,
}

#[derive(Debug, Default)]
struct DateSlot {
    lock: Arc<Mutex<()>>,
    users: usize,
}

impl DateLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other holder of `date` remains.
    ///
    /// Dropping the returned future while it waits releases its claim on the
    /// slot, so a cancelled caller leaves no entry behind.
    pub async fn acquire(&self, date: DayKey) -> DateGuard<'_> {
        let lock = {
            let mut slot = self.locks.entry(date).or_default();
            slot.users += 1;
            Arc::clone(&slot.lock)
        };
        let mut guard = DateGuard {
            locks: self,
            date,
            guard: None,
        };
        guard.guard = Some(lock.lock_owned().await);
        guard
    }

    /// Number of dates with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    fn release(&self, date: DayKey) {
        if let DashEntry::Occupied(mut slot) = self.locks.entry(date) {
            let users = &mut slot.get_mut().users;
            *users = users.saturating_sub(1);
            if *users == 0 {
                slot.remove();
            }
        }
    }
}

/// Claim on one date; holds the lock once `acquire` resolves.
pub struct DateGuard<'a> {
    locks: &'a DateLocks,
    date: DayKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for DateGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());
        self.locks.release(self.date);
    }
}

/// Owns every mutation of daily records.
pub struct Reconciler<S: KvStore> {
    repo: StatsRepository<S>,
    locks: DateLocks,
}

impl<S: KvStore> Reconciler<S> {
    pub fn new(store: S) -> Self {
        Self::with_repository(StatsRepository::new(store))
    }

    pub fn with_repository(repo: StatsRepository<S>) -> Self {
        Self {
            repo,
            locks: DateLocks::new(),
        }
    }

    pub fn repository(&self) -> &StatsRepository<S> {
        &self.repo
    }

    pub fn locks(&self) -> &DateLocks {
        &self.locks
    }

    /// Returns the canonical record for `date`, or the empty default.
    pub fn load_daily(&self, date: DayKey) -> ReconcileResult<DailyStats> {
        Ok(self
            .repo
            .load_daily(date)?
            .unwrap_or_else(|| DailyStats::empty(date)))
    }

    /// Merges `partial` into the persisted record for `date` and persists the
    /// result before returning it.
    ///
    /// # Errors
    /// - Returns `ReconcileError::Store` when the store read or write fails,
    ///   or when the merged record holds a non-finite number; the previously
    ///   persisted record is then left as it was.
    pub async fn merge_daily_stats(
        &self,
        date: DayKey,
        partial: &PartialDailyStats,
    ) -> ReconcileResult<DailyStats> {
        let _guard = self.locks.acquire(date).await;
        let started_at = Instant::now();

        let existing = self.load_daily(date)?;
        let before = existing.entry_count();
        let merged = merge_partial(existing, partial);

        if let Err(err) = self.repo.save_daily(&merged) {
            error!(
                "event=daily_merge module=reconcile status=error date={} error={}",
                date, err
            );
            return Err(err.into());
        }

        let categories: Vec<&str> = partial.categories().iter().map(|c| c.as_str()).collect();
        info!(
            "event=daily_merge module=reconcile status=ok date={} categories={} incoming={} entries_before={} entries_after={} duration_ms={}",
            date,
            categories.join(","),
            partial.entry_count(),
            before,
            merged.entry_count(),
            started_at.elapsed().as_millis()
        );
        Ok(merged)
    }
}
