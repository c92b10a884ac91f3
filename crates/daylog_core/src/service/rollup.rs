//! Summary rollup service.
//!
//! # Responsibility
//! - Recompute monthly and yearly summaries on request and persist them.
//!
//! # Invariants
//! - Rollups only read daily/monthly records; they never rewrite inputs.
//! - Recomputation is a deliberate pull; nothing here runs on merge.

use crate::model::keys::{MonthKey, YearKey};
use crate::model::summary::{MonthlySummary, YearlySummary};
use crate::repo::kv::{KvStore, StoreError};
use crate::repo::stats_repo::StatsRepository;
use crate::service::aggregate::{aggregate_month, aggregate_year};
use log::info;
use thiserror::Error;

pub type RollupResult<T> = Result<T, RollupError>;

#[derive(Debug, Error)]
pub enum RollupError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct RollupService<S: KvStore> {
    repo: StatsRepository<S>,
}

impl<S: KvStore> RollupService<S> {
    pub fn new(store: S) -> Self {
        Self {
            repo: StatsRepository::new(store),
        }
    }

    pub fn repository(&self) -> &StatsRepository<S> {
        &self.repo
    }

    /// Recomputes `monthly:<month>` from the month's daily records.
    pub fn refresh_month(&self, month: MonthKey) -> RollupResult<MonthlySummary> {
        let days = self.repo.list_daily_for_month(month)?;
        let summary = aggregate_month(month, &days);
        self.repo.save_monthly(&summary)?;

        info!(
            "event=month_rollup module=rollup status=ok month={} days={} workouts={} sleep_minutes={}",
            month,
            days.len(),
            summary.total_workouts,
            summary.total_sleep_minutes
        );
        Ok(summary)
    }

    /// Recomputes `yearly:<year>` from the persisted monthly summaries.
    pub fn refresh_year(&self, year: YearKey) -> RollupResult<YearlySummary> {
        let months = self.repo.list_monthly_for_year(year)?;
        let summary = aggregate_year(year, &months);
        self.repo.save_yearly(&summary)?;

        info!(
            "event=year_rollup module=rollup status=ok year={} months={}",
            year,
            summary.months.len()
        );
        Ok(summary)
    }

    /// Refreshes every month of `year` that has daily data, then the year.
    pub fn refresh_year_from_days(&self, year: YearKey) -> RollupResult<YearlySummary> {
        for month in self.repo.list_months_with_days(year)? {
            self.refresh_month(month)?;
        }
        self.refresh_year(year)
    }
}
