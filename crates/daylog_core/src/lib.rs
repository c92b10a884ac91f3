//! Core domain logic for daylog.
//! Daily activity records, their reconciliation, and monthly/yearly rollups.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use config::{ConfigError, DaylogConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::daily::{DailyStats, DailyStatsValidationError, PartialDailyStats};
pub use model::entry::{Category, CategoryEntry, Keyed};
pub use model::keys::{DayKey, KeyParseError, MonthKey, YearKey};
pub use model::summary::{DayVitals, MonthlySummary, YearlySummary};
pub use repo::kv::{KvStore, StoreError, StoreResult};
pub use repo::memory_store::MemoryKvStore;
pub use repo::sqlite_store::SqliteKvStore;
pub use repo::stats_repo::StatsRepository;
pub use service::aggregate::{aggregate_month, aggregate_year, day_vitals};
pub use service::reconcile::{merge_partial, ReconcileError, Reconciler};
pub use service::rollup::{RollupError, RollupService};
pub use sync::runner::{SyncError, SyncReport, SyncRunner};
pub use sync::source::{SourceError, SourceProducer, SourceRegistry};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
