//! Sync entrypoint invoked by the external refresh timer.
//!
//! # Responsibility
//! - Run each enabled source producer for one date and merge its output.
//!
//! # Invariants
//! - A failing producer contributes nothing and does not stop the others.
//! - Every merge goes through `Reconciler::merge_daily_stats`, so sync runs
//!   and foreground edits on the same date are serialized.
//! - A store failure aborts the run and is returned to the caller.

use super::source::SourceRegistry;
use crate::config::DaylogConfig;
use crate::model::keys::DayKey;
use crate::repo::kv::KvStore;
use crate::service::reconcile::{ReconcileError, Reconciler};
use log::{info, warn};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("merge failed for source `{source_id}`: {error}")]
    Reconcile {
        source_id: String,
        #[source]
        error: ReconcileError,
    },
}

/// A producer that failed during one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source_id: String,
    pub message: String,
}

/// Outcome of one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub date: DayKey,
    /// Sources whose output was merged.
    pub merged: Vec<String>,
    /// Sources that were disabled or had nothing to contribute.
    pub skipped: Vec<String>,
    pub failed: Vec<SourceFailure>,
}

impl SyncReport {
    fn new(date: DayKey) -> Self {
        Self {
            date,
            merged: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

pub struct SyncRunner<S: KvStore> {
    registry: SourceRegistry,
    reconciler: Arc<Reconciler<S>>,
    disabled: HashSet<String>,
}

impl<S: KvStore> SyncRunner<S> {
    pub fn new(registry: SourceRegistry, reconciler: Arc<Reconciler<S>>) -> Self {
        Self {
            registry,
            reconciler,
            disabled: HashSet::new(),
        }
    }

    /// Skips every registered source the config disables.
    pub fn with_config(mut self, config: &DaylogConfig) -> Self {
        self.disabled = self
            .registry
            .source_ids()
            .into_iter()
            .filter(|id| !config.is_source_enabled(id))
            .collect();
        self
    }

    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Pulls every enabled source for `date` and merges what they return.
    pub async fn sync_date(&self, date: DayKey) -> Result<SyncReport, SyncError> {
        let mut report = SyncReport::new(date);

        for (source_id, producer) in self.registry.iter() {
            if self.disabled.contains(source_id) {
                report.skipped.push(source_id.to_string());
                continue;
            }

            let partial = match producer.produce(date).await {
                Ok(partial) => partial,
                Err(err) => {
                    warn!(
                        "event=source_sync module=sync status=error source={} date={} error={}",
                        source_id, date, err
                    );
                    report.failed.push(SourceFailure {
                        source_id: source_id.to_string(),
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            if partial.entry_count() == 0 {
                report.skipped.push(source_id.to_string());
                continue;
            }

            self.reconciler
                .merge_daily_stats(date, &partial)
                .await
                .map_err(|error| SyncError::Reconcile {
                    source_id: source_id.to_string(),
                    error,
                })?;
            report.merged.push(source_id.to_string());
        }

        info!(
            "event=sync_run module=sync status={} date={} merged={} skipped={} failed={}",
            if report.is_clean() { "ok" } else { "partial" },
            date,
            report.merged.len(),
            report.skipped.len(),
            report.failed.len()
        );
        Ok(report)
    }
}
