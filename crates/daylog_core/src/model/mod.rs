//! Domain model for daily activity tracking.
//!
//! # Responsibility
//! - Define canonical record shapes shared by reconciliation and rollups.
//! - Keep one keyed shape per category so merges never duck-type fields.
//!
//! # Invariants
//! - Every daily record is identified by its `DayKey`.
//! - Entries are unique per category by `Keyed::key`.

pub mod daily;
pub mod entry;
pub mod keys;
pub mod summary;
