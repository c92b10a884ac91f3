//! Persistence layer: key-value contract, implementations, typed access.
//!
//! # Responsibility
//! - Define the durable store contract the core depends on.
//! - Isolate SQLite and JSON encoding details from merge/rollup logic.
//!
//! # Invariants
//! - Malformed persisted values read as absent.
//! - Store transport failures propagate to callers unchanged.

pub mod kv;
pub mod memory_store;
pub mod sqlite_store;
pub mod stats_repo;
