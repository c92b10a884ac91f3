//! Core use-case services.
//!
//! # Responsibility
//! - Reconcile partial updates into canonical daily records.
//! - Roll daily records up into monthly and yearly summaries.
//! - Keep callers decoupled from storage details.

pub mod aggregate;
pub mod reconcile;
pub mod rollup;
