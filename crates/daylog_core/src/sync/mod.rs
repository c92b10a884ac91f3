//! Source producers and the sync entrypoint.
//!
//! # Responsibility
//! - Turn manual input and external API samples into partial daily records.
//! - Feed those partials through the reconciler on each sync run.
//!
//! # Invariants
//! - Producer-side validation happens here; the reconciler never rejects
//!   a partial.

pub mod game;
pub mod manual;
pub mod runner;
pub mod source;
pub mod wearable;
