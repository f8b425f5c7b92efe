//! # mensa-sync
//!
//! The menu synchronization pipeline.
//!
//! Three pieces:
//! - [`normalize`]: pure transformation of the upstream week JSON into an
//!   ordered sequence of menu entries with station attribution and
//!   tag/allergen classification.
//! - [`runner::SyncRunner`]: the orchestrator. Fetches, normalizes, and
//!   transactionally replaces each (hall, date, meal) slice, degrading
//!   failures to slice or item granularity. Also owns the retention sweep.
//! - [`stats`]: per-slice and per-run counters.
//!
//! A full run iterates halls × dates × meals strictly sequentially and is
//! single-flight: an overlapping invocation is refused, not queued.

pub mod error;
pub mod normalize;
pub mod runner;
pub mod stats;

pub use error::SyncError;
pub use runner::{MenuSource, SyncRunner, sweep};
