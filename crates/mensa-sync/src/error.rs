//! Sync pipeline error types.

use thiserror::Error;

/// Errors surfaced by the orchestrator.
///
/// Fetch and item-write failures never appear here — they are recovered at
/// slice / item granularity and show up only in the run counters. What does
/// surface is a refused overlapping run and failures that occur outside
/// slice processing (hall lookup, storage access).
#[derive(Debug, Error)]
pub enum SyncError {
    /// A sync run is already in progress; this invocation was skipped.
    #[error("a sync run is already in progress")]
    AlreadyRunning,

    /// Storage failure outside the per-item recovery boundary.
    #[error(transparent)]
    Database(#[from] mensa_db::error::DatabaseError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
