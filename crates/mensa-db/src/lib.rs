//! # mensa-db
//!
//! libSQL storage for Mensa menu data.
//!
//! Holds the relational schema the sync pipeline writes into: dining halls
//! (pre-seeded reference data), per-day menu items, and the deduplicated
//! dietary-tag / allergen dimension tables with their association rows.
//!
//! Write primitives that must compose inside an open transaction (item
//! insert, dimension get-or-create, association links, slice delete) take a
//! `&libsql::Connection`; `libsql::Transaction` derefs to `Connection`, so
//! the orchestrator can pass its transaction straight through.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;

#[cfg(test)]
pub(crate) mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Mensa storage operations.
pub struct MensaDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl MensaDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let mensa_db = Self { db, conn };
        mensa_db.run_migrations().await?;
        tracing::debug!(path, "database opened, migrations applied");
        Ok(mensa_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }
}
