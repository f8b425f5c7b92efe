//! Dining hall repository — seeding and lookup.
//!
//! Halls are reference data. The sync pipeline only reads them; `seed` is
//! invoked explicitly (CLI `mensa seed`) and is idempotent by slug.

use mensa_core::entities::{DiningHall, HallSeed};

use crate::MensaDb;
use crate::error::DatabaseError;

const SELECT_COLS: &str = "id, slug, name";

fn row_to_hall(row: &libsql::Row) -> Result<DiningHall, DatabaseError> {
    Ok(DiningHall {
        id: row.get(0)?,
        slug: row.get(1)?,
        name: row.get(2)?,
    })
}

impl MensaDb {
    /// Insert any halls not already present, keyed by slug.
    ///
    /// Returns the number of newly inserted rows. Existing halls are left
    /// untouched (their display name is not overwritten).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if an insert fails.
    pub async fn seed_halls(&self, halls: &[HallSeed]) -> Result<u64, DatabaseError> {
        let mut inserted = 0;
        for hall in halls {
            inserted += self
                .conn()
                .execute(
                    "INSERT OR IGNORE INTO dining_halls (slug, name) VALUES (?1, ?2)",
                    libsql::params![hall.slug.as_str(), hall.name.as_str()],
                )
                .await?;
        }
        Ok(inserted)
    }

    /// Point lookup of a hall by slug. `None` if the hall is not seeded.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_hall_by_slug(&self, slug: &str) -> Result<Option<DiningHall>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM dining_halls WHERE slug = ?1"),
                [slug],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_hall(&row)?)),
            None => Ok(None),
        }
    }

    /// All seeded halls, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_halls(&self) -> Result<Vec<DiningHall>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                &format!("SELECT {SELECT_COLS} FROM dining_halls ORDER BY name"),
                (),
            )
            .await?;
        let mut halls = Vec::new();
        while let Some(row) = rows.next().await? {
            halls.push(row_to_hall(&row)?);
        }
        Ok(halls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_halls, test_db};
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn seed_and_lookup() {
        let db = test_db().await;
        let inserted = db.seed_halls(&sample_halls()).await.unwrap();
        assert_eq!(inserted, 2);

        let hall = db.find_hall_by_slug("north-commons").await.unwrap().unwrap();
        assert_eq!(hall.name, "North Commons");
        assert!(hall.id > 0);
    }

    #[tokio::test]
    async fn seed_is_idempotent() {
        let db = test_db().await;
        db.seed_halls(&sample_halls()).await.unwrap();
        let second = db.seed_halls(&sample_halls()).await.unwrap();
        assert_eq!(second, 0);

        let halls = db.list_halls().await.unwrap();
        assert_eq!(halls.len(), 2);
    }

    #[tokio::test]
    async fn missing_hall_is_none() {
        let db = test_db().await;
        assert!(db.find_hall_by_slug("nowhere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_halls_ordered_by_name() {
        let db = test_db().await;
        db.seed_halls(&sample_halls()).await.unwrap();
        let halls = db.list_halls().await.unwrap();
        let names: Vec<&str> = halls.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["North Commons", "South Refectory"]);
    }
}
