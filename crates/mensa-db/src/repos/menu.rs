//! Menu item repository — slice replacement primitives, retention sweep,
//! and the read projection.
//!
//! `delete_slice` and `insert_item` are connection-level free functions so
//! the orchestrator can run them inside one enclosing transaction; the rest
//! are `MensaDb` methods on the shared connection.

use chrono::NaiveDate;
use mensa_core::entities::{MenuEntry, MenuItem};
use mensa_core::enums::MealType;

use crate::MensaDb;
use crate::error::DatabaseError;
use crate::helpers::{parse_date, parse_meal, split_group_concat};

/// Delete every stored item for one (hall, date, meal) slice.
///
/// One statement — this is the replacement boundary. Association rows go
/// with the items via `ON DELETE CASCADE`. Returns the number of deleted
/// menu rows.
///
/// # Errors
///
/// Returns `DatabaseError` if the delete fails.
pub async fn delete_slice(
    conn: &libsql::Connection,
    hall_id: i64,
    date: NaiveDate,
    meal: MealType,
) -> Result<u64, DatabaseError> {
    let deleted = conn
        .execute(
            "DELETE FROM menu_items WHERE hall_id = ?1 AND date = ?2 AND meal_type = ?3",
            libsql::params![hall_id, date.to_string(), meal.as_str()],
        )
        .await?;
    Ok(deleted)
}

/// Insert one menu item row and return its id.
///
/// # Errors
///
/// Returns `DatabaseError` if the insert fails or returns no row.
pub async fn insert_item(
    conn: &libsql::Connection,
    hall_id: i64,
    date: NaiveDate,
    meal: MealType,
    item_name: &str,
    station: &str,
) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query(
            "INSERT INTO menu_items (hall_id, date, meal_type, item_name, station) \
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
            libsql::params![hall_id, date.to_string(), meal.as_str(), item_name, station],
        )
        .await?;
    let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
    Ok(row.get::<i64>(0)?)
}

impl MensaDb {
    /// Delete all menu rows dated strictly before `cutoff`, in one statement.
    ///
    /// Returns the number of deleted rows. Dimension rows are never touched.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the delete fails.
    pub async fn sweep_before(&self, cutoff: NaiveDate) -> Result<u64, DatabaseError> {
        let deleted = self
            .conn()
            .execute(
                "DELETE FROM menu_items WHERE date < ?1",
                [cutoff.to_string()],
            )
            .await?;
        tracing::debug!(deleted, %cutoff, "swept menu rows past cutoff");
        Ok(deleted)
    }

    /// Raw menu rows for one slice, insertion order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or a row cannot be parsed.
    pub async fn list_slice_items(
        &self,
        hall_id: i64,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<Vec<MenuItem>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT id, hall_id, date, meal_type, item_name, station FROM menu_items \
                 WHERE hall_id = ?1 AND date = ?2 AND meal_type = ?3 ORDER BY id",
                libsql::params![hall_id, date.to_string(), meal.as_str()],
            )
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(MenuItem {
                id: row.get(0)?,
                hall_id: row.get(1)?,
                date: parse_date(&row.get::<String>(2)?)?,
                meal_type: parse_meal(&row.get::<String>(3)?)?,
                item_name: row.get(4)?,
                station: row.get(5)?,
            });
        }
        Ok(items)
    }

    /// Read projection for one slice: each item with its tag and allergen
    /// names grouped in, ordered by station then name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn menu_for_slice(
        &self,
        hall_id: i64,
        date: NaiveDate,
        meal: MealType,
    ) -> Result<Vec<MenuEntry>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT mi.item_name, mi.station, \
                        group_concat(DISTINCT dt.tag_name) AS dietary_tags, \
                        group_concat(DISTINCT a.allergen_name) AS allergens \
                 FROM menu_items mi \
                 LEFT JOIN menu_item_dietary_tags midt ON mi.id = midt.menu_item_id \
                 LEFT JOIN dietary_tags dt ON midt.dietary_tag_id = dt.id \
                 LEFT JOIN menu_item_allergens mia ON mi.id = mia.menu_item_id \
                 LEFT JOIN allergens a ON mia.allergen_id = a.id \
                 WHERE mi.hall_id = ?1 AND mi.date = ?2 AND mi.meal_type = ?3 \
                 GROUP BY mi.id, mi.item_name, mi.station \
                 ORDER BY mi.station, mi.item_name",
                libsql::params![hall_id, date.to_string(), meal.as_str()],
            )
            .await?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next().await? {
            entries.push(MenuEntry {
                name: row.get(0)?,
                station: row.get(1)?,
                diet_tags: split_group_concat(row.get::<Option<String>>(2)?),
                allergens: split_group_concat(row.get::<Option<String>>(3)?),
            });
        }
        Ok(entries)
    }
}
