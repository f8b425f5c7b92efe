//! Dimension repository — get-or-create tags and allergens, association links.
//!
//! These are free functions over `&libsql::Connection` rather than `MensaDb`
//! methods because the orchestrator calls them inside an open transaction
//! (`libsql::Transaction` derefs to `Connection`). Resolution and the
//! subsequent association insert are then atomic relative to the enclosing
//! menu-item write.

use crate::error::DatabaseError;

/// Get-or-create a dimension row by name, returning its id.
///
/// `INSERT OR IGNORE` followed by a re-select: an already-existing name is
/// not an error, and two callers racing on the same name both end up with
/// the single surviving row's id. Blank input resolves to `None`.
async fn resolve(
    conn: &libsql::Connection,
    insert_sql: &str,
    select_sql: &str,
    name: &str,
) -> Result<Option<i64>, DatabaseError> {
    let clean = name.trim();
    if clean.is_empty() {
        return Ok(None);
    }

    conn.execute(insert_sql, [clean]).await?;

    let mut rows = conn.query(select_sql, [clean]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row.get::<i64>(0)?)),
        None => Ok(None),
    }
}

/// Resolve a dietary tag name to its `dietary_tags.id`.
///
/// # Errors
///
/// Returns `DatabaseError` if the insert or lookup fails.
pub async fn resolve_dietary_tag(
    conn: &libsql::Connection,
    name: &str,
) -> Result<Option<i64>, DatabaseError> {
    resolve(
        conn,
        "INSERT OR IGNORE INTO dietary_tags (tag_name) VALUES (?1)",
        "SELECT id FROM dietary_tags WHERE tag_name = ?1",
        name,
    )
    .await
}

/// Resolve an allergen name to its `allergens.id`.
///
/// # Errors
///
/// Returns `DatabaseError` if the insert or lookup fails.
pub async fn resolve_allergen(
    conn: &libsql::Connection,
    name: &str,
) -> Result<Option<i64>, DatabaseError> {
    resolve(
        conn,
        "INSERT OR IGNORE INTO allergens (allergen_name) VALUES (?1)",
        "SELECT id FROM allergens WHERE allergen_name = ?1",
        name,
    )
    .await
}

/// Link a menu item to a dietary tag. Duplicate pairs are a no-op.
///
/// # Errors
///
/// Returns `DatabaseError` if the insert fails.
pub async fn link_dietary_tag(
    conn: &libsql::Connection,
    menu_item_id: i64,
    tag_id: i64,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO menu_item_dietary_tags (menu_item_id, dietary_tag_id) \
         VALUES (?1, ?2)",
        libsql::params![menu_item_id, tag_id],
    )
    .await?;
    Ok(())
}

/// Link a menu item to an allergen. Duplicate pairs are a no-op.
///
/// # Errors
///
/// Returns `DatabaseError` if the insert fails.
pub async fn link_allergen(
    conn: &libsql::Connection,
    menu_item_id: i64,
    allergen_id: i64,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR IGNORE INTO menu_item_allergens (menu_item_id, allergen_id) \
         VALUES (?1, ?2)",
        libsql::params![menu_item_id, allergen_id],
    )
    .await?;
    Ok(())
}
