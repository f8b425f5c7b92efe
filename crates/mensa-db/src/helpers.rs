//! Row-to-entity parsing helpers.
//!
//! Repos convert `libsql::Row` (column-indexed) into typed entity structs.
//! These helpers isolate the parsing of dates, meal types, and the
//! `group_concat` projections the read queries produce.

use chrono::NaiveDate;
use mensa_core::enums::MealType;

use crate::error::DatabaseError;

/// Parse a TEXT column holding a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string is not a valid date.
pub fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    s.parse()
        .map_err(|e| DatabaseError::Query(format!("Failed to parse date '{s}': {e}")))
}

/// Parse a TEXT column holding a meal type.
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string is not a known meal type.
pub fn parse_meal(s: &str) -> Result<MealType, DatabaseError> {
    s.parse().map_err(DatabaseError::Query)
}

/// Split a `group_concat` column into its parts.
///
/// `group_concat` yields SQL NULL when the LEFT JOIN matched nothing, which
/// surfaces here as `None` and becomes an empty list.
#[must_use]
pub fn split_group_concat(s: Option<String>) -> Vec<String> {
    match s {
        Some(s) if !s.is_empty() => s.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}
