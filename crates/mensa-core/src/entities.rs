//! Entity structs for the menu schema.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::MealType;

/// A dining hall as stored in `dining_halls`.
///
/// Read-only reference data: halls are pre-seeded and never created by the
/// sync pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiningHall {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

/// A hall definition before it has a database identity.
///
/// Used for configuration (`[sync] halls = [...]`) and seeding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HallSeed {
    pub slug: String,
    pub name: String,
}

/// A stored menu item row. Belongs to exactly one (hall, date, meal) slice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuItem {
    pub id: i64,
    pub hall_id: i64,
    pub date: NaiveDate,
    pub meal_type: MealType,
    pub item_name: String,
    pub station: String,
}

/// One menu entry with its classifications.
///
/// This is both the normalizer's output shape and the read projection
/// returned when menu items are queried back with their tags and allergens.
/// The two lists may overlap: the upstream feed publishes allergens in the
/// same icon collection as dietary preferences, and that overlap is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuEntry {
    pub name: String,
    pub station: String,
    pub diet_tags: Vec<String>,
    pub allergens: Vec<String>,
}
