//! Meal type enum with string round-tripping for storage and CLI parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three meal slots a dining hall publishes per day.
///
/// Serialized lowercase — the same spelling the upstream menu API uses in
/// its URL path and the database stores in `menu_items.meal_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// All meal types, in the order a sync run processes them.
    pub const ALL: [Self; 3] = [Self::Breakfast, Self::Lunch, Self::Dinner];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            other => Err(format!(
                "unknown meal type '{other}' (expected breakfast, lunch, or dinner)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_str_round_trips() {
        for meal in MealType::ALL {
            assert_eq!(meal.as_str().parse::<MealType>().unwrap(), meal);
        }
    }

    #[test]
    fn from_str_is_case_insensitive() {
        assert_eq!("Dinner".parse::<MealType>().unwrap(), MealType::Dinner);
        assert_eq!(" LUNCH ".parse::<MealType>().unwrap(), MealType::Lunch);
    }

    #[test]
    fn from_str_rejects_unknown() {
        assert!("brunch".parse::<MealType>().is_err());
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&MealType::Breakfast).unwrap();
        assert_eq!(json, "\"breakfast\"");
    }
}
