//! Pure normalization of the upstream week JSON.
//!
//! The upstream payload is a week document: a `days` array where each day
//! carries a `menu_items` array interleaving station-header pseudo-items,
//! section titles, and actual food items, in publication order. Shapes vary
//! between deployments, so everything here reads `serde_json::Value`
//! defensively — a malformed payload yields an empty sequence, never a
//! panic.

use chrono::NaiveDate;
use serde_json::Value;

use mensa_core::entities::MenuEntry;

/// Sentinel name given to food items the upstream published without a name.
/// The orchestrator refuses to import entries carrying it.
pub const UNKNOWN_ITEM: &str = "Unknown item";

/// Fixed allergen vocabulary. An icon whose name contains any of these
/// substrings (case-insensitive) is classified as an allergen.
const ALLERGEN_VOCABULARY: [&str; 14] = [
    "dairy",
    "milk",
    "eggs",
    "egg",
    "fish",
    "shellfish",
    "tree nuts",
    "peanuts",
    "peanut",
    "wheat",
    "soybeans",
    "soy",
    "sesame",
    "gluten",
];

/// Upstream deployments spell the day's date field differently.
const DATE_FIELDS: [&str; 3] = ["date", "dateStr", "fulldate"];

/// Normalize a week payload into the menu entries for `target_date`.
///
/// Selects the day whose date field matches `target_date` under any known
/// spelling, falling back to the first day entry when nothing matches (the
/// upstream schema varies; a mismatched week still usually leads with the
/// requested day). Returns an empty sequence when `days` or `menu_items`
/// are absent or not arrays.
#[must_use]
pub fn normalize(raw: &Value, target_date: NaiveDate) -> Vec<MenuEntry> {
    let Some(days) = raw.get("days").and_then(Value::as_array) else {
        return Vec::new();
    };

    let target = target_date.to_string();
    let day = days
        .iter()
        .find(|d| {
            DATE_FIELDS
                .iter()
                .any(|field| d.get(*field).and_then(Value::as_str) == Some(target.as_str()))
        })
        .or_else(|| {
            if !days.is_empty() {
                tracing::debug!(%target, "no day matched target date, falling back to first day");
            }
            days.first()
        });

    let Some(items) = day
        .and_then(|d| d.get("menu_items"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut entries = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if flag(item, "is_station_header") || flag(item, "is_section_title") {
            continue;
        }
        let Some(food) = item.get("food").filter(|f| f.is_object()) else {
            continue;
        };

        let name = food
            .get("name")
            .and_then(Value::as_str)
            .filter(|n| !n.is_empty())
            .unwrap_or(UNKNOWN_ITEM);

        let diet_tags = extract_icon_names(food);
        // Allergens come from the same icon list, filtered by vocabulary.
        // An icon can be both a tag and an allergen; the overlap is real
        // upstream data, not something to collapse.
        let allergens: Vec<String> = diet_tags
            .iter()
            .filter(|tag| is_allergen(tag))
            .cloned()
            .collect();

        entries.push(MenuEntry {
            name: name.to_string(),
            station: station_for(items, index, item),
            diet_tags,
            allergens,
        });
    }
    entries
}

fn flag(item: &Value, field: &str) -> bool {
    item.get(field).and_then(Value::as_bool).unwrap_or(false)
}

/// The nearest preceding station header with a smaller declared position.
///
/// Headers can recur mid-list, so this scans backwards from the item rather
/// than folding once over the list. Items without a position (or with no
/// qualifying header before them) get an empty station.
fn station_for(items: &[Value], index: usize, item: &Value) -> String {
    let Some(position) = item.get("position").and_then(Value::as_i64) else {
        return String::new();
    };

    for candidate in items[..=index].iter().rev() {
        if !flag(candidate, "is_station_header") {
            continue;
        }
        let Some(header_position) = candidate.get("position").and_then(Value::as_i64) else {
            continue;
        };
        if header_position >= position {
            continue;
        }
        if let Some(text) = candidate.get("text").and_then(Value::as_str) {
            if !text.is_empty() {
                return text.to_string();
            }
        }
    }
    String::new()
}

/// Trimmed, non-empty icon names from `food.icons.food_icons`, first
/// occurrence wins.
fn extract_icon_names(food: &Value) -> Vec<String> {
    let Some(icons) = food
        .get("icons")
        .and_then(|i| i.get("food_icons"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    let mut names: Vec<String> = Vec::new();
    for icon in icons {
        let Some(name) = icon.get("name").and_then(Value::as_str) else {
            continue;
        };
        let trimmed = name.trim();
        if trimmed.is_empty() || names.iter().any(|n| n == trimmed) {
            continue;
        }
        names.push(trimmed.to_string());
    }
    names
}

fn is_allergen(name: &str) -> bool {
    let lowered = name.to_lowercase();
    ALLERGEN_VOCABULARY
        .iter()
        .any(|allergen| lowered.contains(allergen))
}
