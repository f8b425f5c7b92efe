//! # mensa-core
//!
//! Core types shared across the Mensa crates:
//! - Entity structs for dining halls and menu items
//! - The `MealType` enum
//! - Date helpers for sync windows and retention cutoffs

pub mod dates;
pub mod entities;
pub mod enums;
