//! Sync run counters.

use std::fmt;

use serde::Serialize;

/// Outcome of syncing one (hall, date, meal) slice.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SliceStats {
    /// Items written into the slice.
    pub imported: u64,
    /// Items not written: the unknown-name sentinel plus items whose
    /// transaction unit rolled back.
    pub skipped: u64,
    /// Pre-existing rows removed at the replacement boundary.
    pub deleted: u64,
    /// Dietary-tag association rows written.
    pub tag_links: u64,
    /// Allergen association rows written.
    pub allergen_links: u64,
}

/// Aggregate totals for a full run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub imported: u64,
    pub skipped: u64,
    pub deleted: u64,
    pub tag_links: u64,
    pub allergen_links: u64,
    /// Configured halls that were missing from storage and skipped.
    pub halls_missing: u64,
}

impl RunStats {
    /// Fold one slice's counters into the run totals.
    pub const fn absorb(&mut self, slice: SliceStats) {
        self.imported += slice.imported;
        self.skipped += slice.skipped;
        self.deleted += slice.deleted;
        self.tag_links += slice.tag_links;
        self.allergen_links += slice.allergen_links;
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "imported {} items ({} tag links, {} allergen links), deleted {}, skipped {}",
            self.imported, self.tag_links, self.allergen_links, self.deleted, self.skipped
        )?;
        if self.halls_missing > 0 {
            write!(f, ", {} halls missing", self.halls_missing)?;
        }
        Ok(())
    }
}
