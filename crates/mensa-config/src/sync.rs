//! Sync pipeline configuration.

use mensa_core::entities::HallSeed;
use serde::{Deserialize, Serialize};

/// Default number of days fetched per run (today + 6).
const fn default_days_ahead() -> u32 {
    7
}

/// Default retention window: rows older than a week are swept.
const fn default_retention_days() -> u32 {
    7
}

/// Settings that drive the sync orchestrator.
///
/// The hall list lives here rather than in code so test deployments can run
/// against a synthetic hall set. Halls must also exist in `dining_halls`
/// (seeded via `mensa seed`); a configured hall missing from the database is
/// skipped with a warning at sync time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// How many days of menus to fetch per run, starting today.
    #[serde(default = "default_days_ahead")]
    pub days_ahead: u32,

    /// Menu rows dated more than this many days in the past are swept.
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    /// Dining halls to sync, in run order.
    #[serde(default)]
    pub halls: Vec<HallSeed>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            days_ahead: default_days_ahead(),
            retention_days: default_retention_days(),
            halls: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_job() {
        let config = SyncConfig::default();
        assert_eq!(config.days_ahead, 7);
        assert_eq!(config.retention_days, 7);
        assert!(config.halls.is_empty());
    }
}
