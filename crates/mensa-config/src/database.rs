//! Database location configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "mensa.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file. `:memory:` is accepted for tests.
    #[serde(default = "default_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_is_local_file() {
        assert_eq!(DatabaseConfig::default().path, "mensa.db");
    }
}
