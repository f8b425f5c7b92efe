//! Upstream menu API configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default request timeout in seconds.
const fn default_timeout_secs() -> u64 {
    8
}

/// Connection settings for the Nutrislice menu API.
///
/// `base_url` is the API root up to and including `/menu/api`, e.g.
/// `https://<district>.api.nutrislice.com/menu/api`. There is no default:
/// each deployment points at its own district subdomain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NutrisliceConfig {
    /// API root URL (no trailing slash).
    #[serde(default)]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl NutrisliceConfig {
    /// Whether the upstream API can be reached with this configuration.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }

    /// Error unless a base URL is set. For entry points that need the
    /// upstream API rather than just local storage.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when `base_url` is empty.
    pub fn require_configured(&self) -> Result<(), ConfigError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(ConfigError::NotConfigured {
                section: "nutrislice".to_string(),
            })
        }
    }
}

impl Default for NutrisliceConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}
