//! # mensa-client
//!
//! HTTP client for the Nutrislice menu-publishing API.
//!
//! One GET per (location, meal type, date) returns a week-shaped JSON
//! document with a `days` array. The response is handed to the normalizer
//! as raw `serde_json::Value` — upstream item shapes vary too much for a
//! typed deserialization to be worth it. No retries and no rate limiting:
//! the sync orchestrator runs strictly sequentially and degrades a failed
//! fetch to an empty slice.

mod error;
mod http;

pub use error::ClientError;

use chrono::{Datelike, NaiveDate};
use mensa_core::enums::MealType;

use crate::http::check_response;

/// HTTP client for fetching weekly menus from a Nutrislice deployment.
pub struct MenuClient {
    http: reqwest::Client,
    base_url: String,
}

impl MenuClient {
    /// Create a client for the given API root.
    ///
    /// `base_url` includes the `/menu/api` prefix and carries no trailing
    /// slash, e.g. `https://district.api.nutrislice.com/menu/api`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the underlying `reqwest::Client` fails to
    /// build.
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the week of menus containing `date` for one location and meal.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the request fails, the API returns a
    /// non-success status, or the body is not valid JSON.
    pub async fn fetch_week(
        &self,
        location_slug: &str,
        meal: MealType,
        date: NaiveDate,
    ) -> Result<serde_json::Value, ClientError> {
        let url = week_url(&self.base_url, location_slug, meal, date);
        tracing::debug!(%url, "fetching menu week");
        let resp = check_response(self.http.get(&url).send().await?).await?;
        Ok(resp.json().await?)
    }
}

/// Build the weekly menu URL for a location, meal, and date.
fn week_url(base_url: &str, location_slug: &str, meal: MealType, date: NaiveDate) -> String {
    format!(
        "{base_url}/weeks/school/{slug}/menu-type/{meal}/{year:04}/{month:02}/{day:02}/?format=json",
        slug = urlencoding::encode(location_slug),
        year = date.year(),
        month = date.month(),
        day = date.day(),
    )
}
