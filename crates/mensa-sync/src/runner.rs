//! Sync orchestrator.
//!
//! Owns the write path: for every (hall, date, meal) slice it fetches the
//! upstream week, normalizes it, and replaces the stored slice inside one
//! transaction. Failure handling is layered — a fetch error or a slice-level
//! storage error zeroes that slice; a single bad item rolls back alone via
//! its savepoint; only pre-slice failures (hall lookup, storage access)
//! propagate to the caller.

use chrono::{Local, NaiveDate};
use serde_json::Value;
use tracing::{debug, info, warn};

use mensa_client::{ClientError, MenuClient};
use mensa_config::SyncConfig;
use mensa_core::dates::{next_n_dates, retention_cutoff};
use mensa_core::entities::{DiningHall, HallSeed, MenuEntry};
use mensa_core::enums::MealType;
use mensa_db::MensaDb;
use mensa_db::error::DatabaseError;
use mensa_db::repos::{dimension, menu};

use crate::error::SyncError;
use crate::normalize::{UNKNOWN_ITEM, normalize};
use crate::stats::{RunStats, SliceStats};

/// Where weekly menu payloads come from.
///
/// The production impl is [`MenuClient`]; tests substitute a canned source.
#[allow(async_fn_in_trait)]
pub trait MenuSource {
    /// Fetch the week of menus containing `date` for one location and meal.
    async fn fetch_week(
        &self,
        location_slug: &str,
        meal: MealType,
        date: NaiveDate,
    ) -> Result<Value, ClientError>;
}

impl MenuSource for MenuClient {
    async fn fetch_week(
        &self,
        location_slug: &str,
        meal: MealType,
        date: NaiveDate,
    ) -> Result<Value, ClientError> {
        Self::fetch_week(self, location_slug, meal, date).await
    }
}

/// The sync orchestrator. One instance per process; a run is single-flight.
pub struct SyncRunner<S> {
    db: MensaDb,
    source: S,
    halls: Vec<HallSeed>,
    days_ahead: u32,
    retention_days: u32,
    run_lock: tokio::sync::Mutex<()>,
}

impl<S: MenuSource> SyncRunner<S> {
    /// Build a runner from storage, a menu source, and the sync settings.
    ///
    /// Hall list, lookahead window, and retention window all come from
    /// configuration so tests can run against synthetic sets.
    pub fn new(db: MensaDb, source: S, config: &SyncConfig) -> Self {
        Self {
            db,
            source,
            halls: config.halls.clone(),
            days_ahead: config.days_ahead,
            retention_days: config.retention_days,
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Access the underlying database handle (read queries, tests).
    #[must_use]
    pub const fn db(&self) -> &MensaDb {
        &self.db
    }

    /// Run a full sync: every configured hall × the date window × all meals,
    /// strictly sequentially.
    ///
    /// `days_override` replaces the configured lookahead for this run.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::AlreadyRunning`] if another run holds the lock
    /// (the invocation is skipped, not queued), or a storage error raised
    /// outside slice processing.
    pub async fn sync_all(&self, days_override: Option<u32>) -> Result<RunStats, SyncError> {
        let Ok(_guard) = self.run_lock.try_lock() else {
            warn!("sync already in progress, skipping this trigger");
            return Err(SyncError::AlreadyRunning);
        };

        let days = days_override.unwrap_or(self.days_ahead);
        let today = Local::now().date_naive();
        self.run_window(today, days).await
    }

    /// The body of a run, with an explicit start date for testability.
    /// Callers go through [`Self::sync_all`], which holds the run lock.
    async fn run_window(&self, today: NaiveDate, days: u32) -> Result<RunStats, SyncError> {
        let dates = next_n_dates(today, days);
        info!(
            days = dates.len(),
            halls = self.halls.len(),
            "starting menu sync"
        );
        if self.halls.is_empty() {
            warn!("no halls configured, nothing to sync");
        }

        let mut totals = RunStats::default();
        for hall in &self.halls {
            let Some(hall_row) = self.db.find_hall_by_slug(&hall.slug).await? else {
                warn!(slug = %hall.slug, "hall not found in database, skipping");
                totals.halls_missing += 1;
                continue;
            };

            for &date in &dates {
                for meal in MealType::ALL {
                    totals.absorb(self.sync_slice(&hall_row, date, meal).await);
                }
            }
        }

        info!(%totals, "menu sync complete");
        Ok(totals)
    }

    /// Sync one (hall, date, meal) slice.
    ///
    /// Fetch errors and slice-level storage errors degrade to zero stats:
    /// bad upstream data must never erase good stored data, and one broken
    /// slice must never stop the run.
    pub async fn sync_slice(&self, hall: &DiningHall, date: NaiveDate, meal: MealType) -> SliceStats {
        let raw = match self.source.fetch_week(&hall.slug, meal, date).await {
            Ok(raw) => raw,
            Err(error) => {
                warn!(slug = %hall.slug, %date, %meal, %error, "fetch failed, slice contributes nothing");
                return SliceStats::default();
            }
        };

        let entries = normalize(&raw, date);
        if entries.is_empty() {
            // Nothing to report is not "withdraw everything": keep whatever
            // is already stored for this slice.
            debug!(slug = %hall.slug, %date, %meal, "no items from upstream");
            return SliceStats::default();
        }

        match self.replace_slice(hall.id, date, meal, &entries).await {
            Ok(stats) => {
                debug!(slug = %hall.slug, %date, %meal, imported = stats.imported, "slice replaced");
                stats
            }
            Err(error) => {
                warn!(slug = %hall.slug, %date, %meal, %error, "slice replacement failed");
                SliceStats::default()
            }
        }
    }

    /// Replace the stored slice with `entries`, atomically.
    ///
    /// Delete and all inserts share one transaction, so readers never see
    /// the slice half-replaced. Each item gets a savepoint: an item-level
    /// failure rolls back that item alone and counts it as skipped.
    async fn replace_slice(
        &self,
        hall_id: i64,
        date: NaiveDate,
        meal: MealType,
        entries: &[MenuEntry],
    ) -> Result<SliceStats, DatabaseError> {
        let tx = self.db.conn().transaction().await?;
        let mut stats = SliceStats {
            deleted: menu::delete_slice(&tx, hall_id, date, meal).await?,
            ..SliceStats::default()
        };

        for (index, entry) in entries.iter().enumerate() {
            if entry.name == UNKNOWN_ITEM {
                stats.skipped += 1;
                continue;
            }

            let savepoint = format!("item_{index}");
            tx.execute(&format!("SAVEPOINT {savepoint}"), ()).await?;
            match import_entry(&tx, hall_id, date, meal, entry).await {
                Ok((tag_links, allergen_links)) => {
                    tx.execute(&format!("RELEASE {savepoint}"), ()).await?;
                    stats.imported += 1;
                    stats.tag_links += tag_links;
                    stats.allergen_links += allergen_links;
                }
                Err(error) => {
                    warn!(item = %entry.name, %error, "item import failed, rolled back");
                    tx.execute(&format!("ROLLBACK TO {savepoint}"), ()).await?;
                    tx.execute(&format!("RELEASE {savepoint}"), ()).await?;
                    stats.skipped += 1;
                }
            }
        }

        tx.commit().await?;
        Ok(stats)
    }

    /// Retention sweep: delete menu rows older than the retention window.
    pub async fn cleanup(&self) -> u64 {
        sweep(&self.db, self.retention_days).await
    }
}

/// Delete menu rows dated more than `retention_days` before today.
///
/// Best-effort — failures are logged and swallowed so the calling job never
/// aborts over cleanup.
pub async fn sweep(db: &MensaDb, retention_days: u32) -> u64 {
    let cutoff = retention_cutoff(Local::now().date_naive(), retention_days);
    match db.sweep_before(cutoff).await {
        Ok(deleted) => {
            info!(deleted, %cutoff, "retention sweep complete");
            deleted
        }
        Err(error) => {
            warn!(%error, "retention sweep failed");
            0
        }
    }
}

/// Insert one menu item plus its tag and allergen links, returning the link
/// counts. Runs on the caller's transaction.
async fn import_entry(
    conn: &libsql::Connection,
    hall_id: i64,
    date: NaiveDate,
    meal: MealType,
    entry: &MenuEntry,
) -> Result<(u64, u64), DatabaseError> {
    let item_id = menu::insert_item(conn, hall_id, date, meal, &entry.name, &entry.station).await?;

    let mut tag_links = 0;
    for tag in &entry.diet_tags {
        if let Some(tag_id) = dimension::resolve_dietary_tag(conn, tag).await? {
            dimension::link_dietary_tag(conn, item_id, tag_id).await?;
            tag_links += 1;
        }
    }

    let mut allergen_links = 0;
    for allergen in &entry.allergens {
        if let Some(allergen_id) = dimension::resolve_allergen(conn, allergen).await? {
            dimension::link_allergen(conn, item_id, allergen_id).await?;
            allergen_links += 1;
        }
    }

    Ok((tag_links, allergen_links))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Canned menu source: one payload for every (hall, meal, date), or a
    /// simulated fetch failure.
    struct StubSource {
        payload: Result<Value, ()>,
    }

    impl StubSource {
        fn with(payload: Value) -> Self {
            Self {
                payload: Ok(payload),
            }
        }

        fn failing() -> Self {
            Self { payload: Err(()) }
        }
    }

    impl MenuSource for StubSource {
        async fn fetch_week(
            &self,
            _location_slug: &str,
            _meal: MealType,
            _date: NaiveDate,
        ) -> Result<Value, ClientError> {
            match &self.payload {
                Ok(value) => Ok(value.clone()),
                Err(()) => Err(ClientError::Api {
                    status: 500,
                    message: "stubbed outage".to_string(),
                }),
            }
        }
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn hall_seeds() -> Vec<HallSeed> {
        vec![HallSeed {
            slug: "north-commons".to_string(),
            name: "North Commons".to_string(),
        }]
    }

    fn config() -> SyncConfig {
        SyncConfig {
            days_ahead: 1,
            retention_days: 7,
            halls: hall_seeds(),
        }
    }

    fn week_payload(date: &str) -> Value {
        json!({ "days": [{ "date": date, "menu_items": [
            { "is_station_header": true, "text": "Grill", "position": 1 },
            { "position": 2, "food": { "name": "Burger", "icons": { "food_icons": [
                { "name": "Vegan" }, { "name": "Gluten" }
            ]}}},
            { "position": 3, "food": { "name": "Veggie Skewer", "icons": { "food_icons": [
                { "name": "Vegan" }
            ]}}},
            { "position": 4, "food": {} },
        ]}]})
    }

    async fn runner_with(source: StubSource) -> (SyncRunner<StubSource>, DiningHall) {
        let db = MensaDb::open_local(":memory:").await.unwrap();
        db.seed_halls(&hall_seeds()).await.unwrap();
        let hall = db
            .find_hall_by_slug("north-commons")
            .await
            .unwrap()
            .unwrap();
        (SyncRunner::new(db, source, &config()), hall)
    }

    #[tokio::test]
    async fn slice_sync_imports_and_links() {
        let (runner, hall) =
            runner_with(StubSource::with(week_payload("2026-08-26"))).await;

        let stats = runner.sync_slice(&hall, d("2026-08-26"), MealType::Lunch).await;
        assert_eq!(stats.imported, 2);
        assert_eq!(stats.skipped, 1, "nameless item is skipped");
        assert_eq!(stats.deleted, 0);
        assert_eq!(stats.tag_links, 3, "Vegan+Gluten on one, Vegan on the other");
        assert_eq!(stats.allergen_links, 1);

        let items = runner
            .db()
            .list_slice_items(hall.id, d("2026-08-26"), MealType::Lunch)
            .await
            .unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, vec!["Burger", "Veggie Skewer"]);
        assert_eq!(items[0].station, "Grill");
    }

    #[tokio::test]
    async fn slice_sync_is_idempotent() {
        let (runner, hall) =
            runner_with(StubSource::with(week_payload("2026-08-26"))).await;

        let first = runner.sync_slice(&hall, d("2026-08-26"), MealType::Lunch).await;
        let second = runner.sync_slice(&hall, d("2026-08-26"), MealType::Lunch).await;
        assert_eq!(first.imported, 2);
        assert_eq!(second.imported, 2);
        assert_eq!(second.deleted, 2, "second run replaces the first");

        let items = runner
            .db()
            .list_slice_items(hall.id, d("2026-08-26"), MealType::Lunch)
            .await
            .unwrap();
        assert_eq!(items.len(), 2, "no accumulation across runs");
    }

    #[tokio::test]
    async fn shared_tag_resolves_to_one_dimension_row() {
        let (runner, hall) =
            runner_with(StubSource::with(week_payload("2026-08-26"))).await;
        runner.sync_slice(&hall, d("2026-08-26"), MealType::Lunch).await;

        let mut rows = runner
            .db()
            .conn()
            .query("SELECT COUNT(*) FROM dietary_tags WHERE tag_name = 'Vegan'", ())
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);

        let mut rows = runner
            .db()
            .conn()
            .query(
                "SELECT COUNT(*) FROM menu_item_dietary_tags midt \
                 JOIN dietary_tags dt ON dt.id = midt.dietary_tag_id \
                 WHERE dt.tag_name = 'Vegan'",
                (),
            )
            .await
            .unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 2, "both items reference it");
    }

    #[tokio::test]
    async fn item_write_failure_rolls_back_that_item_alone() {
        let raw = json!({ "days": [{ "date": "2026-08-26", "menu_items": [
            { "position": 1, "food": { "name": "Tagged", "icons": { "food_icons": [
                { "name": "Vegan" }
            ]}}},
            { "position": 2, "food": { "name": "Plain" } },
        ]}]});
        let (runner, hall) = runner_with(StubSource::with(raw)).await;

        // Sabotage the tag-link insert so the first item's unit fails
        // mid-import; its savepoint must roll back the item insert too.
        runner
            .db()
            .conn()
            .execute("DROP TABLE menu_item_dietary_tags", ())
            .await
            .unwrap();

        let stats = runner.sync_slice(&hall, d("2026-08-26"), MealType::Lunch).await;
        assert_eq!(stats.imported, 1);
        assert_eq!(stats.skipped, 1, "failed item counts as skipped");
        assert_eq!(stats.tag_links, 0);

        let items = runner
            .db()
            .list_slice_items(hall.id, d("2026-08-26"), MealType::Lunch)
            .await
            .unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.item_name.as_str()).collect();
        assert_eq!(names, vec!["Plain"], "only the surviving item is stored");
    }

    #[tokio::test]
    async fn empty_upstream_leaves_stored_slice_untouched() {
        let (runner, hall) =
            runner_with(StubSource::with(json!({ "days": [] }))).await;

        menu::insert_item(
            runner.db().conn(),
            hall.id,
            d("2026-08-26"),
            MealType::Lunch,
            "Existing",
            "",
        )
        .await
        .unwrap();

        let stats = runner.sync_slice(&hall, d("2026-08-26"), MealType::Lunch).await;
        assert_eq!(stats, SliceStats::default(), "no delete issued");

        let items = runner
            .db()
            .list_slice_items(hall.id, d("2026-08-26"), MealType::Lunch)
            .await
            .unwrap();
        assert_eq!(items.len(), 1, "existing data survives an empty response");
    }

    #[tokio::test]
    async fn fetch_failure_degrades_to_zero_stats() {
        let (runner, hall) = runner_with(StubSource::failing()).await;

        menu::insert_item(
            runner.db().conn(),
            hall.id,
            d("2026-08-26"),
            MealType::Lunch,
            "Existing",
            "",
        )
        .await
        .unwrap();

        let stats = runner.sync_slice(&hall, d("2026-08-26"), MealType::Lunch).await;
        assert_eq!(stats, SliceStats::default());

        let items = runner
            .db()
            .list_slice_items(hall.id, d("2026-08-26"), MealType::Lunch)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn run_window_covers_all_meals_and_skips_missing_halls() {
        let db = MensaDb::open_local(":memory:").await.unwrap();
        db.seed_halls(&hall_seeds()).await.unwrap();

        let mut cfg = config();
        cfg.halls.push(HallSeed {
            slug: "phantom-hall".to_string(),
            name: "Phantom".to_string(),
        });

        let runner = SyncRunner::new(
            db,
            StubSource::with(week_payload("2026-08-26")),
            &cfg,
        );

        let totals = runner.run_window(d("2026-08-26"), 1).await.unwrap();
        // 1 day x 3 meals x 2 importable items, for the one seeded hall
        assert_eq!(totals.imported, 6);
        assert_eq!(totals.halls_missing, 1);
    }

    #[tokio::test]
    async fn overlapping_run_is_refused() {
        let (runner, _hall) =
            runner_with(StubSource::with(json!({ "days": [] }))).await;

        let guard = runner.run_lock.try_lock().unwrap();
        let result = runner.sync_all(Some(1)).await;
        assert!(matches!(result, Err(SyncError::AlreadyRunning)));
        drop(guard);

        // Once the lock frees, a run goes through again.
        assert!(runner.sync_all(Some(1)).await.is_ok());
    }

    #[tokio::test]
    async fn cleanup_sweeps_rows_past_retention() {
        let (runner, hall) =
            runner_with(StubSource::with(json!({ "days": [] }))).await;

        let today = Local::now().date_naive();
        let old = retention_cutoff(today, 8);
        let recent = retention_cutoff(today, 2);

        menu::insert_item(runner.db().conn(), hall.id, old, MealType::Lunch, "Old", "")
            .await
            .unwrap();
        menu::insert_item(runner.db().conn(), hall.id, recent, MealType::Lunch, "Recent", "")
            .await
            .unwrap();

        let deleted = runner.cleanup().await;
        assert_eq!(deleted, 1);

        let remaining = runner
            .db()
            .list_slice_items(hall.id, recent, MealType::Lunch)
            .await
            .unwrap();
        assert_eq!(remaining.len(), 1);
    }
}
