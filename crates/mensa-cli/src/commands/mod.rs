//! Command handlers, one module per subcommand.

pub mod cleanup;
pub mod halls;
pub mod menu;
pub mod seed;
pub mod sync;

use anyhow::Context;

use mensa_config::MensaConfig;
use mensa_db::MensaDb;

/// Open the configured database.
pub async fn open_db(config: &MensaConfig) -> anyhow::Result<MensaDb> {
    MensaDb::open_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database at '{}'", config.database.path))
}
