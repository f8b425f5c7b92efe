//! `mensa cleanup`: run the retention sweep on its own.

use mensa_config::MensaConfig;

use crate::commands::open_db;

pub async fn handle(config: &MensaConfig) -> anyhow::Result<()> {
    let db = open_db(config).await?;
    let deleted = mensa_sync::sweep(&db, config.sync.retention_days).await;
    println!("retention sweep removed {deleted} rows");
    Ok(())
}
