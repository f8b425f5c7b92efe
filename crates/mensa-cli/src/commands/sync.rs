//! `mensa sync`: run the full pipeline, then the retention sweep.

use std::time::Duration;

use anyhow::Context;

use mensa_client::MenuClient;
use mensa_config::MensaConfig;
use mensa_sync::{SyncError, SyncRunner};

use crate::cli::SyncArgs;
use crate::commands::open_db;

pub async fn handle(args: &SyncArgs, config: &MensaConfig) -> anyhow::Result<()> {
    config
        .nutrislice
        .require_configured()
        .context("set MENSA_NUTRISLICE__BASE_URL or add [nutrislice] base_url to mensa.toml")?;

    let client = MenuClient::new(
        &config.nutrislice.base_url,
        Duration::from_secs(config.nutrislice.timeout_secs),
    )
    .context("failed to build upstream client")?;
    let db = open_db(config).await?;
    let runner = SyncRunner::new(db, client, &config.sync);

    match runner.sync_all(args.days).await {
        Ok(stats) => println!("sync complete: {stats}"),
        Err(SyncError::AlreadyRunning) => {
            println!("sync skipped: another run is in progress");
            return Ok(());
        }
        Err(error) => return Err(error).context("sync run failed"),
    }

    if !args.no_cleanup {
        let deleted = runner.cleanup().await;
        println!("retention sweep removed {deleted} rows");
    }

    Ok(())
}
