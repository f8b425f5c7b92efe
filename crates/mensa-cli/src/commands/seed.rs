//! `mensa seed`: insert the configured dining halls.

use anyhow::Context;

use mensa_config::MensaConfig;

use crate::commands::open_db;

pub async fn handle(config: &MensaConfig) -> anyhow::Result<()> {
    if config.sync.halls.is_empty() {
        println!("no halls configured; add [[sync.halls]] entries to mensa.toml");
        return Ok(());
    }

    let db = open_db(config).await?;
    let inserted = db
        .seed_halls(&config.sync.halls)
        .await
        .context("failed to seed dining halls")?;
    println!(
        "seeded {inserted} new halls ({} configured)",
        config.sync.halls.len()
    );
    Ok(())
}
