//! `mensa halls`: list the seeded dining halls.

use anyhow::Context;

use mensa_config::MensaConfig;

use crate::commands::open_db;

pub async fn handle(config: &MensaConfig) -> anyhow::Result<()> {
    let db = open_db(config).await?;
    let halls = db.list_halls().await.context("failed to list halls")?;

    if halls.is_empty() {
        println!("no halls seeded; run `mensa seed` first");
        return Ok(());
    }

    for hall in halls {
        println!("{:<24} {}", hall.slug, hall.name);
    }
    Ok(())
}
