//! `mensa menu`: print the stored menu for one hall and date.

use anyhow::Context;

use mensa_config::MensaConfig;
use mensa_core::entities::MenuEntry;
use mensa_core::enums::MealType;

use crate::cli::MenuArgs;
use crate::commands::open_db;

pub async fn handle(args: &MenuArgs, config: &MensaConfig) -> anyhow::Result<()> {
    let db = open_db(config).await?;
    let hall = db
        .find_hall_by_slug(&args.slug)
        .await
        .context("failed to look up hall")?
        .with_context(|| format!("unknown hall '{}'; run `mensa halls` to list them", args.slug))?;

    let meals: Vec<MealType> = match args.meal {
        Some(meal) => vec![meal],
        None => MealType::ALL.to_vec(),
    };

    println!("{} ({}) on {}", hall.name, hall.slug, args.date);
    for meal in meals {
        let entries = db
            .menu_for_slice(hall.id, args.date, meal)
            .await
            .with_context(|| format!("failed to read the {meal} menu"))?;

        println!("\n{meal}:");
        if entries.is_empty() {
            println!("  (no items stored)");
            continue;
        }
        for entry in entries {
            println!("  {}", format_entry(&entry));
        }
    }
    Ok(())
}

fn format_entry(entry: &MenuEntry) -> String {
    let mut line = String::new();
    if entry.station.is_empty() {
        line.push_str(&entry.name);
    } else {
        line.push_str(&format!("[{}] {}", entry.station, entry.name));
    }
    if !entry.diet_tags.is_empty() {
        line.push_str(&format!(" tags: {}", entry.diet_tags.join(", ")));
    }
    if !entry.allergens.is_empty() {
        line.push_str(&format!(" allergens: {}", entry.allergens.join(", ")));
    }
    line
}
