//! Command-line argument definitions.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use mensa_core::enums::MealType;

#[derive(Debug, Parser)]
#[command(name = "mensa", version, about = "Dining-hall menu sync")]
pub struct Cli {
    /// Only log errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Log at debug level.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch upstream menus for the configured halls, then sweep old rows.
    Sync(SyncArgs),
    /// Delete stored menu rows older than the retention window.
    Cleanup,
    /// Seed the configured dining halls into storage (idempotent).
    Seed,
    /// List the seeded dining halls.
    Halls,
    /// Show the stored menu for one hall and date.
    Menu(MenuArgs),
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Days to fetch starting today (overrides the configured lookahead).
    #[arg(long)]
    pub days: Option<u32>,

    /// Skip the retention sweep after syncing.
    #[arg(long)]
    pub no_cleanup: bool,
}

#[derive(Debug, Args)]
pub struct MenuArgs {
    /// Hall slug, e.g. `north-commons`.
    pub slug: String,

    /// Date to show (YYYY-MM-DD).
    #[arg(long)]
    pub date: NaiveDate,

    /// Limit output to one meal; all three by default.
    #[arg(long)]
    pub meal: Option<MealType>,
}
