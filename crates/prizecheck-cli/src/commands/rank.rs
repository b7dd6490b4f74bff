//! The `prizecheck rank` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use prizecheck_core::rank::PROGRESS_MAX;
use prizecheck_store::{load_config_from, ProfileStore};

use super::{check_format, profile_store};

/// Rounds shown in the text history table.
const RECENT_ROUNDS: usize = 10;

pub fn execute(profile: Option<PathBuf>, format: String, config_path: Option<PathBuf>) -> Result<()> {
    check_format(&format)?;
    let config = load_config_from(config_path.as_deref())?;
    let store = profile_store(profile, &config);
    let profile = store.load()?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&profile)?);
        return Ok(());
    }

    let rank = profile.rank;
    println!("Rank: {}", rank.tier.label());
    if rank.tier.uses_elo() {
        println!("Elo: {}", rank.elo);
    } else {
        println!("Progress: {}/{}", rank.progress, PROGRESS_MAX as u32);
    }
    match profile.personal_best {
        Some(best) => println!("Personal best: {best}"),
        None => println!("Personal best: none yet"),
    }
    println!("Rounds played: {}", profile.rounds_played);

    if profile.history.is_empty() {
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Played", "Score", "Accuracy", "Time", "Tier"]);
    for record in profile.history.iter().rev().take(RECENT_ROUNDS) {
        table.add_row(vec![
            Cell::new(record.played_at.format("%Y-%m-%d %H:%M")),
            Cell::new(record.score),
            Cell::new(format!("{}%", record.accuracy)),
            Cell::new(format!("{:.0}s", record.used_time)),
            Cell::new(record.tier_after.label()),
        ]);
    }
    println!("\n{table}");

    Ok(())
}
