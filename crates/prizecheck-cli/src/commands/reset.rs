//! The `prizecheck reset` command.

use std::path::PathBuf;

use anyhow::Result;

use prizecheck_core::model::Tier;
use prizecheck_store::{load_config_from, reset, reset_at};

use super::profile_store;

pub fn execute(
    profile: Option<PathBuf>,
    tier: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let tier = tier.as_deref().map(str::parse::<Tier>).transpose()?;
    let config = load_config_from(config_path.as_deref())?;
    let store = profile_store(profile, &config);

    let fresh = match tier {
        Some(tier) => reset_at(&store, tier)?,
        None => reset(&store)?,
    };

    if fresh.rank.tier.uses_elo() {
        println!(
            "Profile reset: {} ({} Elo), no personal best.",
            fresh.rank.tier.label(),
            fresh.rank.elo
        );
    } else {
        println!(
            "Profile reset: {} ({}%), no personal best.",
            fresh.rank.tier.label(),
            fresh.rank.progress
        );
    }
    println!("Saved to {}", store.path().display());
    Ok(())
}
