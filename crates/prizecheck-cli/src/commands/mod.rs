pub mod deal;
pub mod init;
pub mod rank;
pub mod reset;
pub mod round;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use prizecheck_core::catalog::enrich;
use prizecheck_core::deck::{parse_deck, DeckList};
use prizecheck_core::model::Card;
use prizecheck_store::{CachedCatalog, JsonCatalog, JsonFileStore, PrizecheckConfig};

/// Load a deck file and expand it into card instances, filling in display
/// metadata from the configured catalog when there is one.
pub(crate) fn load_cards(path: &Path, config: &PrizecheckConfig) -> Result<(DeckList, Vec<Card>)> {
    let deck = parse_deck(path)?;
    let mut cards = deck.expand();

    if let Some(dir) = &config.catalog_dir {
        let mut catalog = JsonCatalog::open(dir)?;
        let sets_file = dir.join("sets.json");
        if sets_file.exists() {
            catalog = catalog.with_set_codes(&sets_file)?;
        }
        let catalog = CachedCatalog::new(catalog);
        enrich(&mut cards, &catalog)?;
    }

    Ok((deck, cards))
}

/// The profile store for an explicit path, or the configured one.
pub(crate) fn profile_store(profile: Option<PathBuf>, config: &PrizecheckConfig) -> JsonFileStore {
    JsonFileStore::new(profile.unwrap_or_else(|| config.profile_path()))
}

pub(crate) fn check_format(format: &str) -> Result<()> {
    anyhow::ensure!(
        matches!(format, "text" | "json"),
        "unknown format '{format}', expected text or json"
    );
    Ok(())
}
