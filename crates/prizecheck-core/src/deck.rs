//! TOML deck list loader.
//!
//! Loads already-normalized deck definitions (one entry per printed card
//! with a copy count), expands them into per-copy [`Card`] instances, and
//! validates them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::deal::MIN_DECK_SIZE;
use crate::model::Card;

/// Deck size required by standard constructed play.
pub const STANDARD_DECK_SIZE: usize = 60;

/// A deck definition: printed cards with copy counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckList {
    pub title: String,
    /// Where the list came from (tournament page, etc.).
    #[serde(default)]
    pub source: Option<String>,
    pub entries: Vec<DeckEntry>,
}

/// One printed card and how many copies the deck runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckEntry {
    /// Base id shared by all copies (e.g. "sv4pt5-7").
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_count")]
    pub count: u32,
}

fn default_count() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
struct TomlDeckFile {
    deck: TomlDeckHeader,
    #[serde(default)]
    cards: Vec<DeckEntry>,
}

#[derive(Debug, Deserialize)]
struct TomlDeckHeader {
    title: String,
    #[serde(default)]
    source: Option<String>,
}

impl DeckList {
    /// Total number of physical cards.
    pub fn card_count(&self) -> usize {
        self.entries.iter().map(|e| e.count as usize).sum()
    }

    /// How many printed cards the deck runs at each copy count,
    /// highest count first.
    pub fn copy_distribution(&self) -> Vec<(u32, usize)> {
        let mut by_count = std::collections::BTreeMap::new();
        for entry in self.entries.iter().filter(|e| e.count > 0) {
            *by_count.entry(entry.count).or_insert(0) += 1;
        }
        by_count.into_iter().rev().collect()
    }

    /// Expand into one [`Card`] per physical copy.
    ///
    /// Instance ids are `base#k` with `k` counting across the whole deck,
    /// so every copy in the list gets a distinct id.
    pub fn expand(&self) -> Vec<Card> {
        let mut cards = Vec::with_capacity(self.card_count());
        for entry in &self.entries {
            for _ in 0..entry.count {
                let mut card = Card::instance(&entry.id, cards.len());
                if !entry.name.is_empty() {
                    card.name = entry.name.clone();
                }
                card.set = entry.set.clone();
                card.number = entry.number.clone();
                card.image = entry.image.clone();
                cards.push(card);
            }
        }
        cards
    }
}

/// Parse a single TOML deck file.
pub fn parse_deck(path: &Path) -> Result<DeckList> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read deck file: {}", path.display()))?;

    parse_deck_str(&content, path)
}

/// Parse a TOML string into a [`DeckList`].
pub fn parse_deck_str(content: &str, source_path: &Path) -> Result<DeckList> {
    let parsed: TomlDeckFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    for entry in &parsed.cards {
        anyhow::ensure!(
            !entry.id.trim().is_empty(),
            "card with empty id in {}",
            source_path.display()
        );
        anyhow::ensure!(
            !entry.id.contains(crate::model::INSTANCE_SEPARATOR),
            "card id '{}' must not contain '{}'",
            entry.id,
            crate::model::INSTANCE_SEPARATOR
        );
    }

    Ok(DeckList {
        title: parsed.deck.title,
        source: parsed.deck.source,
        entries: parsed.cards,
    })
}

/// Recursively load all `.toml` deck files from a directory.
pub fn load_deck_directory(dir: &Path) -> Result<Vec<DeckList>> {
    let mut decks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            decks.extend(load_deck_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_deck(&path) {
                Ok(deck) => decks.push(deck),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(decks)
}

/// A warning from deck validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The card id (if applicable).
    pub card_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a deck for common issues.
pub fn validate_deck(deck: &DeckList) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = std::collections::HashSet::new();
    for entry in &deck.entries {
        if !seen_ids.insert(entry.id.to_lowercase()) {
            warnings.push(ValidationWarning {
                card_id: Some(entry.id.clone()),
                message: format!("duplicate card id: {}", entry.id),
            });
        }
    }

    for entry in &deck.entries {
        if entry.count == 0 {
            warnings.push(ValidationWarning {
                card_id: Some(entry.id.clone()),
                message: "count is zero".into(),
            });
        }
        if entry.name.trim().is_empty() {
            warnings.push(ValidationWarning {
                card_id: Some(entry.id.clone()),
                message: "name is empty".into(),
            });
        }
    }

    let total = deck.card_count();
    if total < MIN_DECK_SIZE {
        warnings.push(ValidationWarning {
            card_id: None,
            message: format!("deck has {total} cards, at least {MIN_DECK_SIZE} are needed to deal"),
        });
    } else if total != STANDARD_DECK_SIZE {
        warnings.push(ValidationWarning {
            card_id: None,
            message: format!("deck has {total} cards, standard decks have {STANDARD_DECK_SIZE}"),
        });
    }

    warnings
}
