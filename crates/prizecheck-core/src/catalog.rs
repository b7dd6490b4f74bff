//! Card metadata lookup.
//!
//! The engines only need ids. Names, set labels and images come from a
//! [`CardCatalog`] the host injects; the `prizecheck-store` crate provides a
//! file-backed catalog and a read-through cache around it.

use serde::{Deserialize, Serialize};

use crate::model::Card;

/// Display metadata for one printed card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    /// Base id the card was looked up by.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl CardInfo {
    /// Text-only stand-in for a card the catalog does not know.
    pub fn placeholder(base_id: &str) -> Self {
        let (set, number) = match base_id.split_once('-') {
            Some((set, number)) => (set.to_uppercase(), number.to_string()),
            None => ("Unknown Set".to_string(), "??".to_string()),
        };
        Self {
            id: base_id.to_string(),
            name: format!("Card {}", base_id.to_uppercase()),
            set: Some(set),
            number: Some(number),
            image: None,
        }
    }
}

/// Source of card display metadata, keyed by base id.
pub trait CardCatalog: Send + Sync {
    /// Look up a card. `Ok(None)` means the catalog has no such card.
    fn lookup(&self, base_id: &str) -> anyhow::Result<Option<CardInfo>>;
}

/// Fill in display metadata for every card from `catalog`.
///
/// Fields already present on a card are kept. Cards the catalog does not
/// know get placeholder text. Returns how many cards were unknown.
pub fn enrich(cards: &mut [Card], catalog: &dyn CardCatalog) -> anyhow::Result<usize> {
    let mut unknown = 0usize;
    for card in cards.iter_mut() {
        let info = match catalog.lookup(&card.base_id)? {
            Some(info) => info,
            None => {
                unknown += 1;
                CardInfo::placeholder(&card.base_id)
            }
        };
        if card.name.is_empty() || card.name == card.base_id {
            card.name = info.name;
        }
        card.set = card.set.take().or(info.set);
        card.number = card.number.take().or(info.number);
        card.image = card.image.take().or(info.image);
    }
    if unknown > 0 {
        tracing::warn!("{unknown} card(s) not found in catalog, using placeholders");
    }
    Ok(unknown)
}
