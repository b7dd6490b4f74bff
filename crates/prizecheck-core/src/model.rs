//! Core data model types for prizecheck.
//!
//! Cards, deals, round results and the persistent rank state that the
//! engines pass between each other and hand back to the host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Separator between a base id and the copy number in an instance id.
pub const INSTANCE_SEPARATOR: char = '#';

/// One physical card in the current round.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique per physical copy for the duration of a round (e.g. "sv4pt5-7#2").
    pub instance_id: String,
    /// Shared by every copy of the same printed card (e.g. "sv4pt5-7").
    pub base_id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Set label, if known.
    #[serde(default)]
    pub set: Option<String>,
    /// Collector number, if known.
    #[serde(default)]
    pub number: Option<String>,
    /// Image reference, if known.
    #[serde(default)]
    pub image: Option<String>,
}

impl Card {
    /// Build a card from an instance id, deriving the base id from the
    /// `base#copy` convention.
    pub fn from_instance_id(instance_id: impl Into<String>) -> Self {
        let instance_id = instance_id.into();
        let base_id = base_id_of(&instance_id).to_string();
        Self {
            name: base_id.clone(),
            instance_id,
            base_id,
            set: None,
            number: None,
            image: None,
        }
    }

    /// Build the `copy`-th instance of a base card.
    pub fn instance(base_id: &str, copy: usize) -> Self {
        Self::from_instance_id(format!("{base_id}{INSTANCE_SEPARATOR}{copy}"))
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// The base id part of an instance id (everything before the first `#`).
pub fn base_id_of(instance_id: &str) -> &str {
    instance_id
        .split_once(INSTANCE_SEPARATOR)
        .map(|(base, _)| base)
        .unwrap_or(instance_id)
}

/// A shuffled deck split into hand, prizes and the remaining draw pile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub hand: Vec<Card>,
    pub prizes: Vec<Card>,
    pub deck: Vec<Card>,
}

impl Deal {
    /// Total number of cards across the three groups.
    pub fn len(&self) -> usize {
        self.hand.len() + self.prizes.len() + self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All cards in hand, prize, deck order.
    pub fn all_cards(&self) -> impl Iterator<Item = &Card> {
        self.hand.iter().chain(&self.prizes).chain(&self.deck)
    }
}

/// How a single card instance ended up after scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    /// Selected, and a prize of the same base card.
    Correct,
    /// Selected, but no prize left to match it.
    Incorrect,
    /// A prize that no selection accounted for.
    Missed,
    /// Neither selected nor a missed prize.
    Normal,
}

impl fmt::Display for CardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardStatus::Correct => write!(f, "correct"),
            CardStatus::Incorrect => write!(f, "incorrect"),
            CardStatus::Missed => write!(f, "missed"),
            CardStatus::Normal => write!(f, "normal"),
        }
    }
}

/// Status of one instance in a scored round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardOutcome {
    pub instance_id: String,
    pub base_id: String,
    pub status: CardStatus,
}

/// The scored outcome of one round. Computed once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// Per-instance status, in the order of the full card list.
    pub statuses: Vec<CardOutcome>,
    pub correct_guesses: u32,
    pub incorrect_guesses: u32,
    pub missed_prizes: u32,
    /// Size of the actual prize group.
    pub total_prizes: u32,
    /// Percentage of prizes recalled, 0–100.
    pub accuracy: u32,
    /// Seconds spent before submitting.
    pub used_time: f64,
    /// Seconds available for the round.
    pub total_time: f64,
    /// Share of the time budget left unused, 0.0–1.0.
    pub time_fraction: f64,
    /// Combined accuracy and speed score, 0–1000.
    pub score: u32,
}

impl RoundResult {
    /// Look up the status of a single instance.
    pub fn status_of(&self, instance_id: &str) -> Option<CardStatus> {
        self.statuses
            .iter()
            .find(|outcome| outcome.instance_id == instance_id)
            .map(|outcome| outcome.status)
    }

    /// Instances with the given status, in card-list order.
    pub fn with_status(&self, status: CardStatus) -> impl Iterator<Item = &CardOutcome> {
        self.statuses.iter().filter(move |o| o.status == status)
    }

    /// Every prize recalled with no wrong picks.
    pub fn is_perfect(&self) -> bool {
        self.total_prizes > 0
            && self.correct_guesses == self.total_prizes
            && self.incorrect_guesses == 0
    }
}

/// Skill bracket. Ordered lowest to highest; only the top tier is rated by Elo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    PokeBall,
    GreatBall,
    UltraBall,
    MasterBall,
}

impl Tier {
    /// All tiers, lowest first.
    pub const ORDER: [Tier; 4] = [
        Tier::PokeBall,
        Tier::GreatBall,
        Tier::UltraBall,
        Tier::MasterBall,
    ];

    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|&tier| tier == self)
            .unwrap_or_default()
    }

    /// The tier above this one, if any.
    pub fn next(self) -> Option<Tier> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    /// The tier below this one, if any.
    pub fn previous(self) -> Option<Tier> {
        self.index()
            .checked_sub(1)
            .and_then(|i| Self::ORDER.get(i).copied())
    }

    /// Whether this tier tracks an Elo rating instead of a progress meter.
    pub fn uses_elo(self) -> bool {
        self == Tier::MasterBall
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Tier::PokeBall => "Poké Ball",
            Tier::GreatBall => "Great Ball",
            Tier::UltraBall => "Ultra Ball",
            Tier::MasterBall => "Master Ball",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::PokeBall => write!(f, "pokeball"),
            Tier::GreatBall => write!(f, "greatball"),
            Tier::UltraBall => write!(f, "ultraball"),
            Tier::MasterBall => write!(f, "masterball"),
        }
    }
}

impl FromStr for Tier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase()
            .replace('é', "e");
        match normalized.as_str() {
            "pokeball" | "t0" => Ok(Tier::PokeBall),
            "greatball" | "t1" => Ok(Tier::GreatBall),
            "ultraball" | "t2" => Ok(Tier::UltraBall),
            "masterball" | "t3" => Ok(Tier::MasterBall),
            _ => Err(CoreError::UnknownTier(s.to_string())),
        }
    }
}

/// Elo rating every player starts from when entering the top tier.
pub const BASE_ELO: i64 = 1200;

/// Persistent skill rank. `progress` is live below the top tier, `elo` in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankState {
    pub tier: Tier,
    /// Meter value 0–100. Ignored in the top tier.
    #[serde(default)]
    pub progress: u32,
    /// Rating. Only meaningful in the top tier.
    #[serde(default = "default_elo")]
    pub elo: i64,
}

fn default_elo() -> i64 {
    BASE_ELO
}

impl Default for RankState {
    fn default() -> Self {
        Self {
            tier: Tier::PokeBall,
            progress: 0,
            elo: BASE_ELO,
        }
    }
}
