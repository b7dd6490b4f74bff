//! prizecheck-core — Deal, scoring, and rank engines.
//!
//! This crate holds the pure computations behind a prize-recall round:
//! dealing a deck into hand, prizes and draw pile, scoring the player's
//! guesses against the prizes, and moving the persistent rank. It does no
//! I/O beyond reading deck files; storage and rendering belong to the host.

pub mod catalog;
pub mod deal;
pub mod deck;
pub mod error;
pub mod model;
pub mod rank;
pub mod scoring;

pub use deal::{
    deal_seeded, deal_with_rng, prize_chance, random_seed, HAND_SIZE, MIN_DECK_SIZE, PRIZE_COUNT,
};
pub use error::CoreError;
pub use model::{Card, CardStatus, Deal, RankState, RoundResult, Tier};
pub use rank::update_rank;
pub use scoring::{score, MAX_SCORE};
