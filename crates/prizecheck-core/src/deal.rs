//! Shuffle and deal.
//!
//! A deal is an unbiased Fisher–Yates permutation of the full card list,
//! sliced hand first: the first [`HAND_SIZE`] cards form the hand, the next
//! [`PRIZE_COUNT`] the prizes, and the rest stays in the deck.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::CoreError;
use crate::model::{Card, Deal};

/// Cards in the opening hand.
pub const HAND_SIZE: usize = 8;

/// Cards set aside as prizes.
pub const PRIZE_COUNT: usize = 6;

/// Smallest card list that fills both fixed slices.
pub const MIN_DECK_SIZE: usize = HAND_SIZE + PRIZE_COUNT;

/// Return a uniformly shuffled copy of `cards`.
///
/// Walks from the last index down to 1, swapping each position with a
/// uniformly chosen index in `[0, i]`.
pub fn shuffle<T: Clone, R: Rng + ?Sized>(cards: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = cards.to_vec();
    for i in (1..shuffled.len()).rev() {
        let j = rng.gen_range(0..=i);
        shuffled.swap(i, j);
    }
    shuffled
}

/// Shuffle `cards` with `rng` and split them into hand, prizes and deck.
pub fn deal_with_rng<R: Rng + ?Sized>(cards: &[Card], rng: &mut R) -> Result<Deal, CoreError> {
    if cards.len() < MIN_DECK_SIZE {
        return Err(CoreError::InsufficientCards {
            required: MIN_DECK_SIZE,
            actual: cards.len(),
        });
    }

    let mut shuffled = shuffle(cards, rng);
    let deck = shuffled.split_off(MIN_DECK_SIZE);
    let prizes = shuffled.split_off(HAND_SIZE);
    let hand = shuffled;

    tracing::debug!(
        hand = hand.len(),
        prizes = prizes.len(),
        deck = deck.len(),
        "dealt cards"
    );

    Ok(Deal { hand, prizes, deck })
}

/// Deal with a generator seeded from `seed`. Same seed, same deal.
pub fn deal_seeded(cards: &[Card], seed: u64) -> Result<Deal, CoreError> {
    deal_with_rng(cards, &mut StdRng::seed_from_u64(seed))
}

/// Draw a fresh seed for [`deal_seeded`]. Show it to the player so the
/// round can be replayed and scored later.
pub fn random_seed() -> u64 {
    StdRng::from_entropy().gen()
}

/// Chance that at least one of `copies` cards in a `deck_size` list ends up
/// among the prizes.
pub fn prize_chance(copies: usize, deck_size: usize) -> f64 {
    if deck_size < PRIZE_COUNT || copies == 0 {
        return 0.0;
    }
    let copies = copies.min(deck_size);
    // P(no copy prized) = C(n - k, 6) / C(n, 6), expanded term by term.
    let none_prized: f64 = (0..PRIZE_COUNT)
        .map(|i| {
            let remaining = (deck_size - i) as f64;
            let others = deck_size.saturating_sub(copies + i) as f64;
            others / remaining
        })
        .product();
    1.0 - none_prized
}
