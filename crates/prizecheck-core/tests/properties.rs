//! Property tests for the deal and scoring engines.

use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;

use prizecheck_core::model::{Card, CardStatus};
use prizecheck_core::{deal_seeded, score, update_rank, RankState, Tier, HAND_SIZE, PRIZE_COUNT};

/// A deck built from per-base copy counts, e.g. [4, 1, 3] → 8 cards.
fn deck_from_counts(counts: &[usize]) -> Vec<Card> {
    let mut cards = Vec::new();
    for (base, &count) in counts.iter().enumerate() {
        for _ in 0..count {
            cards.push(Card::instance(&format!("base{base}"), cards.len()));
        }
    }
    cards
}

fn counts_strategy() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(1usize..=4, 4..=20)
        .prop_filter("enough cards to deal", |c| c.iter().sum::<usize>() >= 14)
}

proptest! {
    #[test]
    fn deal_partitions_input(counts in counts_strategy(), seed in any::<u64>()) {
        let cards = deck_from_counts(&counts);
        let deal = deal_seeded(&cards, seed).unwrap();

        prop_assert_eq!(deal.hand.len(), HAND_SIZE);
        prop_assert_eq!(deal.prizes.len(), PRIZE_COUNT);
        prop_assert_eq!(deal.deck.len(), cards.len() - HAND_SIZE - PRIZE_COUNT);

        let mut dealt: Vec<&str> = deal.all_cards().map(|c| c.instance_id.as_str()).collect();
        let mut input: Vec<&str> = cards.iter().map(|c| c.instance_id.as_str()).collect();
        dealt.sort_unstable();
        input.sort_unstable();
        prop_assert_eq!(dealt, input);
    }

    #[test]
    fn deal_is_deterministic_per_seed(counts in counts_strategy(), seed in any::<u64>()) {
        let cards = deck_from_counts(&counts);
        prop_assert_eq!(deal_seeded(&cards, seed).unwrap(), deal_seeded(&cards, seed).unwrap());
    }

    #[test]
    fn scoring_counts_are_consistent(
        counts in counts_strategy(),
        seed in any::<u64>(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..10),
    ) {
        let cards = deck_from_counts(&counts);
        let deal = deal_seeded(&cards, seed).unwrap();
        let selected: BTreeSet<String> = picks
            .iter()
            .map(|idx| cards[idx.index(cards.len())].instance_id.clone())
            .collect();

        let result = score(&cards, &deal.prizes, &selected, 30.0, 120.0);

        // Every selection is judged exactly once.
        prop_assert_eq!(
            (result.correct_guesses + result.incorrect_guesses) as usize,
            selected.len()
        );
        // Every prize is either recalled or missed.
        prop_assert_eq!(result.correct_guesses + result.missed_prizes, result.total_prizes);
        prop_assert!(result.accuracy <= 100);
        prop_assert!(result.score <= 1000);

        // Per base, correct picks never exceed the prized copies.
        let mut prized: HashMap<&str, u32> = HashMap::new();
        for card in &deal.prizes {
            *prized.entry(card.base_id.as_str()).or_default() += 1;
        }
        let mut correct: HashMap<&str, u32> = HashMap::new();
        for outcome in result.with_status(CardStatus::Correct) {
            *correct.entry(outcome.base_id.as_str()).or_default() += 1;
        }
        for (base, n) in correct {
            prop_assert!(n <= prized.get(base).copied().unwrap_or(0));
        }
    }

    #[test]
    fn selecting_the_prizes_is_always_perfect(counts in counts_strategy(), seed in any::<u64>()) {
        let cards = deck_from_counts(&counts);
        let deal = deal_seeded(&cards, seed).unwrap();
        let selected: BTreeSet<String> =
            deal.prizes.iter().map(|c| c.instance_id.clone()).collect();

        let result = score(&cards, &deal.prizes, &selected, 0.0, 120.0);
        prop_assert_eq!(result.correct_guesses, PRIZE_COUNT as u32);
        prop_assert_eq!(result.incorrect_guesses, 0);
        prop_assert_eq!(result.missed_prizes, 0);
        prop_assert_eq!(result.accuracy, 100);
        prop_assert_eq!(result.score, 1000);
    }

    #[test]
    fn rank_state_stays_in_bounds(scores in prop::collection::vec(0u32..=1000, 1..200)) {
        let mut rank = RankState::default();
        for s in scores {
            let next = update_rank(&rank, s as f64, 1000.0);
            prop_assert!(next.progress <= 100);
            prop_assert!(next.elo >= 0);
            // The top tier is terminal.
            if rank.tier == Tier::MasterBall {
                prop_assert_eq!(next.tier, Tier::MasterBall);
            }
            // Tiers move at most one step per round.
            let step = (next.tier as i32 - rank.tier as i32).abs();
            prop_assert!(step <= 1);
            rank = next;
        }
    }
}
