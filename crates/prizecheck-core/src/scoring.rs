//! Round scoring.
//!
//! Guesses are compared against the prizes per base card, so copies of the
//! same printed card are interchangeable: picking either of two identical
//! cards counts as recalling the prized one.

use std::collections::{BTreeSet, HashMap};

use crate::model::{Card, CardOutcome, CardStatus, RoundResult};

/// Weight of accuracy in the combined score.
pub const ACCURACY_WEIGHT: f64 = 0.7;

/// Weight of unused time in the combined score.
pub const SPEED_WEIGHT: f64 = 0.3;

/// Highest possible round score.
pub const MAX_SCORE: u32 = 1000;

/// Score a round.
///
/// `selected` may hold any number of ids, including ids that are not in
/// `all_cards`; those are not instances of this round and are ignored.
/// Within a base card, ties are broken by the order of `all_cards`.
pub fn score(
    all_cards: &[Card],
    prize_cards: &[Card],
    selected: &BTreeSet<String>,
    used_time: f64,
    total_time: f64,
) -> RoundResult {
    let mut prize_count_by_base: HashMap<&str, usize> = HashMap::new();
    for card in prize_cards {
        *prize_count_by_base.entry(card.base_id.as_str()).or_default() += 1;
    }

    // Group instance positions by base id, keeping first-seen order.
    let mut base_order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
    for (index, card) in all_cards.iter().enumerate() {
        let group = groups.entry(card.base_id.as_str()).or_insert_with(|| {
            base_order.push(card.base_id.as_str());
            Vec::new()
        });
        group.push(index);
    }

    let mut statuses = vec![CardStatus::Normal; all_cards.len()];
    let mut correct = 0u32;
    let mut incorrect = 0u32;
    let mut missed = 0u32;

    for base_id in base_order {
        let members = &groups[base_id];
        let prize_count = prize_count_by_base.get(base_id).copied().unwrap_or(0);
        let (picked, unpicked): (Vec<usize>, Vec<usize>) = members
            .iter()
            .partition(|&&i| selected.contains(&all_cards[i].instance_id));

        let correct_count = prize_count.min(picked.len());
        for (n, &i) in picked.iter().enumerate() {
            if n < correct_count {
                statuses[i] = CardStatus::Correct;
                correct += 1;
            } else {
                statuses[i] = CardStatus::Incorrect;
                incorrect += 1;
            }
        }

        let remaining = prize_count - correct_count;
        for &i in unpicked.iter().take(remaining) {
            statuses[i] = CardStatus::Missed;
            missed += 1;
        }
    }

    let total_prizes = prize_cards.len() as u32;
    let accuracy = accuracy_percent(correct, total_prizes);
    let used_time = used_time.max(0.0);
    let time_fraction = time_fraction(used_time, total_time);
    let score = combined_score(accuracy, time_fraction);

    tracing::debug!(
        correct,
        incorrect,
        missed,
        accuracy,
        score,
        "scored round"
    );

    RoundResult {
        statuses: all_cards
            .iter()
            .zip(statuses)
            .map(|(card, status)| CardOutcome {
                instance_id: card.instance_id.clone(),
                base_id: card.base_id.clone(),
                status,
            })
            .collect(),
        correct_guesses: correct,
        incorrect_guesses: incorrect,
        missed_prizes: missed,
        total_prizes,
        accuracy,
        used_time,
        total_time,
        time_fraction,
        score,
    }
}

/// Percentage of prizes recalled, rounded. Zero when there are no prizes.
pub fn accuracy_percent(correct: u32, total_prizes: u32) -> u32 {
    if total_prizes == 0 {
        return 0;
    }
    (correct as f64 / total_prizes as f64 * 100.0).round() as u32
}

/// Share of the time budget left unused, clamped to `[0, 1]`.
pub fn time_fraction(used_time: f64, total_time: f64) -> f64 {
    if total_time <= 0.0 {
        return 0.0;
    }
    ((total_time - used_time) / total_time).clamp(0.0, 1.0)
}

/// Blend accuracy (0–100) and time fraction (0–1) into a 0–1000 score.
pub fn combined_score(accuracy: u32, time_fraction: f64) -> u32 {
    let raw = accuracy as f64 / 100.0 * ACCURACY_WEIGHT + time_fraction * SPEED_WEIGHT;
    (raw * MAX_SCORE as f64).round().clamp(0.0, MAX_SCORE as f64) as u32
}

/// Seconds used given a countdown's remaining time. No reading means none used.
pub fn used_time_from_remaining(total_time: f64, remaining: Option<f64>) -> f64 {
    match remaining {
        Some(left) => (total_time - left).max(0.0),
        None => 0.0,
    }
}
