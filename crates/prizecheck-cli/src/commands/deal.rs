//! The `prizecheck deal` command.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use prizecheck_core::deal::{deal_seeded, random_seed};
use prizecheck_core::model::Card;
use prizecheck_store::load_config_from;

use super::{check_format, load_cards};

#[derive(Serialize)]
struct DealView<'a> {
    title: &'a str,
    seed: u64,
    hand: &'a [Card],
    deck: &'a [Card],
    prize_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    prizes: Option<&'a [Card]>,
}

pub fn execute(
    deck_path: PathBuf,
    seed: Option<u64>,
    reveal: bool,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    check_format(&format)?;
    let config = load_config_from(config_path.as_deref())?;
    let (deck, cards) = load_cards(&deck_path, &config)?;

    let seed = seed.or(config.seed).unwrap_or_else(random_seed);
    let dealt = deal_seeded(&cards, seed)?;

    if format == "json" {
        let view = DealView {
            title: &deck.title,
            seed,
            hand: &dealt.hand,
            deck: &dealt.deck,
            prize_count: dealt.prizes.len(),
            prizes: reveal.then_some(dealt.prizes.as_slice()),
        };
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    println!("Deck: {}", deck.title);
    println!("Seed: {seed}");

    println!("\nHand ({}):", dealt.hand.len());
    print_cards(&dealt.hand);

    println!("\nDeck ({}):", dealt.deck.len());
    print_cards(&dealt.deck);

    if reveal {
        println!("\nPrizes ({}):", dealt.prizes.len());
        print_cards(&dealt.prizes);
    } else {
        println!("\n{} prize cards set aside.", dealt.prizes.len());
    }

    Ok(())
}

fn print_cards(cards: &[Card]) {
    for card in cards {
        println!("  {:<16} {}", card.instance_id, card.name);
    }
}
