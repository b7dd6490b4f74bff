//! The `prizecheck validate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use prizecheck_core::deal::prize_chance;
use prizecheck_core::deck::{load_deck_directory, parse_deck, validate_deck, DeckList};

pub fn execute(deck_path: PathBuf, details: bool) -> Result<()> {
    let decks = if deck_path.is_dir() {
        load_deck_directory(&deck_path)?
    } else {
        vec![parse_deck(&deck_path)?]
    };

    let mut warning_count = 0;
    for deck in &decks {
        let size = deck.card_count();
        println!(
            "Deck: {} ({size} cards, {} unique)",
            deck.title,
            deck.entries.len()
        );
        println!("  Copies: {}", describe_copies(deck));

        for warning in validate_deck(deck) {
            match &warning.card_id {
                Some(id) => println!("  [{id}] WARNING: {}", warning.message),
                None => println!("  WARNING: {}", warning.message),
            }
            warning_count += 1;
        }

        if details {
            println!("\n{}\n", prize_table(deck, size));
        }
    }

    if warning_count == 0 {
        println!("All decks valid.");
    } else {
        println!("\n{warning_count} warning(s) found.");
    }
    Ok(())
}

/// e.g. "4x (6 cards), 3x (3 cards), 1x (1 card)"
fn describe_copies(deck: &DeckList) -> String {
    let parts: Vec<String> = deck
        .copy_distribution()
        .into_iter()
        .map(|(copies, entries)| {
            let noun = if entries == 1 { "card" } else { "cards" };
            format!("{copies}x ({entries} {noun})")
        })
        .collect();
    if parts.is_empty() {
        "none".to_string()
    } else {
        parts.join(", ")
    }
}

/// Per-card odds of at least one copy being prized.
fn prize_table(deck: &DeckList, size: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Card", "Name", "Copies", "Prized"]);
    for entry in &deck.entries {
        let chance = prize_chance(entry.count as usize, size);
        table.add_row(vec![
            Cell::new(&entry.id),
            Cell::new(&entry.name),
            Cell::new(entry.count),
            Cell::new(format!("{:.1}%", chance * 100.0)),
        ]);
    }
    table
}
