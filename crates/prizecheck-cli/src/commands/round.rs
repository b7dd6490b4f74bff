//! The `prizecheck round` command.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use prizecheck_core::deal::deal_seeded;
use prizecheck_core::model::{Card, CardStatus, RankState, RoundResult};
use prizecheck_core::rank::RankMovement;
use prizecheck_core::scoring::{score, used_time_from_remaining};
use prizecheck_store::{load_config_from, record_round, MemoryStore, ProfileStore, RoundOutcome};

use super::{check_format, load_cards, profile_store};

pub struct RoundArgs {
    pub deck: PathBuf,
    pub seed: Option<u64>,
    pub guess: String,
    pub used_time: Option<f64>,
    pub remaining: Option<f64>,
    pub total_time: Option<f64>,
    pub profile: Option<PathBuf>,
    pub dry_run: bool,
    pub format: String,
    pub config: Option<PathBuf>,
}

#[derive(Serialize)]
struct RoundReport<'a> {
    seed: u64,
    result: &'a RoundResult,
    rank: &'a RoundOutcome,
    saved: bool,
}

pub fn execute(args: RoundArgs) -> Result<()> {
    check_format(&args.format)?;

    let config = load_config_from(args.config.as_deref())?;
    let Some(seed) = args.seed.or(config.seed) else {
        anyhow::bail!("a round needs the seed it was dealt with (--seed or `seed` in config)");
    };
    let total_time = args
        .total_time
        .unwrap_or(config.total_time_secs as f64);
    anyhow::ensure!(total_time > 0.0, "total time must be positive");
    let used_time = match args.used_time {
        Some(used) => used,
        None => used_time_from_remaining(total_time, args.remaining),
    };
    anyhow::ensure!(used_time >= 0.0, "used time cannot be negative");

    let (_, cards) = load_cards(&args.deck, &config)?;
    let dealt = deal_seeded(&cards, seed)?;

    let selected = parse_guesses(&args.guess);
    check_guesses(&selected, &cards, dealt.prizes.len())?;

    let result = score(&cards, &dealt.prizes, &selected, used_time, total_time);

    let file_store = profile_store(args.profile, &config);
    let outcome = if args.dry_run {
        let scratch = MemoryStore::with_profile(file_store.load()?);
        record_round(&scratch, &result)?
    } else {
        record_round(&file_store, &result)?
    };

    if args.format == "json" {
        let report = RoundReport {
            seed,
            result: &result,
            rank: &outcome,
            saved: !args.dry_run,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_result(&cards, &result);
    print_rank(&outcome);
    if args.dry_run {
        println!("\nDry run: profile not saved.");
    } else {
        println!("\nProfile saved to {}", file_store.path().display());
    }

    Ok(())
}

fn parse_guesses(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_guesses(selected: &BTreeSet<String>, cards: &[Card], total_prizes: usize) -> Result<()> {
    anyhow::ensure!(
        selected.len() <= total_prizes,
        "{} guesses given, at most {total_prizes} allowed",
        selected.len()
    );
    for id in selected {
        anyhow::ensure!(
            cards.iter().any(|c| &c.instance_id == id),
            "unknown card instance: {id}"
        );
    }
    if selected.len() < total_prizes {
        tracing::warn!(
            "only {} of {total_prizes} prizes guessed",
            selected.len()
        );
    }
    Ok(())
}

fn print_result(cards: &[Card], result: &RoundResult) {
    use comfy_table::{Cell, Table};

    println!(
        "Score: {}  ({}% accuracy, {:.0}s of {:.0}s used)",
        result.score, result.accuracy, result.used_time, result.total_time
    );
    println!(
        "Correct {} / {}   Incorrect {}   Missed {}",
        result.correct_guesses,
        result.total_prizes,
        result.incorrect_guesses,
        result.missed_prizes
    );

    let mut table = Table::new();
    table.set_header(vec!["Card", "Name", "Status"]);
    for (card, outcome) in cards.iter().zip(&result.statuses) {
        if outcome.status == CardStatus::Normal {
            continue;
        }
        table.add_row(vec![
            Cell::new(&card.instance_id),
            Cell::new(&card.name),
            Cell::new(outcome.status),
        ]);
    }
    println!("\n{table}");
}

fn describe(rank: &RankState) -> String {
    if rank.tier.uses_elo() {
        format!("{} ({} Elo)", rank.tier.label(), rank.elo)
    } else {
        format!("{} ({}%)", rank.tier.label(), rank.progress)
    }
}

fn print_rank(outcome: &RoundOutcome) {
    let verb = match outcome.change.movement {
        RankMovement::Promoted => "Promoted",
        RankMovement::Demoted => "Demoted",
        RankMovement::Held => "Rank",
    };
    let delta = outcome
        .change
        .progress_delta
        .or(outcome.change.elo_delta)
        .map(|d| format!(" ({d:+})"))
        .unwrap_or_default();
    println!(
        "\n{verb}: {} -> {}{delta}",
        describe(&outcome.previous),
        describe(&outcome.next)
    );
    if outcome.is_new_personal_best {
        println!("New personal best: {}", outcome.personal_best);
    } else {
        println!("Personal best: {}", outcome.personal_best);
    }
}
