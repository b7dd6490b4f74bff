use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use prizecheck_core::deal::{deal_with_rng, shuffle};
use prizecheck_core::deck::parse_deck_str;
use prizecheck_core::model::Card;

const DECK_TOML: &str = r#"
[deck]
title = "Bench"

[[cards]]
id = "sv4pt5-7"
name = "Ralts"
count = 4

[[cards]]
id = "sv1-245"
name = "Gardevoir ex"
count = 2

[[cards]]
id = "sve-5"
name = "Psychic Energy"
count = 54
"#;

fn make_deck(n: usize) -> Vec<Card> {
    (0..n).map(|i| Card::instance("bench", i)).collect()
}

fn bench_deal(c: &mut Criterion) {
    let mut group = c.benchmark_group("deal");

    for size in [14usize, 60, 240] {
        let cards = make_deck(size);
        group.bench_function(format!("n={size}"), |b| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| deal_with_rng(black_box(&cards), &mut rng))
        });
    }

    group.bench_function("shuffle n=60", |b| {
        let cards = make_deck(60);
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| shuffle(black_box(&cards), &mut rng))
    });

    group.finish();
}

fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("deck");
    let path = std::path::PathBuf::from("bench.toml");

    group.bench_function("parse_and_expand", |b| {
        b.iter(|| {
            parse_deck_str(black_box(DECK_TOML), &path)
                .map(|deck| deck.expand())
                .ok()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_deal, bench_expand);
criterion_main!(benches);
