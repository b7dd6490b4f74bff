use std::collections::BTreeSet;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use prizecheck_core::model::{Card, RankState, Tier};
use prizecheck_core::rank::update_rank;
use prizecheck_core::scoring::score;

fn make_deck() -> Vec<Card> {
    // 60 cards over 20 base cards: heavy duplication like a real list.
    let mut cards = Vec::with_capacity(60);
    for base in 0..20 {
        for _ in 0..3 {
            cards.push(Card::instance(&format!("set-{base}"), cards.len()));
        }
    }
    cards
}

fn bench_score(c: &mut Criterion) {
    let mut group = c.benchmark_group("score");
    let cards = make_deck();
    let prizes: Vec<Card> = cards[10..16].to_vec();

    group.bench_function("perfect", |b| {
        let selected: BTreeSet<String> = prizes.iter().map(|c| c.instance_id.clone()).collect();
        b.iter(|| {
            score(
                black_box(&cards),
                black_box(&prizes),
                black_box(&selected),
                black_box(40.0),
                black_box(120.0),
            )
        })
    });

    group.bench_function("all_wrong", |b| {
        let selected: BTreeSet<String> =
            cards[40..46].iter().map(|c| c.instance_id.clone()).collect();
        b.iter(|| {
            score(
                black_box(&cards),
                black_box(&prizes),
                black_box(&selected),
                black_box(120.0),
                black_box(120.0),
            )
        })
    });

    group.finish();
}

fn bench_update_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_rank");
    let progress = RankState::default();
    let master = RankState {
        tier: Tier::MasterBall,
        progress: 0,
        elo: 1400,
    };

    group.bench_function("progress_tier", |b| {
        b.iter(|| update_rank(black_box(&progress), black_box(640.0), black_box(1000.0)))
    });

    group.bench_function("elo_tier", |b| {
        b.iter(|| update_rank(black_box(&master), black_box(640.0), black_box(1000.0)))
    });

    group.finish();
}

criterion_group!(benches, bench_score, bench_update_rank);
criterion_main!(benches);
