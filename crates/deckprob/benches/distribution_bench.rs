use criterion::{black_box, criterion_group, criterion_main, Criterion};

use deckprob::{exact_distribution, representatives, simulate, MonteCarloConfig, Population};

fn bench_enumerate_four_categories(c: &mut Criterion) {
    c.bench_function("enumerate_20_20_10_10_draw_7", |b| {
        b.iter(|| representatives(black_box(&[20, 20, 10, 10]), black_box(7)))
    });
}

fn bench_exact_sixty_card_deck(c: &mut Criterion) {
    let pop = Population::new(60, vec![24, 12, 8, 4]).unwrap();
    c.bench_function("exact_60_draw_7", |b| {
        b.iter(|| exact_distribution(black_box(&pop), black_box(7)).unwrap())
    });
}

fn bench_simulate_sixty_card_deck(c: &mut Criterion) {
    let pop = Population::new(60, vec![24, 12, 8, 4]).unwrap();
    let cfg = MonteCarloConfig::new(10_000).with_seed(1);
    c.bench_function("simulate_60_draw_7_10k", |b| {
        b.iter(|| simulate(black_box(&pop), black_box(7), &cfg).unwrap())
    });
}

criterion_group!(
    benches,
    bench_enumerate_four_categories,
    bench_exact_sixty_card_deck,
    bench_simulate_sixty_card_deck
);
criterion_main!(benches);
