use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cricket_core::engine::win_predictor::monte_carlo;
use cricket_core::{AutoDriver, EngineConfig, Match, Player, TeamSetup};

fn side(prefix: &str) -> TeamSetup {
    let xi = (0..11u8)
        .map(|i| Player::new(format!("{prefix}{i}"), format!("{prefix} {i}"), 80 - 5 * i, 20 + 6 * i))
        .collect();
    TeamSetup::new(prefix, prefix, xi, Vec::new()).expect("valid bench team")
}

fn bench_full_match(c: &mut Criterion) {
    let mut g = c.benchmark_group("cricket_full_match");
    for (label, config) in [("t10", EngineConfig::t10()), ("t20", EngineConfig::t20()), ("odi", EngineConfig::odi())] {
        let m = Match::new(side("h"), side("a"), config.rules.overs).expect("valid bench match");
        let driver = AutoDriver::from_config(&config, None);
        g.bench_with_input(BenchmarkId::new("play_match", label), &m, |b, m| {
            let mut seed = 0u64;
            b.iter(|| {
                seed += 1;
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                black_box(driver.play_match(black_box(m), &mut rng).expect("match completes"))
            })
        });
    }
    g.finish();
}

fn bench_monte_carlo(c: &mut Criterion) {
    let m = Match::new(side("h"), side("a"), 20).expect("valid bench match");
    let driver = AutoDriver::default();
    c.bench_function("monte_carlo_t20_64", |b| {
        b.iter(|| black_box(monte_carlo(black_box(&m), &driver, 64, 9).expect("estimate")))
    });
}

criterion_group!(benches, bench_full_match, bench_monte_carlo);
criterion_main!(benches);
