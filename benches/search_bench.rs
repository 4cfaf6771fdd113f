use chess_bot::agent::ai::{evaluate, Evaluator};
use chess_bot::clock::ManualClock;
use chess_bot::game_repr::Position;
use chess_bot::{Engine, SearchConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const MIDDLEGAME: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";

fn bench_search_depth_4(c: &mut Criterion) {
    let config = SearchConfig::default()
        .with_tt_size_log2(18)
        .with_max_depth(4);
    let clock = ManualClock::new(600_000);

    c.bench_function("search depth 4", |b| {
        b.iter(|| {
            // Fresh tables every iteration so runs are comparable
            let mut engine = Engine::new(config.clone());
            let mut pos = Position::from_fen(MIDDLEGAME).unwrap();
            black_box(engine.think(&mut pos, &clock))
        })
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let pos = Position::from_fen(MIDDLEGAME).unwrap();
    c.bench_function("evaluate", |b| b.iter(|| black_box(evaluate(black_box(&pos)))));

    let mut evaluator = Evaluator::new(14);
    c.bench_function("evaluate cached pawns", |b| {
        b.iter(|| black_box(evaluator.evaluate(black_box(&pos))))
    });
}

criterion_group!(benches, bench_evaluate, bench_search_depth_4);
criterion_main!(benches);
