use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vampire_match::core::tile::TileIds;
use vampire_match::core::{find_hint, find_matches, Board, Engine, EngineConfig, FillGenerator, SimpleRng};
use vampire_match::types::Pos;

fn filled_board(side: u8, seed: u32) -> Board {
    let mut board = Board::new(side, side);
    FillGenerator::new(4).fill_empty(&mut board, &mut SimpleRng::new(seed), &mut TileIds::new());
    board
}

fn bench_find_matches(c: &mut Criterion) {
    let board = filled_board(8, 12345);

    c.bench_function("find_matches_8x8", |b| {
        b.iter(|| find_matches(black_box(&board)))
    });
}

fn bench_fill(c: &mut Criterion) {
    let fill = FillGenerator::new(4);

    c.bench_function("fill_empty_8x8", |b| {
        b.iter(|| {
            let mut board = Board::new(8, 8);
            fill.fill_empty(&mut board, &mut SimpleRng::new(7), &mut TileIds::new())
        })
    });
}

fn bench_find_hint(c: &mut Criterion) {
    let board = filled_board(8, 99);

    c.bench_function("find_hint_8x8", |b| b.iter(|| find_hint(black_box(&board))));
}

fn bench_hinted_move(c: &mut Criterion) {
    let config = EngineConfig {
        width: 8,
        height: 8,
        total_moves: u32::MAX,
        target_min: u32::MAX,
        target_max: u32::MAX,
        blood_increase_per_second: 0.0,
        ..EngineConfig::default()
    };
    let mut engine = Engine::new(config).unwrap();

    c.bench_function("request_move_hinted", |b| {
        b.iter(|| {
            let (a, m) = engine.find_hint().unwrap_or((Pos::new(0, 0), Pos::new(1, 0)));
            let outcome = engine.request_move(a, m);
            engine.drain_events();
            outcome
        })
    });
}

criterion_group!(
    benches,
    bench_find_matches,
    bench_fill,
    bench_find_hint,
    bench_hinted_move
);
criterion_main!(benches);
