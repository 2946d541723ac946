use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

use threes_ai::engine::{self, Board, Move};
use threes_ai::selfplay::Game;

fn warm() {
    engine::new();
}

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut boards = Vec::new();
    let mut game = Game::new(&mut rng);
    boards.push(game.board());
    for _ in 0..64 {
        if game.is_over() {
            game = Game::new(&mut rng);
        }
        for dir in Move::ALL {
            if game.advance(dir, &mut rng) {
                break;
            }
        }
        boards.push(game.board());
    }
    boards
}

fn bench_shift(c: &mut Criterion) {
    warm();
    for dir in Move::ALL {
        c.bench_function(&format!("shift/{}", dir), |bch| {
            let boards = corpus();
            bch.iter(|| {
                let mut acc = 0u64;
                for &bd in &boards {
                    acc ^= bd.shift(dir).0.raw();
                }
                black_box(acc)
            })
        });
    }
}

fn bench_queries(c: &mut Criterion) {
    warm();
    c.bench_function("score/total_score", |bch| {
        let boards = corpus();
        bch.iter(|| {
            let mut acc = 0u64;
            for &bd in &boards {
                acc = acc.wrapping_add(bd.total_score());
            }
            black_box(acc)
        })
    });
    c.bench_function("query/count_empty", |bch| {
        let boards = corpus();
        bch.iter(|| {
            let mut acc = 0u32;
            for &bd in &boards {
                acc ^= bd.count_empty();
            }
            black_box(acc)
        })
    });
    c.bench_function("query/max_card_index", |bch| {
        let boards = corpus();
        bch.iter(|| {
            let mut acc = 0u8;
            for &bd in &boards {
                acc ^= bd.max_card_index();
            }
            black_box(acc)
        })
    });
}

criterion_group!(engine_ops, bench_shift, bench_queries);
criterion_main!(engine_ops);
