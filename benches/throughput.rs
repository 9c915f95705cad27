use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use rankboard::{
    engine::leaderboard::Leaderboard,
    store::memory::{MemoryRanked, MemoryRecords},
};

const COUNTRIES: [&str; 4] = ["India", "USA", "Pakistan", "Japan"];

fn engine() -> Leaderboard<MemoryRecords, MemoryRanked> {
    Leaderboard::new(MemoryRecords::new(), MemoryRanked::new())
}

fn populate(board: &mut Leaderboard<MemoryRecords, MemoryRanked>, n: u64) {
    for i in 0..n {
        let email = format!("user{i}@x");
        board
            .upsert_user(
                &format!("User{i}"),
                COUNTRIES[(i % 4) as usize],
                &email,
            )
            .expect("add");
        board.upsert_score(&email, (i % 997) as f64).expect("score");
    }
}

fn bench_upserts(c: &mut Criterion) {
    c.bench_function("engine_add_10k_users", |b| {
        b.iter(|| {
            let mut board = engine();
            populate(&mut board, 10_000);
        });
    });
}

fn bench_rescore(c: &mut Criterion) {
    c.bench_function("engine_rescore_10k", |b| {
        b.iter(|| {
            let mut board = engine();
            populate(&mut board, 10_000);
            for i in 0..10_000u64 {
                board
                    .upsert_score(&format!("user{i}@x"), (i % 31) as f64 + 0.5)
                    .expect("rescore");
            }
        });
    });
}

fn bench_top_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_top");
    let mut board = engine();
    populate(&mut board, 20_000);

    for k in [10u64, 100, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| {
                let _ = board.get_top(k, None);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_upserts, bench_rescore, bench_top_k);
criterion_main!(benches);
