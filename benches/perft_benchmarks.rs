//! Benchmarks for move generation and perft throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use bitperft::board::{init_attack_tables, AttackTables, MoveList, Position, Slider};
use bitperft::perft::{perft, perft_parallel};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

fn bench_perft(c: &mut Criterion) {
    init_attack_tables().expect("attack tables");
    let mut group = c.benchmark_group("perft");

    let startpos = Position::startpos();
    for depth in 1..=4 {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| perft(&startpos, black_box(depth)))
        });
    }

    let kiwipete = Position::from_fen(KIWIPETE).unwrap();
    for depth in 1..=3 {
        group.bench_with_input(BenchmarkId::new("kiwipete", depth), &depth, |b, &depth| {
            b.iter(|| perft(&kiwipete, black_box(depth)))
        });
    }

    for threads in [2, 4] {
        group.bench_with_input(
            BenchmarkId::new("kiwipete-parallel-d3", threads),
            &threads,
            |b, &threads| b.iter(|| perft_parallel(&kiwipete, 3, black_box(threads))),
        );
    }

    group.finish();
}

fn bench_movegen(c: &mut Criterion) {
    init_attack_tables().expect("attack tables");
    let mut group = c.benchmark_group("movegen");
    let mut moves = MoveList::new();

    let startpos = Position::startpos();
    group.bench_function("startpos", |b| {
        b.iter(|| {
            startpos.generate_moves(&mut moves);
            black_box(moves.len())
        })
    });

    let middlegame =
        Position::from_fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4")
            .unwrap();
    group.bench_function("middlegame", |b| {
        b.iter(|| {
            middlegame.generate_moves(&mut moves);
            black_box(moves.len())
        })
    });

    let kiwipete = Position::from_fen(KIWIPETE).unwrap();
    group.bench_function("kiwipete-legal", |b| {
        b.iter(|| black_box(kiwipete.legal_moves()))
    });

    group.finish();
}

fn bench_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("tables");
    group.sample_size(10);
    group.bench_function("build", |b| {
        b.iter(|| black_box(AttackTables::build().map(|t| t.magic(Slider::Rook).len())))
    });
    group.finish();
}

criterion_group!(benches, bench_perft, bench_movegen, bench_tables);
criterion_main!(benches);
