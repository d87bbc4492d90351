use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use coco_chess::core::{Board, STARTPOS_FEN};
use coco_chess::engine::perft::{count_leaves, PerftScheduler};
use coco_chess::engine::search::Searcher;

struct BenchCase {
    name: &'static str,
    fen: &'static str,
    depth: u32,
    nodes: u64,
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "startpos",
        fen: STARTPOS_FEN,
        depth: 4,
        nodes: 197_281,
    },
    BenchCase {
        name: "kiwipete",
        fen: "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        depth: 3,
        nodes: 97_862,
    },
    BenchCase {
        name: "position_3",
        fen: "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
        depth: 4,
        nodes: 43_238,
    },
];

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(10);

    let threads = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let scheduler = PerftScheduler::new(threads, 2).unwrap();

    for case in CASES {
        let board = Board::from_fen(case.fen).unwrap();
        assert_eq!(count_leaves(&board, case.depth), case.nodes, "{}", case.name);
        group.throughput(Throughput::Elements(case.nodes));

        group.bench_with_input(
            BenchmarkId::new("sequential", case.name),
            &board,
            |b, board| b.iter(|| count_leaves(black_box(board), black_box(case.depth))),
        );
        group.bench_with_input(
            BenchmarkId::new(format!("parallel_{}t", threads), case.name),
            &board,
            |b, board| b.iter(|| scheduler.count_leaves(black_box(board), black_box(case.depth))),
        );
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    group.sample_size(10);

    let board = Board::startpos();
    for depth in [3, 4] {
        group.bench_with_input(BenchmarkId::new("startpos", depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut searcher = Searcher::with_hash_mb(16);
                black_box(searcher.search_iterative(black_box(&board), depth))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_perft, bench_search);
criterion_main!(benches);
