//! Perft: exhaustive leaf counts of the legal move tree
//!
//! The parallel counter forks one task per legal move while the remaining
//! depth is above the split depth, and counts smaller subtrees sequentially.
//! Each task owns its own copy of the board, so tasks share nothing but the
//! pool's queue. Both paths must always agree exactly.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::time::Instant;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::core::{Board, Move};
use crate::engine::movegen::MoveGen;
use crate::error::Result;

/// Remaining depth at or below which subtrees are counted sequentially
pub const DEFAULT_SPLIT_DEPTH: u32 = 2;

/// Count leaves sequentially
pub fn count_leaves(board: &Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = MoveGen::generate_legal_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|&mv| count_leaves(&board.with_move(mv), depth - 1))
        .sum()
}

/// Count leaves on rayon's global pool
pub fn count_leaves_parallel(board: &Board, depth: u32) -> u64 {
    fork_count(board, depth, DEFAULT_SPLIT_DEPTH)
}

/// Leaf count below each legal root move, in generation order
pub fn divide(board: &Board, depth: u32) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    MoveGen::generate_legal_moves(board)
        .iter()
        .map(|&mv| (mv, count_leaves(&board.with_move(mv), depth - 1)))
        .collect()
}

fn fork_count(board: &Board, depth: u32, split_depth: u32) -> u64 {
    if depth <= split_depth.max(1) {
        return count_leaves(board, depth);
    }
    MoveGen::generate_legal_moves(board)
        .as_slice()
        .par_iter()
        .map(|&mv| fork_count(&board.with_move(mv), depth - 1, split_depth))
        .sum()
}

/// Parallel perft on a bounded worker pool
pub struct PerftScheduler {
    pool: ThreadPool,
    split_depth: u32,
}

impl PerftScheduler {
    pub fn new(threads: usize, split_depth: u32) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("perft-{}", i))
            .build()?;
        debug!(threads = pool.current_num_threads(), split_depth, "perft pool ready");
        Ok(PerftScheduler { pool, split_depth })
    }

    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        Self::new(config.threads, config.perft_split_depth)
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn split_depth(&self) -> u32 {
        self.split_depth
    }

    pub fn count_leaves(&self, board: &Board, depth: u32) -> u64 {
        let start = Instant::now();
        let split_depth = self.split_depth;
        let nodes = self.pool.install(|| fork_count(board, depth, split_depth));
        info!(
            depth,
            nodes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "perft complete"
        );
        nodes
    }

    /// Like [`divide`], with root moves counted in parallel
    pub fn divide(&self, board: &Board, depth: u32) -> Vec<(Move, u64)> {
        if depth == 0 {
            return Vec::new();
        }
        let split_depth = self.split_depth;
        let moves = MoveGen::generate_legal_moves(board);
        let counts: Vec<(Move, u64)> = self.pool.install(|| {
            moves
                .as_slice()
                .par_iter()
                .map(|&mv| (mv, fork_count(&board.with_move(mv), depth - 1, split_depth)))
                .collect()
        });
        for (mv, n) in &counts {
            debug!(%mv, nodes = *n, "divide");
        }
        counts
    }
}
