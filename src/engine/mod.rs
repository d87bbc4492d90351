//! Chess engine components
//!
//! This module contains the core engine functionality:
//! - Move generation, attack maps and check detection
//! - Static evaluation
//! - Alpha-beta search
//! - Transposition table
//! - Perft move-tree counting

pub mod eval;
pub mod movegen;
pub mod perft;
pub mod search;
pub mod tt;

pub use eval::{evaluate, evaluate_relative};
pub use movegen::MoveGen;
pub use perft::{count_leaves, count_leaves_parallel, divide, PerftScheduler};
pub use search::{SearchInfo, SearchLimits, SearchStats, Searcher, INFINITY, MATE_SCORE};
pub use tt::{TTEntry, TTFlag, TranspositionTable};
