pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod uci;

pub use config::EngineConfig;
pub use crate::core::{Board, Color, Move, Piece, PieceType, Square};
pub use engine::eval::evaluate;
pub use engine::perft::{count_leaves, count_leaves_parallel, divide, PerftScheduler};
pub use engine::search::{SearchLimits, Searcher};
pub use error::{ChessError, Result};
pub use uci::Uci;
