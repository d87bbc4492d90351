//! Error types for the engine
//!
//! Runtime failures only: malformed position descriptions, unparseable or
//! illegal moves, and thread pool construction. Off-board coordinates and
//! similar programmer errors panic instead.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChessError {
    /// Position description could not be parsed
    #[error("Invalid FEN '{fen}': {reason}")]
    InvalidFen { fen: String, reason: String },

    /// Move text could not be parsed
    #[error("Invalid move notation: {0}")]
    InvalidMove(String),

    /// Move parsed but is not legal in the position
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    /// Perft worker pool could not be built
    #[error("Failed to build perft thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ChessError {
    pub(crate) fn fen(fen: &str, reason: impl Into<String>) -> Self {
        ChessError::InvalidFen {
            fen: fen.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ChessError>;
