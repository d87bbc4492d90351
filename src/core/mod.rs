//! Core chess types and representations
//!
//! This module contains the fundamental building blocks of the chess engine:
//! - Square sets for attack maps
//! - Board state, with its piece index and running hash
//! - Move values and move lists
//! - Zobrist keys
//! - Text notation adapters

pub mod bitboard;
pub mod board;
pub mod moves;
pub mod notation;
pub mod piece_index;
pub mod zobrist;

pub use bitboard::{Bitboard, BitboardIter};
pub use board::{Board, CastlingRights, Color, Piece, PieceType, Square, STARTPOS_FEN};
pub use moves::{Castle, Move, MoveList, Promotion};
pub use notation::play_san_line;
pub use piece_index::PieceIndex;
pub use zobrist::ZobristKeys;
