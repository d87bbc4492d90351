//! Zobrist hashing for position identification
//!
//! Every board fact (a piece on a square, black to move, each castling
//! right, the en-passant file) owns one random 64-bit key. A position's hash
//! is the XOR of the keys of the facts that hold, so a move only has to fold
//! in the facts it changes.

use super::board::{CastlingRights, Piece, Square};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::OnceLock;

const SEED: u64 = 0x12345678_9ABCDEF0;

/// Zobrist random keys
pub struct ZobristKeys {
    /// Keys for each piece on each square [color][type][square]
    pieces: [[[u64; 64]; 6]; 2],
    /// Key for black to move
    side: u64,
    /// One key per castling right, in bit order
    castling: [u64; 4],
    /// Keys for en passant file
    en_passant: [u64; 8],
}

impl ZobristKeys {
    /// Get the global Zobrist keys instance
    pub fn instance() -> &'static ZobristKeys {
        static KEYS: OnceLock<ZobristKeys> = OnceLock::new();
        KEYS.get_or_init(ZobristKeys::new)
    }

    /// Draw all keys from a fixed seed so hashes are stable across runs
    fn new() -> Self {
        let mut rng = StdRng::seed_from_u64(SEED);

        let mut pieces = [[[0u64; 64]; 6]; 2];
        for color_keys in pieces.iter_mut() {
            for type_keys in color_keys.iter_mut() {
                for key in type_keys.iter_mut() {
                    *key = rng.next_u64();
                }
            }
        }

        let side = rng.next_u64();

        let mut castling = [0u64; 4];
        for key in castling.iter_mut() {
            *key = rng.next_u64();
        }

        let mut en_passant = [0u64; 8];
        for key in en_passant.iter_mut() {
            *key = rng.next_u64();
        }

        ZobristKeys {
            pieces,
            side,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub fn piece(&self, piece: Piece, sq: Square) -> u64 {
        self.pieces[piece.color.index()][piece.piece_type.index()][sq.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> u64 {
        self.side
    }

    /// Combined key of every right held in `rights`
    #[inline]
    pub fn castling(&self, rights: CastlingRights) -> u64 {
        let mut key = 0;
        for (bit, k) in self.castling.iter().enumerate() {
            if rights.raw() & (1 << bit) != 0 {
                key ^= k;
            }
        }
        key
    }

    /// Key for an en passant target, by file
    #[inline]
    pub fn en_passant(&self, sq: Square) -> u64 {
        self.en_passant[sq.x() as usize]
    }
}
