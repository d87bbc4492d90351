//! Move representation
//!
//! A move is a plain tagged value: source and destination squares plus the
//! promotion choice, castle side and en-passant flag. Equality is structural
//! over those fields; ordering scores live beside the move, never inside it.

use super::board::{PieceType, Square};
use std::fmt;

/// Promotion choice carried by a pawn move reaching the last rank
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub enum Promotion {
    #[default]
    None,
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// Order in which promotions are generated
    pub const CHOICES: [Promotion; 4] = [
        Promotion::Queen,
        Promotion::Rook,
        Promotion::Bishop,
        Promotion::Knight,
    ];

    #[inline]
    pub const fn piece_type(self) -> Option<PieceType> {
        match self {
            Promotion::None => None,
            Promotion::Queen => Some(PieceType::Queen),
            Promotion::Rook => Some(PieceType::Rook),
            Promotion::Bishop => Some(PieceType::Bishop),
            Promotion::Knight => Some(PieceType::Knight),
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'q' => Some(Promotion::Queen),
            'r' => Some(Promotion::Rook),
            'b' => Some(Promotion::Bishop),
            'n' => Some(Promotion::Knight),
            _ => None,
        }
    }
}

/// Castle side, if the move is a castle
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default)]
pub enum Castle {
    #[default]
    None,
    Kingside,
    Queenside,
}

/// A chess move
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Promotion,
    pub castle: Castle,
    pub en_passant: bool,
}

impl Move {
    /// Placeholder used to fill unused move list slots
    pub const NULL: Move = Move {
        from: Square::from_index(0),
        to: Square::from_index(0),
        promotion: Promotion::None,
        castle: Castle::None,
        en_passant: false,
    };

    /// Create a quiet move or plain capture
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: Promotion::None,
            castle: Castle::None,
            en_passant: false,
        }
    }

    #[inline]
    pub const fn new_promotion(from: Square, to: Square, promotion: Promotion) -> Self {
        Move {
            from,
            to,
            promotion,
            castle: Castle::None,
            en_passant: false,
        }
    }

    #[inline]
    pub const fn new_en_passant(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: Promotion::None,
            castle: Castle::None,
            en_passant: true,
        }
    }

    /// Create a castle; `from` and `to` are the king's squares
    #[inline]
    pub const fn new_castle(from: Square, to: Square, castle: Castle) -> Self {
        Move {
            from,
            to,
            promotion: Promotion::None,
            castle,
            en_passant: false,
        }
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        !matches!(self.promotion, Promotion::None)
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        !matches!(self.castle, Castle::None)
    }

    #[inline]
    pub const fn is_null(self) -> bool {
        self.from.index() == self.to.index()
    }

    /// Long coordinate notation (e.g., "e2e4", "e7e8q", "e1g1")
    pub fn to_uci(self) -> String {
        let promo = match self.promotion {
            Promotion::None => "",
            Promotion::Queen => "q",
            Promotion::Rook => "r",
            Promotion::Bishop => "b",
            Promotion::Knight => "n",
        };
        format!("{}{}{}", self.from, self.to, promo)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

/// Upper bound on pseudo-legal moves in any reachable position
pub const MAX_MOVES: usize = 256;

/// A list of moves (stack-allocated)
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub fn new() -> Self {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        debug_assert!(self.len < MAX_MOVES, "move list overflow");
        if self.len < MAX_MOVES {
            self.moves[self.len] = mv;
            self.len += 1;
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn contains(&self, mv: &Move) -> bool {
        self.as_slice().contains(mv)
    }

    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
