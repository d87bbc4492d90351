//! Chess board representation
//!
//! The board is a 64-entry grid plus a [`PieceIndex`] listing occupied
//! squares by colour and type. Squares are addressed by `(x, y)` with `x` the
//! file (0 = a) and `y` counted from the top of the diagram, so `y = 0` is
//! rank 8 and `y = 7` is rank 1.
//!
//! Every mutation goes through [`Board::set`] or one of the state setters,
//! all of which fold their change into the running Zobrist hash. The hash is
//! therefore valid at any moment without a recompute pass.

use super::moves::{Castle, Move};
use super::piece_index::PieceIndex;
use super::zobrist::ZobristKeys;
use crate::error::{ChessError, Result};
use std::fmt;

pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Square index 0-63, `y * 8 + x` (a8 = 0, h1 = 63)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Square at file `x`, row `y`. Panics when off the board.
    #[inline]
    pub const fn new(x: u8, y: u8) -> Self {
        assert!(x < 8 && y < 8, "square coordinates off the board");
        Square(y * 8 + x)
    }

    #[inline]
    pub const fn from_index(idx: u8) -> Self {
        assert!(idx < 64, "square index off the board");
        Square(idx)
    }

    /// File, 0 = a
    #[inline]
    pub const fn x(self) -> u8 {
        self.0 & 7
    }

    /// Row from the top, 0 = rank 8
    #[inline]
    pub const fn y(self) -> u8 {
        self.0 >> 3
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Square displaced by `(dx, dy)`, or None if that leaves the board
    #[inline]
    pub const fn offset(self, dx: i8, dy: i8) -> Option<Square> {
        let x = self.x() as i8 + dx;
        let y = self.y() as i8 + dy;
        if x < 0 || x > 7 || y < 0 || y > 7 {
            None
        } else {
            Some(Square((y * 8 + x) as u8))
        }
    }

    /// Parse a square from algebraic notation (e.g., "e4")
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        let x = bytes[0].wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'0');
        if x < 8 && (1..=8).contains(&rank) {
            Some(Square::new(x, 8 - rank))
        } else {
            None
        }
    }

    pub fn to_algebraic(self) -> String {
        let file = (b'a' + self.x()) as char;
        let rank = (b'8' - self.y()) as char;
        format!("{}{}", file, rank)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_algebraic())
    }
}

/// Piece color
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Row step of a pawn push (White moves up the diagram)
    #[inline]
    pub const fn pawn_dir(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn pawn_start_y(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn promotion_y(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Row of the king and rooks at the start of the game
    #[inline]
    pub const fn back_rank_y(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// +1 for White, -1 for Black
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;
    fn not(self) -> Self::Output {
        self.opposite()
    }
}

/// Piece type
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[repr(u8)]
pub enum PieceType {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceType {
    pub const ALL: [PieceType; 6] = [
        PieceType::Pawn,
        PieceType::Knight,
        PieceType::Bishop,
        PieceType::Rook,
        PieceType::Queen,
        PieceType::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Material value in centipawns
    #[inline]
    pub const fn value(self) -> i32 {
        match self {
            PieceType::Pawn => 100,
            PieceType::Knight => 300,
            PieceType::Bishop => 300,
            PieceType::Rook => 500,
            PieceType::Queen => 900,
            PieceType::King => 20000,
        }
    }

    pub const fn to_char(self) -> char {
        match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceType::Pawn),
            'n' => Some(PieceType::Knight),
            'b' => Some(PieceType::Bishop),
            'r' => Some(PieceType::Rook),
            'q' => Some(PieceType::Queen),
            'k' => Some(PieceType::King),
            _ => None,
        }
    }
}

/// A colored piece
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Piece { piece_type, color }
    }

    /// Uppercase for white, lowercase for black
    pub fn to_char(self) -> char {
        let c = self.piece_type.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        let piece_type = PieceType::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(piece_type, color))
    }
}

/// Castling rights
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 1;
    pub const WHITE_QUEENSIDE: u8 = 2;
    pub const BLACK_KINGSIDE: u8 = 4;
    pub const BLACK_QUEENSIDE: u8 = 8;
    pub const ALL: CastlingRights = CastlingRights(0xF);

    #[inline]
    pub const fn new(rights: u8) -> Self {
        CastlingRights(rights & 0xF)
    }

    #[inline]
    pub const fn has(self, right: u8) -> bool {
        (self.0 & right) != 0
    }

    #[inline]
    pub fn remove(&mut self, right: u8) {
        self.0 &= !right;
    }

    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn kingside(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    #[inline]
    pub const fn queenside(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    #[inline]
    pub const fn both(color: Color) -> u8 {
        Self::kingside(color) | Self::queenside(color)
    }

    pub fn can_castle_kingside(self, color: Color) -> bool {
        self.has(Self::kingside(color))
    }

    pub fn can_castle_queenside(self, color: Color) -> bool {
        self.has(Self::queenside(color))
    }

    /// Right tied to the rook standing on a corner square, if any
    pub fn for_corner(sq: Square) -> u8 {
        match (sq.x(), sq.y()) {
            (0, 7) => Self::WHITE_QUEENSIDE,
            (7, 7) => Self::WHITE_KINGSIDE,
            (0, 0) => Self::BLACK_QUEENSIDE,
            (7, 0) => Self::BLACK_KINGSIDE,
            _ => 0,
        }
    }
}

/// The chess board state
#[derive(Clone)]
pub struct Board {
    squares: [Option<Piece>; 64],
    pieces: PieceIndex,
    side_to_move: Color,
    castling: CastlingRights,
    en_passant: Option<Square>,
    halfmove_clock: u16,
    fullmove_number: u16,
    hash: u64,
}

impl Board {
    /// Create a new empty board, White to move, no rights
    pub fn empty() -> Self {
        Board {
            squares: [None; 64],
            pieces: PieceIndex::new(),
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: 0,
        }
    }

    pub fn startpos() -> Self {
        let mut board = Board::empty();
        let back = [
            PieceType::Rook,
            PieceType::Knight,
            PieceType::Bishop,
            PieceType::Queen,
            PieceType::King,
            PieceType::Bishop,
            PieceType::Knight,
            PieceType::Rook,
        ];
        for (x, &pt) in back.iter().enumerate() {
            let x = x as u8;
            board.set(Square::new(x, 0), Some(Piece::new(pt, Color::Black)));
            board.set(Square::new(x, 1), Some(Piece::new(PieceType::Pawn, Color::Black)));
            board.set(Square::new(x, 6), Some(Piece::new(PieceType::Pawn, Color::White)));
            board.set(Square::new(x, 7), Some(Piece::new(pt, Color::White)));
        }
        board.set_castling(CastlingRights::ALL);
        board
    }

    /// Parse a board from FEN notation
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut board = Board::empty();
        let parts: Vec<&str> = fen.split_whitespace().collect();

        if parts.len() < 4 || parts.len() > 6 {
            return Err(ChessError::fen(fen, "expected 4 to 6 fields"));
        }

        let rows: Vec<&str> = parts[0].split('/').collect();
        if rows.len() != 8 {
            return Err(ChessError::fen(fen, "expected 8 ranks"));
        }
        for (y, row) in rows.iter().enumerate() {
            let mut x = 0u8;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(ChessError::fen(fen, format!("bad empty run '{}'", c)));
                    }
                    if u32::from(x) + skip > 8 {
                        return Err(ChessError::fen(fen, format!("rank {} too long", 8 - y)));
                    }
                    x += skip as u8;
                } else {
                    let piece = Piece::from_char(c)
                        .ok_or_else(|| ChessError::fen(fen, format!("unknown piece '{}'", c)))?;
                    if x >= 8 {
                        return Err(ChessError::fen(fen, format!("rank {} too long", 8 - y)));
                    }
                    board.set(Square::new(x, y as u8), Some(piece));
                    x += 1;
                }
            }
            if x != 8 {
                return Err(ChessError::fen(fen, format!("rank {} has {} files", 8 - y, x)));
            }
        }

        let side = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(ChessError::fen(fen, format!("bad side to move '{}'", other))),
        };
        board.set_side_to_move(side);

        let mut castling = 0u8;
        for c in parts[2].chars() {
            match c {
                'K' => castling |= CastlingRights::WHITE_KINGSIDE,
                'Q' => castling |= CastlingRights::WHITE_QUEENSIDE,
                'k' => castling |= CastlingRights::BLACK_KINGSIDE,
                'q' => castling |= CastlingRights::BLACK_QUEENSIDE,
                '-' => {}
                _ => return Err(ChessError::fen(fen, format!("unknown castling right '{}'", c))),
            }
        }
        board.set_castling(CastlingRights::new(castling));

        let ep = if parts[3] == "-" {
            None
        } else {
            Some(Square::from_algebraic(parts[3]).ok_or_else(|| {
                ChessError::fen(fen, format!("bad en passant square '{}'", parts[3]))
            })?)
        };
        board.set_en_passant(ep);

        if let Some(hm) = parts.get(4) {
            board.halfmove_clock = hm
                .parse()
                .map_err(|_| ChessError::fen(fen, format!("bad halfmove clock '{}'", hm)))?;
        }
        if let Some(fm) = parts.get(5) {
            board.fullmove_number = fm
                .parse()
                .map_err(|_| ChessError::fen(fen, format!("bad fullmove number '{}'", fm)))?;
        }

        Ok(board)
    }

    /// Convert the board to FEN notation
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for y in 0..8 {
            let mut empty = 0;
            for x in 0..8 {
                match self.get(Square::new(x, y)) {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if y < 7 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling.raw() == 0 {
            fen.push('-');
        } else {
            for (right, c) in [
                (CastlingRights::WHITE_KINGSIDE, 'K'),
                (CastlingRights::WHITE_QUEENSIDE, 'Q'),
                (CastlingRights::BLACK_KINGSIDE, 'k'),
                (CastlingRights::BLACK_QUEENSIDE, 'q'),
            ] {
                if self.castling.has(right) {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.index()]
    }

    /// Place `piece` on `sq` (or clear it with None), keeping the piece
    /// index and hash in step with the grid
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) {
        let keys = ZobristKeys::instance();
        if let Some(old) = self.squares[sq.index()] {
            self.hash ^= keys.piece(old, sq);
            self.pieces.remove(old.color, old.piece_type, sq);
        }
        if let Some(new) = piece {
            self.hash ^= keys.piece(new, sq);
            self.pieces.insert(new.color, new.piece_type, sq);
        }
        self.squares[sq.index()] = piece;
    }

    /// Squares holding `color`'s pieces of type `pt`
    #[inline]
    pub fn pieces(&self, color: Color, pt: PieceType) -> &[Square] {
        self.pieces.squares(color, pt)
    }

    #[inline]
    pub fn piece_index(&self) -> &PieceIndex {
        &self.pieces
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Zobrist hash of the position
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        if self.side_to_move != color {
            self.side_to_move = color;
            self.hash ^= ZobristKeys::instance().side_to_move();
        }
    }

    pub fn set_castling(&mut self, rights: CastlingRights) {
        let keys = ZobristKeys::instance();
        self.hash ^= keys.castling(self.castling) ^ keys.castling(rights);
        self.castling = rights;
    }

    pub fn set_en_passant(&mut self, sq: Option<Square>) {
        let keys = ZobristKeys::instance();
        if let Some(old) = self.en_passant {
            self.hash ^= keys.en_passant(old);
        }
        if let Some(new) = sq {
            self.hash ^= keys.en_passant(new);
        }
        self.en_passant = sq;
    }

    /// Recompute the hash from scratch
    pub fn compute_hash(&self) -> u64 {
        let keys = ZobristKeys::instance();
        let mut hash = 0u64;

        for idx in 0..64u8 {
            let sq = Square::from_index(idx);
            if let Some(piece) = self.get(sq) {
                hash ^= keys.piece(piece, sq);
            }
        }
        if self.side_to_move == Color::Black {
            hash ^= keys.side_to_move();
        }
        hash ^= keys.castling(self.castling);
        if let Some(ep) = self.en_passant {
            hash ^= keys.en_passant(ep);
        }
        hash
    }

    /// First king of `color` in the piece index
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, PieceType::King).first().copied()
    }

    /// Whether `color`'s king is attacked. A board without that king is never in check.
    pub fn is_in_check(&self, color: Color) -> bool {
        crate::engine::movegen::MoveGen::is_in_check(self, color)
    }

    /// Play one ply. The move must come from this position's generator;
    /// moving from an empty square panics.
    pub fn apply_move(&mut self, mv: Move) {
        let keys = ZobristKeys::instance();
        let Some(piece) = self.get(mv.from) else {
            panic!("apply_move {} from an empty square", mv);
        };
        let us = piece.color;

        if let Some(ep) = self.en_passant.take() {
            self.hash ^= keys.en_passant(ep);
        }

        let mut capture = false;
        match mv.castle {
            Castle::Kingside | Castle::Queenside => {
                let y = mv.from.y();
                let (king_x, rook_from, rook_to) = if mv.castle == Castle::Kingside {
                    (6, 7, 5)
                } else {
                    (2, 0, 3)
                };
                let rook = self.get(Square::new(rook_from, y));
                self.set(mv.from, None);
                self.set(Square::new(king_x, y), Some(piece));
                self.set(Square::new(rook_from, y), None);
                self.set(Square::new(rook_to, y), rook);
            }
            Castle::None => {
                capture = self.get(mv.to).is_some();
                let placed = match mv.promotion.piece_type() {
                    Some(pt) => Piece::new(pt, us),
                    None => piece,
                };
                self.set(mv.from, None);
                self.set(mv.to, Some(placed));

                if mv.en_passant {
                    self.set(Square::new(mv.to.x(), mv.from.y()), None);
                    capture = true;
                }

                if piece.piece_type == PieceType::Pawn && mv.from.y().abs_diff(mv.to.y()) == 2 {
                    let ep = Square::new(mv.to.x(), (mv.from.y() + mv.to.y()) / 2);
                    self.en_passant = Some(ep);
                    self.hash ^= keys.en_passant(ep);
                }
            }
        }

        self.side_to_move = us.opposite();
        self.hash ^= keys.side_to_move();

        if piece.piece_type == PieceType::Pawn || capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }

        let mut rights = self.castling;
        match piece.piece_type {
            PieceType::King => rights.remove(CastlingRights::both(us)),
            PieceType::Rook => {
                rights.remove(CastlingRights::for_corner(mv.from) & CastlingRights::both(us))
            }
            _ => {}
        }
        if capture {
            rights.remove(CastlingRights::for_corner(mv.to) & CastlingRights::both(us.opposite()));
        }
        if rights != self.castling {
            self.set_castling(rights);
        }
    }

    /// Copy of the board with `mv` played
    pub fn with_move(&self, mv: Move) -> Board {
        let mut next = self.clone();
        next.apply_move(mv);
        next
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.squares == other.squares
            && self.side_to_move == other.side_to_move
            && self.castling == other.castling
            && self.en_passant == other.en_passant
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::startpos()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        for y in 0..8 {
            write!(f, "  {} ", 8 - y)?;
            for x in 0..8 {
                match self.get(Square::new(x, y)) {
                    Some(piece) => write!(f, "{} ", piece.to_char())?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        writeln!(f, "    a b c d e f g h")?;
        writeln!(f)?;
        writeln!(f, "  FEN: {}", self.to_fen())?;
        writeln!(f, "  Key: {:016X}", self.hash)?;
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}
