//! Move generation
//!
//! Pseudo-legal moves are generated per piece: sliders walk each ray until
//! they hit a piece, steppers test fixed offsets from precomputed tables, and
//! pawns handle pushes, captures, en passant and promotion. A move is legal
//! when the mover's king is not attacked after playing it on a copy of the
//! board. Attack maps are rebuilt on every query.

use crate::core::{
    Bitboard, Board, Castle, CastlingRights, Color, Move, MoveList, Piece, PieceType, Promotion,
    Square,
};
use std::sync::OnceLock;

const ROOK_DIRS: [(i8, i8); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];
const BISHOP_DIRS: [(i8, i8); 4] = [(-1, -1), (1, -1), (-1, 1), (1, 1)];
const QUEEN_DIRS: [(i8, i8); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
];
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING_OFFSETS: [(i8, i8); 8] = QUEEN_DIRS;

/// Precomputed attack tables for the stepping pieces
pub struct MoveGen {
    knight_attacks: [Bitboard; 64],
    king_attacks: [Bitboard; 64],
    /// Squares attacked by a pawn [color][square]
    pawn_attacks: [[Bitboard; 64]; 2],
}

static MOVEGEN: OnceLock<MoveGen> = OnceLock::new();

impl MoveGen {
    /// Get the global move generator instance
    pub fn instance() -> &'static MoveGen {
        MOVEGEN.get_or_init(MoveGen::init)
    }

    fn init() -> Self {
        let mut mg = MoveGen {
            knight_attacks: [Bitboard::EMPTY; 64],
            king_attacks: [Bitboard::EMPTY; 64],
            pawn_attacks: [[Bitboard::EMPTY; 64]; 2],
        };

        for idx in 0..64u8 {
            let sq = Square::from_index(idx);
            mg.knight_attacks[sq.index()] = Self::step_table(sq, &KNIGHT_OFFSETS);
            mg.king_attacks[sq.index()] = Self::step_table(sq, &KING_OFFSETS);
            for color in [Color::White, Color::Black] {
                let dir = color.pawn_dir();
                mg.pawn_attacks[color.index()][sq.index()] =
                    Self::step_table(sq, &[(-1, dir), (1, dir)]);
            }
        }

        mg
    }

    fn step_table(sq: Square, offsets: &[(i8, i8)]) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for &(dx, dy) in offsets {
            if let Some(to) = sq.offset(dx, dy) {
                bb.set(to);
            }
        }
        bb
    }

    #[inline]
    pub fn knight_attacks(sq: Square) -> Bitboard {
        Self::instance().knight_attacks[sq.index()]
    }

    #[inline]
    pub fn king_attacks(sq: Square) -> Bitboard {
        Self::instance().king_attacks[sq.index()]
    }

    /// Squares a `color` pawn standing on `sq` attacks
    #[inline]
    pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
        Self::instance().pawn_attacks[color.index()][sq.index()]
    }

    /// Squares reached by walking each ray from `sq`, blocker included
    pub fn slider_attacks(board: &Board, sq: Square, dirs: &[(i8, i8)]) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for &(dx, dy) in dirs {
            let mut cur = sq;
            while let Some(next) = cur.offset(dx, dy) {
                bb.set(next);
                if board.get(next).is_some() {
                    break;
                }
                cur = next;
            }
        }
        bb
    }

    /// Squares attacked by the piece on `sq`
    pub fn piece_attacks(board: &Board, sq: Square, piece: Piece) -> Bitboard {
        match piece.piece_type {
            PieceType::Pawn => Self::pawn_attacks(sq, piece.color),
            PieceType::Knight => Self::knight_attacks(sq),
            PieceType::Bishop => Self::slider_attacks(board, sq, &BISHOP_DIRS),
            PieceType::Rook => Self::slider_attacks(board, sq, &ROOK_DIRS),
            PieceType::Queen => Self::slider_attacks(board, sq, &QUEEN_DIRS),
            PieceType::King => Self::king_attacks(sq),
        }
    }

    /// Every square attacked by at least one piece of `color`
    pub fn attack_map(board: &Board, color: Color) -> Bitboard {
        let mut map = Bitboard::EMPTY;
        for pt in PieceType::ALL {
            let piece = Piece::new(pt, color);
            for &sq in board.pieces(color, pt) {
                map |= Self::piece_attacks(board, sq, piece);
            }
        }
        map
    }

    /// Squares attacked by `color`'s pawns only
    pub fn pawn_attack_map(board: &Board, color: Color) -> Bitboard {
        let mut map = Bitboard::EMPTY;
        for &sq in board.pieces(color, PieceType::Pawn) {
            map |= Self::pawn_attacks(sq, color);
        }
        map
    }

    #[inline]
    pub fn is_square_attacked(board: &Board, sq: Square, by_color: Color) -> bool {
        Self::attack_map(board, by_color).contains(sq)
    }

    /// Whether `color`'s king stands on a square the opponent attacks
    pub fn is_in_check(board: &Board, color: Color) -> bool {
        match board.king_square(color) {
            Some(king) => Self::is_square_attacked(board, king, color.opposite()),
            None => false,
        }
    }

    /// Generate all pseudo-legal moves for the side to move
    pub fn generate_pseudo_legal_moves(board: &Board) -> MoveList {
        let mut moves = MoveList::new();
        let us = board.side_to_move();
        for pt in PieceType::ALL {
            for &sq in board.pieces(us, pt) {
                Self::generate_piece_moves(board, sq, Piece::new(pt, us), &mut moves);
            }
        }
        moves
    }

    /// Generate all legal moves for the side to move
    pub fn generate_legal_moves(board: &Board) -> MoveList {
        let mut legal = MoveList::new();
        for &mv in Self::generate_pseudo_legal_moves(board).iter() {
            if Self::is_legal(board, mv) {
                legal.push(mv);
            }
        }
        legal
    }

    /// Whether a pseudo-legal move keeps the mover's king safe
    #[inline]
    pub fn is_legal(board: &Board, mv: Move) -> bool {
        let us = board.side_to_move();
        !Self::is_in_check(&board.with_move(mv), us)
    }

    /// Pseudo-legal moves of the piece on `sq`, appended to `moves`
    pub fn piece_moves(board: &Board, sq: Square, moves: &mut MoveList) {
        if let Some(piece) = board.get(sq) {
            Self::generate_piece_moves(board, sq, piece, moves);
        }
    }

    fn generate_piece_moves(board: &Board, sq: Square, piece: Piece, moves: &mut MoveList) {
        match piece.piece_type {
            PieceType::Pawn => Self::generate_pawn_moves(board, sq, piece.color, moves),
            PieceType::Knight => {
                Self::generate_step_moves(board, sq, piece.color, &KNIGHT_OFFSETS, moves)
            }
            PieceType::Bishop => {
                Self::generate_slider_moves(board, sq, piece.color, &BISHOP_DIRS, moves)
            }
            PieceType::Rook => {
                Self::generate_slider_moves(board, sq, piece.color, &ROOK_DIRS, moves)
            }
            PieceType::Queen => {
                Self::generate_slider_moves(board, sq, piece.color, &QUEEN_DIRS, moves)
            }
            PieceType::King => {
                Self::generate_step_moves(board, sq, piece.color, &KING_OFFSETS, moves);
                Self::generate_castling_moves(board, sq, piece.color, moves);
            }
        }
    }

    fn generate_slider_moves(
        board: &Board,
        from: Square,
        us: Color,
        dirs: &[(i8, i8)],
        moves: &mut MoveList,
    ) {
        for &(dx, dy) in dirs {
            let mut cur = from;
            while let Some(to) = cur.offset(dx, dy) {
                match board.get(to) {
                    None => moves.push(Move::new(from, to)),
                    Some(p) => {
                        if p.color != us {
                            moves.push(Move::new(from, to));
                        }
                        break;
                    }
                }
                cur = to;
            }
        }
    }

    fn generate_step_moves(
        board: &Board,
        from: Square,
        us: Color,
        offsets: &[(i8, i8)],
        moves: &mut MoveList,
    ) {
        for &(dx, dy) in offsets {
            if let Some(to) = from.offset(dx, dy) {
                match board.get(to) {
                    Some(p) if p.color == us => {}
                    _ => moves.push(Move::new(from, to)),
                }
            }
        }
    }

    fn push_pawn_move(from: Square, to: Square, us: Color, moves: &mut MoveList) {
        if to.y() == us.promotion_y() {
            for promo in Promotion::CHOICES {
                moves.push(Move::new_promotion(from, to, promo));
            }
        } else {
            moves.push(Move::new(from, to));
        }
    }

    fn generate_pawn_moves(board: &Board, from: Square, us: Color, moves: &mut MoveList) {
        let dir = us.pawn_dir();

        if let Some(one) = from.offset(0, dir) {
            if board.get(one).is_none() {
                Self::push_pawn_move(from, one, us, moves);
                if from.y() == us.pawn_start_y() {
                    if let Some(two) = from.offset(0, 2 * dir) {
                        if board.get(two).is_none() {
                            moves.push(Move::new(from, two));
                        }
                    }
                }
            }
        }

        for dx in [-1, 1] {
            let Some(to) = from.offset(dx, dir) else {
                continue;
            };
            match board.get(to) {
                Some(p) if p.color != us => Self::push_pawn_move(from, to, us, moves),
                Some(_) => {}
                None => {
                    if board.en_passant() == Some(to) {
                        moves.push(Move::new_en_passant(from, to));
                    }
                }
            }
        }
    }

    fn generate_castling_moves(board: &Board, from: Square, us: Color, moves: &mut MoveList) {
        let y = us.back_rank_y();
        if from != Square::new(4, y) {
            return;
        }
        let rights = board.castling();
        let rook = Some(Piece::new(PieceType::Rook, us));
        let empty = |x: u8| board.get(Square::new(x, y)).is_none();

        let kingside = rights.has(CastlingRights::kingside(us))
            && empty(5)
            && empty(6)
            && board.get(Square::new(7, y)) == rook;
        let queenside = rights.has(CastlingRights::queenside(us))
            && empty(1)
            && empty(2)
            && empty(3)
            && board.get(Square::new(0, y)) == rook;

        if !kingside && !queenside {
            return;
        }

        let attacked = Self::attack_map(board, us.opposite());
        let safe = |xs: [u8; 3]| xs.iter().all(|&x| !attacked.contains(Square::new(x, y)));

        if kingside && safe([4, 5, 6]) {
            moves.push(Move::new_castle(from, Square::new(6, y), Castle::Kingside));
        }
        if queenside && safe([4, 3, 2]) {
            moves.push(Move::new_castle(from, Square::new(2, y), Castle::Queenside));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn test_knight_attacks() {
        assert_eq!(MoveGen::knight_attacks(sq("e4")).count(), 8);
        assert_eq!(MoveGen::knight_attacks(sq("a1")).count(), 2);
    }

    #[test]
    fn test_king_attacks() {
        assert_eq!(MoveGen::king_attacks(sq("e4")).count(), 8);
        assert_eq!(MoveGen::king_attacks(sq("a1")).count(), 3);
    }

    #[test]
    fn test_pawn_attacks_point_forward() {
        let white = MoveGen::pawn_attacks(sq("e4"), Color::White);
        assert!(white.contains(sq("d5")) && white.contains(sq("f5")));
        assert_eq!(white.count(), 2);

        let black = MoveGen::pawn_attacks(sq("a5"), Color::Black);
        assert!(black.contains(sq("b4")));
        assert_eq!(black.count(), 1);
    }

    #[test]
    fn test_slider_stops_at_blocker() {
        let board = Board::from_fen("8/8/8/8/4p3/8/8/4R3 w - - 0 1").unwrap();
        let attacks = MoveGen::slider_attacks(&board, sq("e1"), &ROOK_DIRS);
        assert!(attacks.contains(sq("e4")));
        assert!(!attacks.contains(sq("e5")));
        assert_eq!(attacks.count(), 3 + 7);
    }

    #[test]
    fn test_starting_position_moves() {
        let board = Board::startpos();
        assert_eq!(MoveGen::generate_pseudo_legal_moves(&board).len(), 20);
        assert_eq!(MoveGen::generate_legal_moves(&board).len(), 20);
    }

    #[test]
    fn test_en_passant() {
        let board =
            Board::from_fen("rnbqkbnr/ppp1pppp/8/3pP3/8/8/PPPP1PPP/RNBQKBNR w KQkq d6 0 3").unwrap();
        let moves = MoveGen::generate_legal_moves(&board);
        let ep: Vec<_> = moves.iter().filter(|m| m.en_passant).collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(ep[0].to_uci(), "e5d6");
    }

    #[test]
    fn test_castling() {
        let board = Board::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let moves = MoveGen::generate_legal_moves(&board);
        assert_eq!(moves.iter().filter(|m| m.is_castle()).count(), 2);
    }

    #[test]
    fn test_no_castling_through_attack() {
        // Black rook on f8 covers f1
        let board = Board::from_fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let moves = MoveGen::generate_legal_moves(&board);
        let castles: Vec<_> = moves.iter().filter(|m| m.is_castle()).collect();
        assert_eq!(castles.len(), 1);
        assert_eq!(castles[0].castle, Castle::Queenside);
    }

    #[test]
    fn test_promotion() {
        let board = Board::from_fen("8/P7/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        let moves = MoveGen::generate_legal_moves(&board);
        assert_eq!(moves.iter().filter(|m| m.is_promotion()).count(), 4);
    }

    #[test]
    fn test_no_king_is_not_check() {
        let board = Board::from_fen("8/8/8/8/8/8/8/q7 w - - 0 1").unwrap();
        assert!(!MoveGen::is_in_check(&board, Color::White));
        assert!(MoveGen::generate_legal_moves(&board).is_empty());
    }
}
