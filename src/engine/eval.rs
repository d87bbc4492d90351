//! Static evaluation
//!
//! Score in centipawns from White's point of view: material, pawn structure
//! penalties and piece-square tables. The tables are laid out as seen from
//! White with rank 8 in the first row; Black reads them mirrored vertically.

use crate::core::{Board, Color, PieceType};

pub const DOUBLED_PAWN_PENALTY: i32 = 50;
pub const ISOLATED_PAWN_PENALTY: i32 = 50;
pub const BLOCKED_PAWN_PENALTY: i32 = 50;

// Simplified Evaluation Function tables (chessprogramming wiki)
#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

#[inline]
fn table(pt: PieceType) -> &'static [i32; 64] {
    match pt {
        PieceType::Pawn => &PAWN_TABLE,
        PieceType::Knight => &KNIGHT_TABLE,
        PieceType::Bishop => &BISHOP_TABLE,
        PieceType::Rook => &ROOK_TABLE,
        PieceType::Queen => &QUEEN_TABLE,
        PieceType::King => &KING_TABLE,
    }
}

/// Evaluate the position. Positive favours White.
pub fn evaluate(board: &Board) -> i32 {
    side_score(board, Color::White) - side_score(board, Color::Black)
}

/// Evaluate from the side to move's point of view
#[inline]
pub fn evaluate_relative(board: &Board) -> i32 {
    evaluate(board) * board.side_to_move().sign()
}

/// One side's material, piece-square and pawn-structure terms
fn side_score(board: &Board, color: Color) -> i32 {
    let mut score = 0;
    for pt in PieceType::ALL {
        let squares = board.pieces(color, pt);
        score += squares.len() as i32 * pt.value();
        score += piece_square_score(color, pt, squares);
    }
    score -= pawn_structure_penalty(board, color);
    score
}

fn piece_square_score(color: Color, pt: PieceType, squares: &[crate::core::Square]) -> i32 {
    let table = table(pt);
    squares
        .iter()
        .map(|sq| {
            let y = match color {
                Color::White => sq.y(),
                Color::Black => 7 - sq.y(),
            };
            table[sq.x() as usize + y as usize * 8]
        })
        .sum()
}

/// Doubled, isolated and blocked pawn penalties for `color`
pub fn pawn_structure_penalty(board: &Board, color: Color) -> i32 {
    let pawns = board.pieces(color, PieceType::Pawn);

    let mut files = [0i32; 8];
    for sq in pawns {
        files[sq.x() as usize] += 1;
    }

    let doubled: i32 = files.iter().filter(|&&n| n > 1).map(|&n| n - 1).sum();

    let isolated = pawns
        .iter()
        .filter(|sq| {
            let x = sq.x() as usize;
            let left = x == 0 || files[x - 1] == 0;
            let right = x == 7 || files[x + 1] == 0;
            left && right
        })
        .count() as i32;

    let blocked = pawns
        .iter()
        .filter(|sq| {
            sq.offset(0, color.pawn_dir())
                .is_some_and(|ahead| board.get(ahead).is_some())
        })
        .count() as i32;

    doubled * DOUBLED_PAWN_PENALTY
        + isolated * ISOLATED_PAWN_PENALTY
        + blocked * BLOCKED_PAWN_PENALTY
}
