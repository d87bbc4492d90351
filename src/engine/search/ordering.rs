//! Move ordering: MVV-LVA, promotions, pawn-attacked destinations, cache move.

use crate::core::{Bitboard, Board, Move};
use crate::engine::movegen::MoveGen;

/// Lifts the cached best move above every heuristic score
pub const TT_MOVE_BONUS: i32 = 1_000_000;

/// Score each move and sort descending. Equal scores keep generation order.
pub(super) fn order_moves(
    board: &Board,
    moves: &[Move],
    tt_move: Option<Move>,
) -> Vec<(Move, i32)> {
    let enemy_pawns = MoveGen::pawn_attack_map(board, board.side_to_move().opposite());
    let mut scored: Vec<(Move, i32)> = moves
        .iter()
        .map(|&mv| (mv, score_move(board, mv, tt_move, enemy_pawns)))
        .collect();
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
}

pub(super) fn score_move(
    board: &Board,
    mv: Move,
    tt_move: Option<Move>,
    enemy_pawns: Bitboard,
) -> i32 {
    let mover = board
        .get(mv.from)
        .map(|p| p.piece_type.value())
        .unwrap_or(0);

    let mut score = mvv_lva(board, mv, mover);

    if let Some(pt) = mv.promotion.piece_type() {
        score += pt.value();
    }
    if enemy_pawns.contains(mv.to) {
        score -= mover;
    }
    if tt_move == Some(mv) {
        score += TT_MOVE_BONUS;
    }
    score
}

fn mvv_lva(board: &Board, mv: Move, attacker: i32) -> i32 {
    match board.get(mv.to) {
        Some(victim) => victim.piece_type.value() * 10 - attacker,
        None => 0,
    }
}
