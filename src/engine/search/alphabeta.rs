//! Negamax alpha-beta search and quiescence.
//!
//! Every child is searched on its own copy of the board. Pseudo-legal moves
//! are filtered lazily: a move that leaves the mover in check is skipped when
//! it is reached, never in a separate legality pass.

use crate::core::{Board, Move};
use crate::engine::eval::evaluate_relative;
use crate::engine::movegen::MoveGen;
use crate::engine::tt::{TTEntry, TTFlag};

use super::ordering;
use super::searcher::Searcher;
use super::types::{score_from_tt, score_to_tt, DRAW_SCORE, INFINITY, MATE_SCORE};

impl Searcher {
    /// Returns the score for the side to move and the best move found.
    /// After an abort the result is meaningless and must be discarded.
    pub(super) fn negamax(
        &mut self,
        board: &Board,
        depth: i32,
        ply: i32,
        mut alpha: i32,
        mut beta: i32,
    ) -> (i32, Option<Move>) {
        if self.should_stop() {
            return (0, None);
        }
        self.stats.nodes += 1;

        let hash = board.hash();
        if ply > 0 && self.is_draw(board) {
            return (DRAW_SCORE, None);
        }

        let alpha_orig = alpha;
        let mut tt_move: Option<Move> = None;

        if let Some(entry) = self.tt.probe(hash).copied() {
            self.stats.tt_hits += 1;
            tt_move = entry.best_move;
            // The root must always come back with a move
            if entry.depth >= depth && (ply > 0 || entry.best_move.is_some()) {
                let score = score_from_tt(entry.score, ply);
                match entry.flag {
                    TTFlag::Exact => {
                        self.stats.tt_cutoffs += 1;
                        return (score, entry.best_move);
                    }
                    TTFlag::LowerBound => alpha = alpha.max(score),
                    TTFlag::UpperBound => beta = beta.min(score),
                }
                if alpha >= beta {
                    self.stats.tt_cutoffs += 1;
                    return (score, entry.best_move);
                }
            }
        }

        let mut best_score = -INFINITY;
        let mut best_move: Option<Move> = None;

        if depth <= 0 {
            best_score = self.quiescence(board, ply, alpha, beta);
        } else {
            let us = board.side_to_move();
            let moves = MoveGen::generate_pseudo_legal_moves(board);
            let ordered = ordering::order_moves(board, moves.as_slice(), tt_move);

            let mut had_legal_move = false;
            self.path.push(hash);
            for (mv, _) in ordered {
                let child = board.with_move(mv);
                if child.is_in_check(us) {
                    continue;
                }
                had_legal_move = true;

                let (child_score, _) = self.negamax(&child, depth - 1, ply + 1, -beta, -alpha);
                let score = -child_score;
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(best_score);
                if alpha >= beta {
                    break;
                }
            }
            self.path.pop();

            if !had_legal_move {
                let score = if board.is_in_check(us) {
                    -(MATE_SCORE - ply)
                } else {
                    DRAW_SCORE
                };
                return (score, None);
            }
        }

        if self.should_stop() {
            return (0, None);
        }

        let flag = if best_score <= alpha_orig {
            TTFlag::UpperBound
        } else if best_score >= beta {
            TTFlag::LowerBound
        } else {
            TTFlag::Exact
        };
        self.tt.store(TTEntry {
            key: hash,
            best_move,
            depth,
            score: score_to_tt(best_score, ply),
            flag,
        });

        (best_score, best_move)
    }

    /// Captures-only search from a stand-pat lower bound
    pub(super) fn quiescence(&mut self, board: &Board, ply: i32, mut alpha: i32, beta: i32) -> i32 {
        if self.should_stop() {
            return 0;
        }
        self.stats.qnodes += 1;

        let stand_pat = evaluate_relative(board);
        if stand_pat >= beta {
            return beta;
        }
        alpha = alpha.max(stand_pat);

        let us = board.side_to_move();
        let captures: Vec<Move> = MoveGen::generate_pseudo_legal_moves(board)
            .iter()
            .copied()
            .filter(|mv| board.get(mv.to).is_some())
            .collect();
        if captures.is_empty() {
            return alpha;
        }

        let tt_move = self.tt.probe(board.hash()).and_then(|e| e.best_move);
        for (mv, _) in ordering::order_moves(board, &captures, tt_move) {
            let child = board.with_move(mv);
            if child.is_in_check(us) {
                continue;
            }
            let score = -self.quiescence(&child, ply + 1, -beta, -alpha);
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }

        alpha
    }

    /// Repetition of a game or search-path position, or the fifty-move rule
    fn is_draw(&self, board: &Board) -> bool {
        if board.halfmove_clock() >= 100 {
            return true;
        }
        let hash = board.hash();
        self.path.contains(&hash) || self.history.contains(&hash)
    }
}
