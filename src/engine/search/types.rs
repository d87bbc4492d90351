//! Search limits, stats, and constants.

use crate::core::Color;
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub depth: Option<i32>,
    /// Milliseconds for this move
    pub movetime: Option<u64>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
    pub movestogo: Option<u32>,
    pub infinite: bool,
}

impl SearchLimits {
    /// Search to a fixed depth with no clock
    pub fn depth(depth: i32) -> Self {
        SearchLimits {
            depth: Some(depth),
            ..Default::default()
        }
    }

    /// Wall-clock budget for `side`, or None when the search is unbounded in time
    pub fn time_budget(&self, side: Color) -> Option<Duration> {
        if self.infinite {
            return None;
        }
        if let Some(mt) = self.movetime {
            return Some(Duration::from_millis(mt));
        }
        let (time, inc) = match side {
            Color::White => (self.wtime?, self.winc.unwrap_or(0)),
            Color::Black => (self.btime?, self.binc.unwrap_or(0)),
        };
        let moves_to_go = self.movestogo.unwrap_or(30).max(1) as u64;
        let time_for_move = time / moves_to_go + inc / 2;
        Some(Duration::from_millis(time_for_move.min(time / 2)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
}

pub const INFINITY: i32 = 2_000_000;
pub const MATE_SCORE: i32 = 1_000_000;
/// Scores beyond `MATE_SCORE - MATE_THRESHOLD` in magnitude are mates
pub const MATE_THRESHOLD: i32 = 1000;
pub const DRAW_SCORE: i32 = 0;
pub const MAX_DEPTH: i32 = 64;

#[inline]
pub fn is_mate_score(score: i32) -> bool {
    score.abs() > MATE_SCORE - MATE_THRESHOLD
}

/// Plies from the scored node to the mate
#[inline]
pub fn plies_to_mate(score: i32) -> i32 {
    MATE_SCORE - score.abs()
}

/// Signed full moves to mate, negative when the side to move is mated
pub fn mate_in_moves(score: i32) -> i32 {
    let moves = (plies_to_mate(score) + 1) / 2;
    if score > 0 { moves } else { -moves }
}

/// Mate scores are stored relative to the node, read back relative to the root
#[inline]
pub fn score_to_tt(score: i32, ply: i32) -> i32 {
    if !is_mate_score(score) {
        score
    } else if score > 0 {
        score + ply
    } else {
        score - ply
    }
}

#[inline]
pub fn score_from_tt(score: i32, ply: i32) -> i32 {
    if !is_mate_score(score) {
        score
    } else if score > 0 {
        score - ply
    } else {
        score + ply
    }
}
