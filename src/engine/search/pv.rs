//! Principal variation reconstruction and UCI info reporting.

use std::fmt;

use crate::core::{Board, Move};
use crate::engine::movegen::MoveGen;
use crate::engine::tt::TranspositionTable;

use super::types::{is_mate_score, mate_in_moves};

/// Follow cached best moves from `board`, checking each one is legal
pub(super) fn get_pv_from_tt(
    tt: &TranspositionTable,
    board: &Board,
    max_plies: usize,
) -> Vec<Move> {
    let mut pv = Vec::with_capacity(max_plies);
    let mut seen = Vec::with_capacity(max_plies);
    let mut cur = board.clone();
    for _ in 0..max_plies {
        let Some(mv) = tt.probe(cur.hash()).and_then(|e| e.best_move) else {
            break;
        };
        if !MoveGen::generate_legal_moves(&cur).contains(&mv) {
            break;
        }
        seen.push(cur.hash());
        pv.push(mv);
        cur.apply_move(mv);
        if seen.contains(&cur.hash()) {
            break;
        }
    }
    pv
}

/// "cp X" or "mate N"
pub fn format_score(score: i32) -> String {
    if is_mate_score(score) {
        format!("mate {}", mate_in_moves(score))
    } else {
        format!("cp {}", score)
    }
}

/// Summary of one completed iterative-deepening depth
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchInfo {
    pub depth: i32,
    pub score: i32,
    pub nodes: u64,
    pub time_ms: u128,
    pub hashfull: usize,
    pub pv: Vec<Move>,
}

impl fmt::Display for SearchInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nps = if self.time_ms > 0 {
            (self.nodes as u128 * 1000) / self.time_ms
        } else {
            0
        };
        write!(
            f,
            "info depth {} score {} nodes {} nps {} time {} hashfull {}",
            self.depth,
            format_score(self.score),
            self.nodes,
            nps,
            self.time_ms,
            self.hashfull
        )?;
        if !self.pv.is_empty() {
            let pv_str: Vec<String> = self.pv.iter().map(|m| m.to_uci()).collect();
            write!(f, " pv {}", pv_str.join(" "))?;
        }
        Ok(())
    }
}
