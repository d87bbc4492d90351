//! Search: iterative deepening, alpha-beta, quiescence.

mod alphabeta;
mod ordering;
mod pv;
mod searcher;
mod types;

pub use ordering::TT_MOVE_BONUS;
pub use pv::{format_score, SearchInfo};
pub use searcher::{InfoReporter, Searcher};
pub use types::{
    is_mate_score, mate_in_moves, plies_to_mate, score_from_tt, score_to_tt, SearchLimits,
    SearchStats, DRAW_SCORE, INFINITY, MATE_SCORE, MATE_THRESHOLD, MAX_DEPTH,
};
