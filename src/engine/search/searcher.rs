//! Searcher: iterative deepening driver, cancellation, and search entry points.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::core::{Board, Move};
use crate::engine::movegen::MoveGen;
use crate::engine::tt::TranspositionTable;

use super::pv::{self, SearchInfo};
use super::types::{is_mate_score, plies_to_mate, SearchLimits, SearchStats, INFINITY, MAX_DEPTH};

/// Callback receiving one [`SearchInfo`] per completed depth
pub type InfoReporter = Box<dyn FnMut(&SearchInfo) + Send>;

/// Owns the transposition table and per-search state. One search runs at a
/// time; the stop flag may be shared with other threads.
pub struct Searcher {
    pub(super) tt: TranspositionTable,
    pub(super) stats: SearchStats,
    pub(super) stop: Arc<AtomicBool>,
    /// Whether the stop flag is honoured by the pass in progress
    pub(super) abortable: bool,
    /// Hashes of positions played before the root
    pub(super) history: Vec<u64>,
    /// Hashes of the nodes between the root and the current node
    pub(super) path: Vec<u64>,
    start_time: Instant,
    reporter: Option<InfoReporter>,
}

impl Searcher {
    pub fn new() -> Self {
        Self::with_hash_mb(EngineConfig::default().hash_mb)
    }

    pub fn with_hash_mb(size_mb: usize) -> Self {
        Searcher {
            tt: TranspositionTable::new(size_mb),
            stats: SearchStats::default(),
            stop: Arc::new(AtomicBool::new(false)),
            abortable: false,
            history: Vec::new(),
            path: Vec::with_capacity(MAX_DEPTH as usize),
            start_time: Instant::now(),
            reporter: None,
        }
    }

    /// Flag that aborts the running search when set. Searches never clear it.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn set_hash_size(&mut self, size_mb: usize) {
        self.tt = TranspositionTable::new(size_mb);
    }

    /// Positions that occurred in the game before the root, for repetition detection
    pub fn set_history(&mut self, hashes: Vec<u64>) {
        self.history = hashes;
    }

    /// Receive an info line after every completed depth
    pub fn set_reporter(&mut self, reporter: InfoReporter) {
        self.reporter = Some(reporter);
    }

    pub fn clear_reporter(&mut self) {
        self.reporter = None;
    }

    /// Forget cached results and game history
    pub fn clear(&mut self) {
        self.tt.clear();
        self.history.clear();
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn hashfull(&self) -> usize {
        self.tt.hashfull()
    }

    pub(super) fn should_stop(&self) -> bool {
        self.abortable && self.stop.load(Ordering::Relaxed)
    }

    /// Principal variation of `board` as recorded in the cache
    pub fn principal_variation(&self, board: &Board, max_plies: usize) -> Vec<Move> {
        pv::get_pv_from_tt(&self.tt, board, max_plies)
    }

    /// One full-width pass at exactly `depth`; never aborted
    pub fn search_to_depth(&mut self, board: &Board, depth: i32) -> Option<Move> {
        self.begin();
        let depth = depth.clamp(1, MAX_DEPTH);
        let (score, mv) = self.negamax(board, depth, 0, -INFINITY, INFINITY);
        self.finish_depth(board, depth, score);
        mv.or_else(|| Self::first_legal(board))
    }

    /// Iterative deepening from depth 1 to `max_depth`; never aborted
    pub fn search_iterative(&mut self, board: &Board, max_depth: i32) -> Option<Move> {
        self.iterate(board, max_depth, false)
    }

    /// Iterative deepening until the stop flag is set. Depth 1 always
    /// completes; a depth interrupted by the flag is discarded.
    pub fn search_abortable(&mut self, board: &Board) -> Option<Move> {
        self.iterate(board, MAX_DEPTH, true)
    }

    /// Search under UCI `go` limits. Only `depth` bounds the search here;
    /// clock limits are enforced by whoever owns the stop flag.
    pub fn search(&mut self, board: &Board, limits: &SearchLimits) -> Option<Move> {
        self.iterate(board, limits.depth.unwrap_or(MAX_DEPTH), true)
    }

    fn begin(&mut self) {
        self.start_time = Instant::now();
        self.stats = SearchStats::default();
        self.path.clear();
        self.abortable = false;
    }

    fn iterate(&mut self, board: &Board, max_depth: i32, abortable: bool) -> Option<Move> {
        self.begin();
        let max_depth = max_depth.clamp(1, MAX_DEPTH);
        let mut best_move: Option<Move> = None;

        for depth in 1..=max_depth {
            self.abortable = abortable && depth > 1;
            let (score, mv) = self.negamax(board, depth, 0, -INFINITY, INFINITY);

            if self.should_stop() {
                info!(depth, "search aborted, keeping previous depth");
                break;
            }

            self.finish_depth(board, depth, score);

            match mv {
                Some(mv) => best_move = Some(mv),
                None => break,
            }

            if is_mate_score(score) && plies_to_mate(score) <= depth {
                break;
            }
        }

        self.abortable = false;
        best_move.or_else(|| Self::first_legal(board))
    }

    fn finish_depth(&mut self, board: &Board, depth: i32, score: i32) {
        let info = SearchInfo {
            depth,
            score,
            nodes: self.stats.nodes + self.stats.qnodes,
            time_ms: self.start_time.elapsed().as_millis(),
            hashfull: self.tt.hashfull(),
            pv: self.principal_variation(board, depth as usize),
        };
        debug!(
            depth,
            score,
            nodes = info.nodes,
            elapsed_ms = info.time_ms as u64,
            "depth complete"
        );
        if let Some(reporter) = self.reporter.as_mut() {
            reporter(&info);
        }
    }

    fn first_legal(board: &Board) -> Option<Move> {
        MoveGen::generate_legal_moves(board).iter().next().copied()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new()
    }
}
