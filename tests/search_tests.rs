use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use coco_chess::core::{Board, Color};
use coco_chess::engine::search::{
    format_score, is_mate_score, mate_in_moves, plies_to_mate, score_from_tt, score_to_tt,
    SearchInfo, SearchLimits, Searcher, MATE_SCORE,
};
use coco_chess::engine::MoveGen;

fn board(fen: &str) -> Board {
    Board::from_fen(fen).unwrap()
}

fn searcher() -> Searcher {
    Searcher::with_hash_mb(16)
}

/// Attach a reporter that records every completed depth
fn record(searcher: &mut Searcher) -> Arc<Mutex<Vec<SearchInfo>>> {
    let infos = Arc::new(Mutex::new(Vec::new()));
    let sink = infos.clone();
    searcher.set_reporter(Box::new(move |info: &SearchInfo| {
        sink.lock().unwrap().push(info.clone());
    }));
    infos
}

fn is_checkmate(board: &Board) -> bool {
    board.is_in_check(board.side_to_move()) && MoveGen::generate_legal_moves(board).is_empty()
}

// ============================================================================
// Mate Finding
// ============================================================================

#[test]
fn test_finds_mate_in_one_white() {
    let b = board("8/8/8/7R/4Q3/6k1/3R4/K7 w - - 13 9");
    let mv = searcher().search_iterative(&b, 3).unwrap();
    assert_eq!(mv.to_uci(), "d2g2");
    assert!(is_checkmate(&b.with_move(mv)));
}

#[test]
fn test_finds_mate_in_one_black() {
    let b = board("k6r/8/8/8/8/8/PPP5/K7 b - - 0 1");
    let mv = searcher().search_to_depth(&b, 3).unwrap();
    assert_eq!(mv.to_uci(), "h8h1");
}

#[test]
fn test_finds_mate_in_two_with_sacrifice() {
    let b = board("kbK5/pp6/1P6/8/8/8/8/R7 w - - 0 1");
    let mut s = searcher();
    let mv = s.search_iterative(&b, 5).unwrap();
    assert_eq!(mv.to_uci(), "a1a6");

    let b = b.with_move(mv);
    let b = b.with_move(b.parse_uci_move("b7a6").unwrap());
    let mv = s.search_iterative(&b, 5).unwrap();
    assert_eq!(mv.to_uci(), "b6b7");
}

#[test]
fn test_mate_score_reported() {
    let b = board("k6r/8/8/8/8/8/PPP5/K7 b - - 0 1");
    let mut s = searcher();
    let infos = record(&mut s);
    s.search_iterative(&b, 6);

    let infos = infos.lock().unwrap();
    let last = infos.last().unwrap();
    assert_eq!(last.score, MATE_SCORE - 1);
    assert_eq!(format_score(last.score), "mate 1");
    assert_eq!(last.pv.first().map(|m| m.to_uci()), Some("h8h1".to_string()));
    // A proven mate ends the deepening early
    assert!(last.depth < 6);
}

#[test]
fn test_reporter_sees_every_depth() {
    let mut s = searcher();
    let infos = record(&mut s);
    s.search_iterative(&Board::startpos(), 3);

    let infos = infos.lock().unwrap();
    let depths: Vec<i32> = infos.iter().map(|i| i.depth).collect();
    assert_eq!(depths, vec![1, 2, 3]);
    assert!(infos.iter().all(|i| !i.pv.is_empty()));
    assert!(infos[2].to_string().starts_with("info depth 3 score cp"));
}

// ============================================================================
// Terminal Positions and Draws
// ============================================================================

#[test]
fn test_no_move_when_checkmated() {
    let b = board("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
    assert_eq!(searcher().search_iterative(&b, 3), None);
}

#[test]
fn test_no_move_when_stalemated() {
    let b = board("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
    assert_eq!(searcher().search_iterative(&b, 3), None);
    assert_eq!(searcher().search_to_depth(&b, 3), None);
}

#[test]
fn test_fifty_move_rule_scores_draw() {
    let b = board("k7/8/8/8/8/8/8/KQ6 w - - 99 80");
    let mut s = searcher();
    let infos = record(&mut s);
    assert!(s.search_to_depth(&b, 1).is_some());
    assert_eq!(infos.lock().unwrap().last().unwrap().score, 0);

    let b = board("k7/8/8/8/8/8/8/KQ6 w - - 0 80");
    let mut s = searcher();
    let infos = record(&mut s);
    s.search_to_depth(&b, 1);
    assert!(infos.lock().unwrap().last().unwrap().score > 800);
}

#[test]
fn test_repetition_with_game_history_scores_draw() {
    let b = board("k7/8/8/8/8/8/8/KQ6 w - - 0 80");
    let children: Vec<u64> = MoveGen::generate_legal_moves(&b)
        .iter()
        .map(|&mv| b.with_move(mv).hash())
        .collect();

    let mut s = searcher();
    s.set_history(children);
    let infos = record(&mut s);
    assert!(s.search_to_depth(&b, 1).is_some());
    assert_eq!(infos.lock().unwrap().last().unwrap().score, 0);
}

// ============================================================================
// Limits and Cancellation
// ============================================================================

#[test]
fn test_search_with_depth_limit() {
    let mut s = searcher();
    let infos = record(&mut s);
    let mv = s.search(&Board::startpos(), &SearchLimits::depth(2));
    assert!(mv.is_some());
    assert_eq!(infos.lock().unwrap().last().unwrap().depth, 2);
    assert!(s.stats().nodes > 0);
}

#[test]
fn test_search_abortable_stops_on_flag() {
    let mut s = searcher();
    let stop = s.stop_flag();
    let timer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        stop.store(true, Ordering::Relaxed);
    });
    let mv = s.search_abortable(&Board::startpos());
    timer.join().unwrap();

    let mv = mv.unwrap();
    assert!(MoveGen::generate_legal_moves(&Board::startpos()).contains(&mv));
}

#[test]
fn test_stop_before_search_still_returns_move() {
    let mut s = searcher();
    s.stop_flag().store(true, Ordering::Relaxed);
    let mv = s.search_abortable(&Board::startpos());
    assert!(mv.is_some());
}

#[test]
fn test_search_to_depth_ignores_stop_flag() {
    let b = board("k6r/8/8/8/8/8/PPP5/K7 b - - 0 1");
    let mut s = searcher();
    s.stop_flag().store(true, Ordering::Relaxed);
    assert_eq!(s.search_to_depth(&b, 2).map(|m| m.to_uci()), Some("h8h1".to_string()));
}

#[test]
fn test_time_budget() {
    let limits = SearchLimits {
        movetime: Some(250),
        ..Default::default()
    };
    assert_eq!(limits.time_budget(Color::White), Some(Duration::from_millis(250)));

    let limits = SearchLimits {
        wtime: Some(60_000),
        btime: Some(1_000),
        winc: Some(1_000),
        ..Default::default()
    };
    assert_eq!(limits.time_budget(Color::White), Some(Duration::from_millis(2_500)));
    assert_eq!(limits.time_budget(Color::Black), Some(Duration::from_millis(33)));

    let limits = SearchLimits {
        infinite: true,
        wtime: Some(1_000),
        ..Default::default()
    };
    assert_eq!(limits.time_budget(Color::White), None);
    assert_eq!(SearchLimits::depth(4).time_budget(Color::Black), None);
}

#[test]
fn test_clear_forgets_history() {
    let b = board("k7/8/8/8/8/8/8/KQ6 w - - 0 80");
    let children: Vec<u64> = MoveGen::generate_legal_moves(&b)
        .iter()
        .map(|&mv| b.with_move(mv).hash())
        .collect();
    let mut s = searcher();
    s.set_history(children);
    s.clear();
    assert_eq!(s.hashfull(), 0);

    let infos = record(&mut s);
    s.search_to_depth(&b, 1);
    assert!(infos.lock().unwrap().last().unwrap().score > 800);
}

// ============================================================================
// Mate Score Helpers
// ============================================================================

#[test]
fn test_mate_score_helpers() {
    assert!(is_mate_score(MATE_SCORE - 3));
    assert!(is_mate_score(-(MATE_SCORE - 4)));
    assert!(!is_mate_score(950));
    assert_eq!(plies_to_mate(MATE_SCORE - 3), 3);
    assert_eq!(mate_in_moves(MATE_SCORE - 3), 2);
    assert_eq!(mate_in_moves(-(MATE_SCORE - 4)), -2);
    assert_eq!(format_score(-(MATE_SCORE - 2)), "mate -1");
    assert_eq!(format_score(35), "cp 35");
}

#[test]
fn test_tt_mate_scores_round_trip_through_ply() {
    // Mate in 3 plies from a node 5 plies deep
    let at_node = MATE_SCORE - 8;
    let stored = score_to_tt(at_node, 5);
    assert_eq!(stored, MATE_SCORE - 3);
    assert_eq!(score_from_tt(stored, 5), at_node);
    assert_eq!(score_from_tt(stored, 2), MATE_SCORE - 5);
    assert_eq!(score_to_tt(120, 7), 120);
}
