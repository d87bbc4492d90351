//! Move generation checked by perft against published counts and against
//! shakmaty's move generator.

use coco_chess::core::Board;
use coco_chess::engine::perft::{count_leaves, count_leaves_parallel, divide, PerftScheduler};
use coco_chess::engine::MoveGen;
use shakmaty::{fen::Fen, CastlingMode, Chess, Position};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";
const POSITION_6: &str = "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10";

fn board(fen: &str) -> Board {
    Board::from_fen(fen).unwrap()
}

fn assert_perft(fen: &str, expected: &[u64]) {
    let b = board(fen);
    for (i, &nodes) in expected.iter().enumerate() {
        let depth = i as u32 + 1;
        assert_eq!(count_leaves(&b, depth), nodes, "{} depth {}", fen, depth);
    }
}

fn shakmaty_position(b: &Board) -> Chess {
    let fen: Fen = b.to_fen().parse().unwrap();
    fen.into_position(CastlingMode::Standard).unwrap()
}

fn sorted_uci_ours(b: &Board) -> Vec<String> {
    let mut moves: Vec<String> = MoveGen::generate_legal_moves(b)
        .iter()
        .map(|m| m.to_uci())
        .collect();
    moves.sort();
    moves
}

fn sorted_uci_shakmaty(pos: &Chess) -> Vec<String> {
    let mut moves: Vec<String> = pos
        .legal_moves()
        .iter()
        .map(|m| m.to_uci(CastlingMode::Standard).to_string())
        .collect();
    moves.sort();
    moves
}

/// Compare legal move lists at every node down to `depth`
fn compare_with_shakmaty(b: &Board, depth: u32) {
    let pos = shakmaty_position(b);
    assert_eq!(sorted_uci_ours(b), sorted_uci_shakmaty(&pos), "{}", b.to_fen());
    if depth == 0 {
        return;
    }
    for mv in MoveGen::generate_legal_moves(b).iter() {
        compare_with_shakmaty(&b.with_move(*mv), depth - 1);
    }
}

// ============================================================================
// Published Counts
// ============================================================================

#[test]
fn test_perft_depth_zero() {
    assert_eq!(count_leaves(&Board::startpos(), 0), 1);
    assert!(divide(&Board::startpos(), 0).is_empty());
}

#[test]
fn test_perft_startpos() {
    let b = Board::startpos();
    assert_eq!(count_leaves(&b, 1), 20);
    assert_eq!(count_leaves(&b, 2), 400);
    assert_eq!(count_leaves(&b, 3), 8902);
    assert_eq!(count_leaves(&b, 4), 197281);
}

#[test]
fn test_perft_startpos_depth_5_parallel() {
    assert_eq!(count_leaves_parallel(&Board::startpos(), 5), 4865609);
}

#[test]
fn test_perft_kiwipete() {
    assert_perft(KIWIPETE, &[48, 2039, 97862]);
}

#[test]
fn test_perft_position_3() {
    assert_perft(POSITION_3, &[14, 191, 2812, 43238]);
}

#[test]
fn test_perft_position_4() {
    assert_perft(POSITION_4, &[6, 264, 9467]);
}

#[test]
fn test_perft_position_5() {
    assert_perft(POSITION_5, &[44, 1486, 62379]);
}

#[test]
fn test_perft_position_6() {
    assert_perft(POSITION_6, &[46, 2079, 89890]);
}

// ============================================================================
// Parallel Counting
// ============================================================================

#[test]
fn test_parallel_matches_sequential() {
    for fen in [KIWIPETE, POSITION_3, POSITION_4, POSITION_5] {
        let b = board(fen);
        assert_eq!(count_leaves_parallel(&b, 3), count_leaves(&b, 3), "{}", fen);
    }
}

#[test]
fn test_scheduler_split_depths_agree() {
    let b = board(KIWIPETE);
    for split in [0, 1, 2, 3, 5] {
        let scheduler = PerftScheduler::new(4, split).unwrap();
        assert_eq!(scheduler.count_leaves(&b, 3), 97862, "split depth {}", split);
    }
}

#[test]
fn test_scheduler_single_thread() {
    let scheduler = PerftScheduler::new(1, 2).unwrap();
    assert_eq!(scheduler.threads(), 1);
    assert_eq!(scheduler.count_leaves(&board(POSITION_3), 4), 43238);
}

#[test]
fn test_divide_sums_to_total() {
    let b = board(KIWIPETE);
    let counts = divide(&b, 3);
    assert_eq!(counts.len(), 48);
    assert_eq!(counts.iter().map(|(_, n)| n).sum::<u64>(), 97862);

    let parallel = PerftScheduler::new(3, 1).unwrap().divide(&b, 3);
    assert_eq!(parallel, counts);
}

#[test]
fn test_divide_startpos_entries() {
    let counts = divide(&Board::startpos(), 2);
    assert_eq!(counts.len(), 20);
    assert!(counts.iter().all(|(_, n)| *n == 20));
}

// ============================================================================
// Cross-check Against shakmaty
// ============================================================================

#[test]
fn test_legal_moves_match_shakmaty() {
    for fen in [KIWIPETE, POSITION_3, POSITION_4, POSITION_5, POSITION_6] {
        compare_with_shakmaty(&board(fen), 1);
    }
}

#[test]
fn test_legal_moves_match_shakmaty_deep() {
    compare_with_shakmaty(&board(KIWIPETE), 2);
}

#[test]
fn test_special_positions_match_shakmaty() {
    for fen in [
        // En passant that would expose the king along the rank
        "8/8/8/KPp4r/8/8/8/7k w - c6 0 1",
        // Castling out of check, through check and into check
        "r3k2r/8/8/8/4q3/8/8/R3K2R w KQkq - 0 1",
        "r3k2r/8/8/8/8/5b2/8/R3K2R w KQkq - 0 1",
        "r3k2r/8/8/8/8/8/6p1/R3K2R w KQkq - 0 1",
        // Promotions with and without capture
        "1r5k/P7/8/8/8/8/8/K7 w - - 0 1",
        // Pinned pieces
        "4k3/4r3/8/8/8/8/4B3/4K3 w - - 0 1",
    ] {
        compare_with_shakmaty(&board(fen), 2);
    }
}
