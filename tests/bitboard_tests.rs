use coco_chess::core::{Bitboard, Board, Color, Square};
use coco_chess::engine::MoveGen;

fn sq(s: &str) -> Square {
    Square::from_algebraic(s).unwrap()
}

#[test]
fn test_bitboard_basics() {
    let mut bb = Bitboard::EMPTY;
    assert!(bb.is_empty());
    assert_eq!(bb.count(), 0);

    bb.set(sq("a8"));
    assert!(bb.contains(sq("a8")));
    assert!(bb.is_not_empty());
    assert_eq!(bb.count(), 1);

    bb.set(sq("h1"));
    bb.set(sq("h1"));
    assert!(bb.contains(sq("h1")));
    assert_eq!(bb.count(), 2);
    assert!(!bb.contains(sq("e4")));
}

#[test]
fn test_bitboard_operations() {
    let a = Bitboard::from_square(sq("a1"));
    let b = Bitboard::from_square(sq("b1"));

    assert_eq!((a | b).count(), 2);
    assert!((a & b).is_empty());
    assert_eq!((!a).count(), 63);
    assert!(!(!a).contains(sq("a1")));

    let mut c = a;
    c |= b;
    c &= b;
    assert_eq!(c, b);
}

#[test]
fn test_bitboard_constants() {
    assert_eq!(Bitboard::EMPTY.0, 0);
    assert_eq!(Bitboard::ALL.0, u64::MAX);
    assert_eq!(Bitboard::ALL.count(), 64);
}

#[test]
fn test_bitboard_iter_in_index_order() {
    let mut bb = Bitboard::EMPTY;
    for s in ["h1", "a8", "e4"] {
        bb.set(sq(s));
    }
    let squares: Vec<Square> = bb.iter().collect();
    assert_eq!(squares, vec![sq("a8"), sq("e4"), sq("h1")]);
}

#[test]
fn test_attack_map_startpos() {
    let board = Board::startpos();
    let white = MoveGen::attack_map(&board, Color::White);
    // Every third-rank square is covered by a pawn or knight
    for x in 0..8 {
        assert!(white.contains(Square::new(x, 5)));
    }
    assert!(!white.contains(sq("e4")));
    assert!(!white.contains(sq("a1")));

    let black = MoveGen::attack_map(&board, Color::Black);
    assert!(black.contains(sq("f6")));
    assert!(!black.contains(sq("e3")));
}

#[test]
fn test_pawn_attack_map() {
    let board = Board::from_fen("4k3/8/8/8/3p4/8/2P5/4K3 w - - 0 1").unwrap();
    let white = MoveGen::pawn_attack_map(&board, Color::White);
    assert_eq!(white.count(), 2);
    assert!(white.contains(sq("b3")));
    assert!(white.contains(sq("d3")));

    let black = MoveGen::pawn_attack_map(&board, Color::Black);
    assert!(black.contains(sq("c3")));
    assert!(black.contains(sq("e3")));
}

#[test]
fn test_is_square_attacked() {
    let board = Board::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1").unwrap();
    assert!(MoveGen::is_square_attacked(&board, sq("a8"), Color::White));
    assert!(MoveGen::is_square_attacked(&board, sq("d1"), Color::White));
    assert!(!MoveGen::is_square_attacked(&board, sq("b2"), Color::White));
    assert!(MoveGen::is_square_attacked(&board, sq("d7"), Color::Black));
}
