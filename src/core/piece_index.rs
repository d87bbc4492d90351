//! Per-colour, per-type square lists
//!
//! All occupied squares live in one 64-slot array. White's squares come
//! first, then Black's; within a colour the squares are grouped by piece type
//! in the order pawn, knight, bishop, rook, queen, king. Only the block
//! lengths are stored, so locating a block is a short prefix sum and every
//! insert or remove shifts a single contiguous run of the array.

use super::board::{Color, PieceType, Square};

#[derive(Clone, PartialEq, Eq)]
pub struct PieceIndex {
    list: [Square; 64],
    lens: [[u8; 6]; 2],
}

impl PieceIndex {
    pub fn new() -> Self {
        PieceIndex {
            list: [Square::from_index(0); 64],
            lens: [[0; 6]; 2],
        }
    }

    /// Start of the block holding `color`'s pieces of type `pt`
    #[inline]
    fn offset(&self, color: Color, pt: PieceType) -> usize {
        let mut start = 0usize;
        if color == Color::Black {
            start += self.lens[0].iter().map(|&n| n as usize).sum::<usize>();
        }
        start
            + self.lens[color.index()][..pt.index()]
                .iter()
                .map(|&n| n as usize)
                .sum::<usize>()
    }

    #[inline]
    fn total(&self) -> usize {
        self.lens
            .iter()
            .flat_map(|c| c.iter())
            .map(|&n| n as usize)
            .sum()
    }

    /// Squares holding `color`'s pieces of type `pt`
    #[inline]
    pub fn squares(&self, color: Color, pt: PieceType) -> &[Square] {
        let start = self.offset(color, pt);
        let len = self.lens[color.index()][pt.index()] as usize;
        &self.list[start..start + len]
    }

    /// Every square holding a piece of `color`, grouped by type
    pub fn all(&self, color: Color) -> &[Square] {
        let start = self.offset(color, PieceType::Pawn);
        let len: usize = self.lens[color.index()].iter().map(|&n| n as usize).sum();
        &self.list[start..start + len]
    }

    #[inline]
    pub fn count(&self, color: Color, pt: PieceType) -> usize {
        self.lens[color.index()][pt.index()] as usize
    }

    /// Record a piece at `sq`; it goes to the front of its block
    pub fn insert(&mut self, color: Color, pt: PieceType, sq: Square) {
        let total = self.total();
        assert!(total < 64, "piece index overflow");
        let start = self.offset(color, pt);
        self.list.copy_within(start..total, start + 1);
        self.list[start] = sq;
        self.lens[color.index()][pt.index()] += 1;
    }

    /// Forget the piece at `sq`. Returns false if it was not recorded.
    pub fn remove(&mut self, color: Color, pt: PieceType, sq: Square) -> bool {
        let start = self.offset(color, pt);
        let len = self.lens[color.index()][pt.index()] as usize;
        let Some(pos) = self.list[start..start + len].iter().position(|&s| s == sq) else {
            return false;
        };
        let total = self.total();
        self.list.copy_within(start + pos + 1..total, start + pos);
        self.lens[color.index()][pt.index()] -= 1;
        true
    }
}

impl Default for PieceIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PieceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for color in [Color::White, Color::Black] {
            for pt in PieceType::ALL {
                let squares = self.squares(color, pt);
                if !squares.is_empty() {
                    map.entry(&(color, pt), &squares);
                }
            }
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove_keeps_blocks() {
        let mut idx = PieceIndex::new();
        let a = Square::new(0, 6);
        let b = Square::new(1, 6);
        let k = Square::new(4, 7);
        let bk = Square::new(4, 0);

        idx.insert(Color::White, PieceType::Pawn, a);
        idx.insert(Color::Black, PieceType::King, bk);
        idx.insert(Color::White, PieceType::King, k);
        idx.insert(Color::White, PieceType::Pawn, b);

        assert_eq!(idx.squares(Color::White, PieceType::Pawn), &[b, a]);
        assert_eq!(idx.squares(Color::White, PieceType::King), &[k]);
        assert_eq!(idx.squares(Color::Black, PieceType::King), &[bk]);
        assert_eq!(idx.all(Color::White).len(), 3);

        assert!(idx.remove(Color::White, PieceType::Pawn, b));
        assert!(!idx.remove(Color::White, PieceType::Pawn, b));
        assert_eq!(idx.squares(Color::White, PieceType::Pawn), &[a]);
        assert_eq!(idx.squares(Color::Black, PieceType::King), &[bk]);
        assert_eq!(idx.count(Color::White, PieceType::King), 1);
    }
}
