//! Shogi board squares, file-major.

use std::fmt;

use crate::file::File;
use crate::rank::Rank;

/// A square on the 9×9 shogi board.
///
/// Index = file * 9 + rank, so 1a = 0, 1b = 1, ..., 9i = 80.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// Total number of squares.
    pub const COUNT: usize = 81;

    /// Create a square from a file and rank.
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Square {
        Square(file.index() as u8 * 9 + rank.index() as u8)
    }

    /// Create a square from a zero-based index, returning `None` if out of range.
    #[inline]
    pub const fn from_index(index: u8) -> Option<Square> {
        if (index as usize) < Square::COUNT {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Create a square from a zero-based index without bounds checking.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `index < 81`.
    #[inline]
    pub(crate) const fn from_index_unchecked(index: u8) -> Square {
        debug_assert!((index as usize) < Square::COUNT);
        Square(index)
    }

    /// Parse USI square notation (e.g. "7g").
    pub fn from_usi(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file = File::from_char(chars.next()?)?;
        let rank = Rank::from_char(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        Some(Square::new(file, rank))
    }

    /// Return the zero-based index (0..80).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Return the file of this square.
    #[inline]
    pub const fn file(self) -> File {
        File::ALL[self.0 as usize / 9]
    }

    /// Return the rank of this square.
    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[self.0 as usize % 9]
    }

    /// Point-reflect through the board centre (180° rotation).
    #[inline]
    pub const fn rotate(self) -> Square {
        Square(Square::COUNT as u8 - 1 - self.0)
    }

    /// Reflect left–right, keeping the rank.
    #[inline]
    pub const fn mirror(self) -> Square {
        Square::new(self.file().mirror(), self.rank())
    }

    /// The square `file_delta` files and `rank_delta` ranks away, if on the board.
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let file = self.file().index() as i8 + file_delta;
        let rank = self.rank().index() as i8 + rank_delta;
        let file = File::from_index(u8::try_from(file).ok()?)?;
        let rank = Rank::from_index(u8::try_from(rank).ok()?)?;
        Some(Square::new(file, rank))
    }

    /// Iterate over all 81 squares in index order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Square::COUNT as u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Square({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::Square;
    use crate::file::File;
    use crate::rank::Rank;

    #[test]
    fn new_and_accessors() {
        let sq = Square::new(File::File1, Rank::RankA);
        assert_eq!(sq.index(), 0);
        assert_eq!(sq.file(), File::File1);
        assert_eq!(sq.rank(), Rank::RankA);

        let sq = Square::new(File::File9, Rank::RankI);
        assert_eq!(sq.index(), 80);
    }

    #[test]
    fn file_rank_roundtrip() {
        for sq in Square::all() {
            assert_eq!(Square::new(sq.file(), sq.rank()), sq);
        }
    }

    #[test]
    fn from_index_bounds() {
        assert!(Square::from_index(80).is_some());
        assert!(Square::from_index(81).is_none());
    }

    #[test]
    fn usi_notation() {
        let sq = Square::from_usi("7g").unwrap();
        assert_eq!(sq.file(), File::File7);
        assert_eq!(sq.rank(), Rank::RankG);
        assert_eq!(format!("{sq}"), "7g");

        assert!(Square::from_usi("0a").is_none());
        assert!(Square::from_usi("1j").is_none());
        assert!(Square::from_usi("1").is_none());
        assert!(Square::from_usi("1aa").is_none());
    }

    #[test]
    fn rotate_maps_corners() {
        let a = Square::from_usi("1a").unwrap();
        let i = Square::from_usi("9i").unwrap();
        assert_eq!(a.rotate(), i);
        assert_eq!(Square::from_usi("7g").unwrap().rotate(), Square::from_usi("3c").unwrap());
        assert_eq!(Square::from_usi("5e").unwrap().rotate(), Square::from_usi("5e").unwrap());
    }

    #[test]
    fn rotate_and_mirror_are_involutions() {
        for sq in Square::all() {
            assert_eq!(sq.rotate().rotate(), sq);
            assert_eq!(sq.mirror().mirror(), sq);
            assert_eq!(sq.mirror().rank(), sq.rank());
        }
    }

    #[test]
    fn offset_stays_on_board() {
        let corner = Square::from_usi("1a").unwrap();
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, -1), None);
        assert_eq!(corner.offset(1, 1), Square::from_usi("2b"));
        assert_eq!(Square::from_usi("9i").unwrap().offset(1, 0), None);
    }

    #[test]
    fn debug_shows_usi() {
        assert_eq!(format!("{:?}", Square::from_usi("5e").unwrap()), "Square(5e)");
    }
}
