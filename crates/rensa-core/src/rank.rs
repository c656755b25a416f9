//! Shogi board ranks (rows a–i, rank `a` on White's side).

use std::fmt;

/// A rank (row) on the shogi board, from RankA (White's back rank) to RankI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Rank {
    RankA = 0,
    RankB = 1,
    RankC = 2,
    RankD = 3,
    RankE = 4,
    RankF = 5,
    RankG = 6,
    RankH = 7,
    RankI = 8,
}

impl Rank {
    /// Total number of ranks.
    pub const COUNT: usize = 9;

    /// All ranks in index order.
    pub const ALL: [Rank; 9] = [
        Rank::RankA,
        Rank::RankB,
        Rank::RankC,
        Rank::RankD,
        Rank::RankE,
        Rank::RankF,
        Rank::RankG,
        Rank::RankH,
        Rank::RankI,
    ];

    /// Return the index (0..8).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Create a rank from a zero-based index (0 = RankA, 8 = RankI).
    #[inline]
    pub const fn from_index(index: u8) -> Option<Rank> {
        if (index as usize) < Rank::COUNT {
            Some(Rank::ALL[index as usize])
        } else {
            None
        }
    }

    /// Parse a USI rank letter (`'a'..='i'`).
    pub fn from_char(c: char) -> Option<Rank> {
        if !c.is_ascii_lowercase() {
            return None;
        }
        Rank::from_index(c as u8 - b'a')
    }

    /// Whether Black may promote on this rank (ranks a–c).
    #[inline]
    pub const fn is_promotion_zone(self) -> bool {
        self.index() <= Rank::RankC.index()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", (b'a' + self.index() as u8) as char)
    }
}
