//! Pieces that can be dropped from hand.

use std::fmt;

use crate::rank::Rank;

/// A piece kind that can be dropped from hand. Kings never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum DropKind {
    Pawn = 0,
    Lance = 1,
    Knight = 2,
    Silver = 3,
    Gold = 4,
    Bishop = 5,
    Rook = 6,
}

impl DropKind {
    /// Total number of droppable kinds.
    pub const COUNT: usize = 7;

    /// All droppable kinds in index order.
    pub const ALL: [DropKind; 7] = [
        DropKind::Pawn,
        DropKind::Lance,
        DropKind::Knight,
        DropKind::Silver,
        DropKind::Gold,
        DropKind::Bishop,
        DropKind::Rook,
    ];

    /// Return the index (0..6).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Create a drop kind from a zero-based index.
    #[inline]
    pub const fn from_index(index: u8) -> Option<DropKind> {
        if (index as usize) < DropKind::COUNT {
            Some(DropKind::ALL[index as usize])
        } else {
            None
        }
    }

    /// Return the USI letter for this piece (uppercase, as written in drops).
    #[inline]
    pub const fn usi_char(self) -> char {
        match self {
            DropKind::Pawn => 'P',
            DropKind::Lance => 'L',
            DropKind::Knight => 'N',
            DropKind::Silver => 'S',
            DropKind::Gold => 'G',
            DropKind::Bishop => 'B',
            DropKind::Rook => 'R',
        }
    }

    /// Parse a USI drop letter (uppercase only).
    pub fn from_usi_char(c: char) -> Option<DropKind> {
        DropKind::ALL.into_iter().find(|kind| kind.usi_char() == c)
    }

    /// Whether Black may drop this piece on `rank`.
    ///
    /// Pawns and lances would have no move on rank `a`; knights none on
    /// ranks `a` and `b`.
    #[inline]
    pub const fn can_drop_on(self, rank: Rank) -> bool {
        match self {
            DropKind::Pawn | DropKind::Lance => rank.index() >= Rank::RankB.index(),
            DropKind::Knight => rank.index() >= Rank::RankC.index(),
            _ => true,
        }
    }
}

impl fmt::Display for DropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.usi_char())
    }
}
