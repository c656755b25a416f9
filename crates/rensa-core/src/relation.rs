//! Move classes and the four relation kinds they combine into.

use std::fmt;

use crate::canonical::{to_black, to_right};
use crate::color::Color;
use crate::error::CodecError;
use crate::king_index::KingIndex;
use crate::piece_index::PieceIndex;
use crate::shogi_move::Move;

/// Whether a move is made by the king or by any other piece (drops included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveClass {
    King,
    Piece,
}

impl MoveClass {
    /// Classify from the board's king-move predicate.
    #[inline]
    pub const fn from_is_king(is_king: bool) -> MoveClass {
        if is_king { MoveClass::King } else { MoveClass::Piece }
    }

    /// Size of this class's index space.
    #[inline]
    pub const fn index_len(self) -> usize {
        match self {
            MoveClass::King => KingIndex::COUNT,
            MoveClass::Piece => PieceIndex::COUNT,
        }
    }

    /// Canonicalize a move played by `color` and return its serial index.
    ///
    /// Every move is rotated into first-player orientation; king moves are
    /// additionally mirrored onto files 1–5.
    pub fn index_of(self, mv: Move, color: Color) -> Result<usize, CodecError> {
        let black = to_black(mv, color.is_second());
        match self {
            MoveClass::King => KingIndex::encode(to_right(black)?),
            MoveClass::Piece => PieceIndex::encode(black),
        }
    }

    /// The canonical move with serial number `index`.
    pub fn decode(self, index: usize) -> Result<Move, CodecError> {
        match self {
            MoveClass::King => KingIndex::decode(index),
            MoveClass::Piece => PieceIndex::decode(index),
        }
    }
}

/// One of the four relation tables: own move class × opponent reply class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    /// Own king move against an opponent king reply.
    Kk,
    /// Own king move against an opponent piece reply.
    Kp,
    /// Own piece move against an opponent king reply.
    Pk,
    /// Own piece move against an opponent piece reply.
    Pp,
}

impl RelationKind {
    /// All relation kinds in file order.
    pub const ALL: [RelationKind; 4] = [
        RelationKind::Kk,
        RelationKind::Kp,
        RelationKind::Pk,
        RelationKind::Pp,
    ];

    /// Position of this kind in [`RelationKind::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Select the table relating `own` moves to `reply` moves.
    pub const fn new(own: MoveClass, reply: MoveClass) -> RelationKind {
        match (own, reply) {
            (MoveClass::King, MoveClass::King) => RelationKind::Kk,
            (MoveClass::King, MoveClass::Piece) => RelationKind::Kp,
            (MoveClass::Piece, MoveClass::King) => RelationKind::Pk,
            (MoveClass::Piece, MoveClass::Piece) => RelationKind::Pp,
        }
    }

    /// Class of the side-to-move's move (table rows).
    pub const fn own(self) -> MoveClass {
        match self {
            RelationKind::Kk | RelationKind::Kp => MoveClass::King,
            RelationKind::Pk | RelationKind::Pp => MoveClass::Piece,
        }
    }

    /// Class of the opponent's reply (table columns).
    pub const fn reply(self) -> MoveClass {
        match self {
            RelationKind::Kk | RelationKind::Pk => MoveClass::King,
            RelationKind::Kp | RelationKind::Pp => MoveClass::Piece,
        }
    }

    /// `(rows, cols)` of this table.
    pub const fn dims(self) -> (usize, usize) {
        (self.own().index_len(), self.reply().index_len())
    }

    /// Tag used in table file names.
    pub const fn tag(self) -> &'static str {
        match self {
            RelationKind::Kk => "kk",
            RelationKind::Kp => "kp",
            RelationKind::Pk => "pk",
            RelationKind::Pp => "pp",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
