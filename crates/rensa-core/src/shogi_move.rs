//! Shogi move representation, bit-packed into a u16.

use std::fmt;
use std::str::FromStr;

use crate::drop_kind::DropKind;
use crate::error::ParseMoveError;
use crate::square::Square;

// Private bit-field constants.
const SRC_MASK: u16 = 0x007F;
const DST_MASK: u16 = 0x3F80;
const PROMO_BIT: u16 = 0x4000;
const DST_SHIFT: u32 = 7;

/// Where a move starts: a board square or a piece in hand.
///
/// Both share one index domain: squares are `0..81`, drops `81..88`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Board(Square),
    Drop(DropKind),
}

impl Source {
    /// Size of the combined square + drop domain.
    pub const COUNT: usize = Square::COUNT + DropKind::COUNT;

    /// Return the index in `0..88`.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Source::Board(sq) => sq.index(),
            Source::Drop(kind) => Square::COUNT + kind.index(),
        }
    }

    /// Create a source location from its index, returning `None` if out of range.
    pub const fn from_index(index: u8) -> Option<Source> {
        if (index as usize) < Square::COUNT {
            Some(Source::Board(Square::from_index_unchecked(index)))
        } else {
            match DropKind::from_index(index - Square::COUNT as u8) {
                Some(kind) => Some(Source::Drop(kind)),
                None => None,
            }
        }
    }

    /// Return `true` if the piece comes from hand.
    #[inline]
    pub const fn is_drop(self) -> bool {
        matches!(self, Source::Drop(_))
    }

    /// The board square, if this is not a drop.
    #[inline]
    pub const fn square(self) -> Option<Square> {
        match self {
            Source::Board(sq) => Some(sq),
            Source::Drop(_) => None,
        }
    }
}

/// A shogi move encoded in 16 bits.
///
/// ```text
/// bits  0-6:  source location    (0-80 squares, 81-87 drops)
/// bits  7-13: destination square (0-80)
/// bit  14:    promoted
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move(u16);

impl Move {
    /// Create an unpromoted board move.
    pub const fn new(source: Square, dest: Square) -> Move {
        Move((source.index() as u16) | ((dest.index() as u16) << DST_SHIFT))
    }

    /// Create a promoting board move.
    pub const fn new_promotion(source: Square, dest: Square) -> Move {
        Move(Move::new(source, dest).0 | PROMO_BIT)
    }

    /// Create a drop from hand.
    pub const fn new_drop(kind: DropKind, dest: Square) -> Move {
        Move(Source::Drop(kind).index() as u16 | ((dest.index() as u16) << DST_SHIFT))
    }

    /// Assemble a move from its parts. Drops never carry the promotion flag.
    pub const fn from_parts(source: Source, dest: Square, promoted: bool) -> Move {
        let base = Move(source.index() as u16 | ((dest.index() as u16) << DST_SHIFT));
        if promoted && !source.is_drop() {
            Move(base.0 | PROMO_BIT)
        } else {
            base
        }
    }

    /// Extract the source location.
    pub const fn source(self) -> Source {
        match Source::from_index((self.0 & SRC_MASK) as u8) {
            Some(source) => source,
            None => panic!("corrupt move source"),
        }
    }

    /// Extract the destination square.
    pub const fn dest(self) -> Square {
        Square::from_index_unchecked(((self.0 & DST_MASK) >> DST_SHIFT) as u8)
    }

    /// Return `true` if this move promotes the moved piece.
    pub const fn is_promotion(self) -> bool {
        self.0 & PROMO_BIT != 0
    }

    /// Return `true` if this is a drop from hand.
    pub const fn is_drop(self) -> bool {
        (self.0 & SRC_MASK) as usize >= Square::COUNT
    }

    /// The dropped piece, if this is a drop.
    pub const fn drop_kind(self) -> Option<DropKind> {
        match self.source() {
            Source::Drop(kind) => Some(kind),
            Source::Board(_) => None,
        }
    }

    /// Rotate by 180°: a second-player move seen from the first player.
    pub const fn rotate(self) -> Move {
        let source = match self.source() {
            Source::Board(sq) => Source::Board(sq.rotate()),
            drop => drop,
        };
        Move::from_parts(source, self.dest().rotate(), self.is_promotion())
    }

    /// Reflect left–right.
    pub const fn mirror(self) -> Move {
        let source = match self.source() {
            Source::Board(sq) => Source::Board(sq.mirror()),
            drop => drop,
        };
        Move::from_parts(source, self.dest().mirror(), self.is_promotion())
    }

    /// Parse USI move notation: `7g7f`, `8h2b+` or `P*5e`.
    pub fn from_usi(s: &str) -> Result<Move, ParseMoveError> {
        let invalid = || ParseMoveError::Invalid {
            text: s.to_string(),
        };
        if !s.is_ascii() {
            return Err(invalid());
        }

        if let Some((piece, dest)) = s.split_once('*') {
            let mut chars = piece.chars();
            let kind = match (chars.next(), chars.next()) {
                (Some(c), None) => DropKind::from_usi_char(c).ok_or_else(invalid)?,
                _ => return Err(invalid()),
            };
            let dest = Square::from_usi(dest).ok_or_else(invalid)?;
            return Ok(Move::new_drop(kind, dest));
        }

        let (body, promoted) = match s.strip_suffix('+') {
            Some(body) => (body, true),
            None => (s, false),
        };
        if body.len() != 4 {
            return Err(invalid());
        }
        let source = Square::from_usi(&body[..2]).ok_or_else(invalid)?;
        let dest = Square::from_usi(&body[2..]).ok_or_else(invalid)?;
        if source == dest {
            return Err(invalid());
        }
        Ok(Move::from_parts(Source::Board(source), dest, promoted))
    }

    /// Return the USI string representation.
    pub fn to_usi(self) -> String {
        self.to_string()
    }
}

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::from_usi(s)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source() {
            Source::Drop(kind) => write!(f, "{}*{}", kind, self.dest()),
            Source::Board(sq) if self.is_promotion() => write!(f, "{}{}+", sq, self.dest()),
            Source::Board(sq) => write!(f, "{}{}", sq, self.dest()),
        }
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({})", self)
    }
}
