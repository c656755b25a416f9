//! Side to move: the first player (Black, sente) or the second (White, gote).

use std::fmt;
use std::ops::Not;

/// A shogi side. Black moves first and advances toward rank `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    /// Total number of colors.
    pub const COUNT: usize = 2;

    /// All colors in index order.
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    /// Return the index (0 for Black, 1 for White).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Return the opposite color.
    #[inline]
    pub const fn flip(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Whether this is the second player, whose moves are rotated into
    /// first-player orientation before indexing.
    #[inline]
    pub const fn is_second(self) -> bool {
        matches!(self, Color::White)
    }

    /// The tag used in relation table file names.
    pub const fn file_tag(self) -> &'static str {
        match self {
            Color::Black => "first",
            Color::White => "second",
        }
    }
}

impl Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.flip()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "b"),
            Color::White => write!(f, "w"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn index_values() {
        assert_eq!(Color::Black.index(), 0);
        assert_eq!(Color::White.index(), 1);
    }

    #[test]
    fn flip_roundtrip() {
        assert_eq!(Color::Black.flip(), Color::White);
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(Color::Black.flip().flip(), Color::Black);
    }

    #[test]
    fn only_white_is_second() {
        assert!(!Color::Black.is_second());
        assert!(Color::White.is_second());
    }

    #[test]
    fn file_tags() {
        assert_eq!(Color::Black.file_tag(), "first");
        assert_eq!(Color::White.file_tag(), "second");
    }

    #[test]
    fn display_uses_sfen_letters() {
        assert_eq!(format!("{}", Color::Black), "b");
        assert_eq!(format!("{}", Color::White), "w");
    }
}
