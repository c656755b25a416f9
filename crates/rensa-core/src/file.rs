//! Shogi board files (columns 1–9, counted from Black's right).

use std::fmt;

/// A file (column) on the shogi board, from File1 to File9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum File {
    File1 = 0,
    File2 = 1,
    File3 = 2,
    File4 = 3,
    File5 = 4,
    File6 = 5,
    File7 = 6,
    File8 = 7,
    File9 = 8,
}

impl File {
    /// Total number of files.
    pub const COUNT: usize = 9;

    /// All files in index order.
    pub const ALL: [File; 9] = [
        File::File1,
        File::File2,
        File::File3,
        File::File4,
        File::File5,
        File::File6,
        File::File7,
        File::File8,
        File::File9,
    ];

    /// Return the index (0..8).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Create a file from a zero-based index (0 = File1, 8 = File9).
    #[inline]
    pub const fn from_index(index: u8) -> Option<File> {
        if (index as usize) < File::COUNT {
            Some(File::ALL[index as usize])
        } else {
            None
        }
    }

    /// Parse a USI file digit (`'1'..='9'`).
    pub fn from_char(c: char) -> Option<File> {
        let digit = c.to_digit(10)?;
        if digit == 0 {
            return None;
        }
        File::from_index(digit as u8 - 1)
    }

    /// Reflect left–right across the centre file.
    #[inline]
    pub const fn mirror(self) -> File {
        File::ALL[File::COUNT - 1 - self.index()]
    }

    /// Whether the file lies on the right half (files 1–5), the canonical
    /// half for king moves.
    #[inline]
    pub const fn is_right_half(self) -> bool {
        self.index() <= File::File5.index()
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index() + 1)
    }
}
