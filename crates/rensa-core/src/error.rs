//! Error types for move parsing, index codecs and relation table storage.

use std::path::PathBuf;

use crate::shogi_move::Move;
use crate::square::Square;

/// Errors from parsing USI move text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseMoveError {
    /// The text is not a board move, promotion or drop in USI notation.
    #[error("invalid USI move: \"{text}\"")]
    Invalid {
        /// The text that failed to parse.
        text: String,
    },
}

/// Errors from canonicalizing or indexing a move.
///
/// These signal a codec or canonicalization bug, or a caller handing a move
/// to the wrong codec. They are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// A drop or a promotion was given where a king move was required.
    #[error("{mv} is not a king move")]
    InvalidKingMove {
        /// The offending move.
        mv: Move,
    },
    /// A king move whose source lies on files 6–9 was not mirrored first.
    #[error("king move {mv} is not right-canonical")]
    NotCanonical {
        /// The offending move.
        mv: Move,
    },
    /// The destination is not a single king step away from the source.
    #[error("no king step from {square} by ({file_delta}, {rank_delta})")]
    UnknownOffset {
        /// The king's source square.
        square: Square,
        /// File difference between destination and source.
        file_delta: i8,
        /// Rank difference between destination and source.
        rank_delta: i8,
    },
    /// The move lies outside the enumerated non-king move space.
    #[error("{mv} is not in the piece move space")]
    UnknownPieceMove {
        /// The offending move.
        mv: Move,
    },
    /// A serial index at or beyond the size of its codec.
    #[error("index {index} out of range for codec of size {len}")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of codes in the codec.
        len: usize,
    },
}

/// Errors from relation table storage.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The backing file is too short for the table's dimensions.
    #[error("corrupt table file {}: expected {expected} bytes, found {found}", .path.display())]
    CorruptFile {
        /// The file that was read.
        path: PathBuf,
        /// Minimum number of bytes needed.
        expected: usize,
        /// Number of bytes present.
        found: usize,
    },
    /// A cell address outside the table.
    #[error("cell ({self_index}, {other_index}) out of range for {rows}x{cols} table")]
    IndexOutOfRange {
        /// Row (self move) index.
        self_index: usize,
        /// Column (opponent reply) index.
        other_index: usize,
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
    /// Reading or writing the backing file failed.
    #[error("table I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
