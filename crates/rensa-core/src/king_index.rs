//! Dense serial numbers for right-canonical king moves.
//!
//! Only sources on files 1–5 are enumerated (the other half is reached by
//! mirroring, see [`to_right`](crate::canonical::to_right)), and only steps
//! that stay on the board get a code, so the index space has no holes.

use std::sync::OnceLock;

use crate::error::CodecError;
use crate::shogi_move::{Move, Source};
use crate::square::Square;

/// The eight king steps as `(file_delta, rank_delta)`, in code order.
const STEPS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Marks a (square, step) pair without a code.
const NONE: u16 = u16::MAX;

struct KingTable {
    /// `[source square][step slot]` -> serial index.
    codes: [[u16; 8]; Square::COUNT],
    /// Serial index -> canonical move.
    moves: Vec<Move>,
}

static KING_TABLE: OnceLock<KingTable> = OnceLock::new();

fn king_table() -> &'static KingTable {
    KING_TABLE.get_or_init(|| {
        let mut codes = [[NONE; 8]; Square::COUNT];
        let mut moves = Vec::with_capacity(KingIndex::COUNT);
        for from in Square::all().filter(|sq| sq.file().is_right_half()) {
            for (slot, &(df, dr)) in STEPS.iter().enumerate() {
                if let Some(to) = from.offset(df, dr) {
                    codes[from.index()][slot] = moves.len() as u16;
                    moves.push(Move::new(from, to));
                }
            }
        }
        debug_assert_eq!(moves.len(), KingIndex::COUNT);
        KingTable { codes, moves }
    })
}

fn step_slot(file_delta: i8, rank_delta: i8) -> Option<usize> {
    STEPS.iter().position(|&step| step == (file_delta, rank_delta))
}

/// Codec between right-canonical king moves and `[0, KingIndex::COUNT)`.
pub struct KingIndex;

impl KingIndex {
    /// Number of king move codes: 45 right-half squares times their on-board steps.
    pub const COUNT: usize = 305;

    /// Serial number of a right-canonical king move.
    pub fn encode(mv: Move) -> Result<usize, CodecError> {
        let from = match mv.source() {
            Source::Board(sq) if !mv.is_promotion() => sq,
            _ => return Err(CodecError::InvalidKingMove { mv }),
        };
        if !from.file().is_right_half() {
            return Err(CodecError::NotCanonical { mv });
        }

        let to = mv.dest();
        let file_delta = to.file().index() as i8 - from.file().index() as i8;
        let rank_delta = to.rank().index() as i8 - from.rank().index() as i8;
        let code = step_slot(file_delta, rank_delta)
            .map(|slot| king_table().codes[from.index()][slot])
            .filter(|&code| code != NONE)
            .ok_or(CodecError::UnknownOffset {
                square: from,
                file_delta,
                rank_delta,
            })?;
        Ok(code as usize)
    }

    /// The canonical king move with serial number `index`.
    pub fn decode(index: usize) -> Result<Move, CodecError> {
        king_table()
            .moves
            .get(index)
            .copied()
            .ok_or(CodecError::IndexOutOfRange {
                index,
                len: KingIndex::COUNT,
            })
    }
}
