//! Dense serial numbers for non-king moves in first-player orientation.
//!
//! The board part covers every queen-ray destination and both forward knight
//! jumps from every square; that geometry is a superset of what any non-king
//! piece, promoted or not, can do. A promoted twin follows each board move
//! whose source or destination lies in ranks a–c. Drops come last and skip
//! the ranks where the dropped piece could never move again.

use std::sync::OnceLock;

use crate::drop_kind::DropKind;
use crate::error::CodecError;
use crate::shogi_move::{Move, Source};
use crate::square::Square;

/// Sliding directions as `(file_delta, rank_delta)`.
const RAYS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Knight jumps toward rank a.
const KNIGHT_JUMPS: [(i8, i8); 2] = [(-1, -2), (1, -2)];

const NONE: u16 = u16::MAX;

struct PieceTable {
    /// `((source * 81 + dest) * 2 + promoted)` -> serial index.
    board: Vec<u16>,
    /// `(kind * 81 + dest)` -> serial index.
    drops: Vec<u16>,
    moves: Vec<Move>,
}

impl PieceTable {
    fn board_slot(from: Square, to: Square, promoted: bool) -> usize {
        (from.index() * Square::COUNT + to.index()) * 2 + promoted as usize
    }

    fn drop_slot(kind: DropKind, to: Square) -> usize {
        kind.index() * Square::COUNT + to.index()
    }

    fn build() -> PieceTable {
        let mut table = PieceTable {
            board: vec![NONE; Square::COUNT * Square::COUNT * 2],
            drops: vec![NONE; DropKind::COUNT * Square::COUNT],
            moves: Vec::with_capacity(PieceIndex::COUNT),
        };

        for from in Square::all() {
            for to in destinations(from) {
                table.push_board(from, to, false);
                if from.rank().is_promotion_zone() || to.rank().is_promotion_zone() {
                    table.push_board(from, to, true);
                }
            }
        }

        for kind in DropKind::ALL {
            for to in Square::all().filter(|sq| kind.can_drop_on(sq.rank())) {
                table.drops[PieceTable::drop_slot(kind, to)] = table.moves.len() as u16;
                table.moves.push(Move::new_drop(kind, to));
            }
        }

        debug_assert_eq!(table.moves.len(), PieceIndex::COUNT);
        table
    }

    fn push_board(&mut self, from: Square, to: Square, promoted: bool) {
        self.board[PieceTable::board_slot(from, to, promoted)] = self.moves.len() as u16;
        self.moves.push(Move::from_parts(Source::Board(from), to, promoted));
    }
}

/// Every square reachable from `from` along a ray or by a forward knight jump.
fn destinations(from: Square) -> Vec<Square> {
    let mut out = Vec::new();
    for &(df, dr) in &RAYS {
        let mut distance = 1;
        while let Some(to) = from.offset(df * distance, dr * distance) {
            out.push(to);
            distance += 1;
        }
    }
    out.extend(
        KNIGHT_JUMPS
            .iter()
            .filter_map(|&(df, dr)| from.offset(df, dr)),
    );
    out
}

static PIECE_TABLE: OnceLock<PieceTable> = OnceLock::new();

fn piece_table() -> &'static PieceTable {
    PIECE_TABLE.get_or_init(PieceTable::build)
}

/// Codec between first-player non-king moves and `[0, PieceIndex::COUNT)`.
pub struct PieceIndex;

impl PieceIndex {
    /// Number of piece move codes: 3282 board moves (with promoted twins)
    /// plus 531 drops.
    pub const COUNT: usize = 3813;

    /// Serial number of a non-king move already rotated into first-player
    /// orientation.
    pub fn encode(mv: Move) -> Result<usize, CodecError> {
        let table = piece_table();
        let code = match mv.source() {
            Source::Board(from) => {
                table.board[PieceTable::board_slot(from, mv.dest(), mv.is_promotion())]
            }
            Source::Drop(kind) => table.drops[PieceTable::drop_slot(kind, mv.dest())],
        };
        if code == NONE {
            return Err(CodecError::UnknownPieceMove { mv });
        }
        Ok(code as usize)
    }

    /// The move with serial number `index`.
    pub fn decode(index: usize) -> Result<Move, CodecError> {
        piece_table()
            .moves
            .get(index)
            .copied()
            .ok_or(CodecError::IndexOutOfRange {
                index,
                len: PieceIndex::COUNT,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::PieceIndex;
    use crate::canonical::to_black;
    use crate::drop_kind::DropKind;
    use crate::error::CodecError;
    use crate::shogi_move::Move;
    use crate::square::Square;

    fn mv(s: &str) -> Move {
        Move::from_usi(s).unwrap()
    }

    #[test]
    fn decode_then_encode_is_identity() {
        for code in 0..PieceIndex::COUNT {
            let m = PieceIndex::decode(code).unwrap();
            assert_eq!(PieceIndex::encode(m), Ok(code), "mismatch for {m}");
        }
    }

    #[test]
    fn decode_past_the_end_fails() {
        assert_eq!(
            PieceIndex::decode(PieceIndex::COUNT),
            Err(CodecError::IndexOutOfRange {
                index: PieceIndex::COUNT,
                len: PieceIndex::COUNT
            })
        );
    }

    #[test]
    fn every_board_move_shape_roundtrips() {
        // Slides of every length, steps, knight jumps and zone promotions.
        for text in ["7g7f", "2h2b+", "8h2b", "8h2b+", "1i1a", "1a9i", "2i3g", "8c7a+", "4a5b+"] {
            let m = mv(text);
            let code = PieceIndex::encode(m).unwrap();
            assert_eq!(PieceIndex::decode(code), Ok(m), "{text}");
        }
    }

    #[test]
    fn every_legal_drop_roundtrips() {
        let mut drops = 0;
        for kind in DropKind::ALL {
            for to in Square::all().filter(|sq| kind.can_drop_on(sq.rank())) {
                let m = Move::new_drop(kind, to);
                assert_eq!(PieceIndex::decode(PieceIndex::encode(m).unwrap()), Ok(m));
                drops += 1;
            }
        }
        assert_eq!(drops, 531);
    }

    #[test]
    fn second_player_moves_encode_after_rotation() {
        // White's knight 8a7c is Black's 2i3g.
        let white = mv("8a7c");
        assert!(PieceIndex::encode(white).is_err());
        let code = PieceIndex::encode(to_black(white, true)).unwrap();
        assert_eq!(PieceIndex::decode(code), Ok(mv("2i3g")));
    }

    #[test]
    fn rejects_moves_outside_the_space() {
        for text in ["5e4g", "5e3d", "7g7f+", "P*5a", "N*5b", "1a3b"] {
            let m = mv(text);
            assert_eq!(
                PieceIndex::encode(m),
                Err(CodecError::UnknownPieceMove { mv: m }),
                "{text} should not encode"
            );
        }
    }
}
