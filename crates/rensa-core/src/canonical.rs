//! Move canonicalization: first-player orientation and the right half-board.

use crate::error::CodecError;
use crate::shogi_move::{Move, Source};

/// Rotate a second player's move into first-player orientation.
///
/// First-player moves are returned unchanged.
#[inline]
pub fn to_black(mv: Move, is_second_player: bool) -> Move {
    if is_second_player { mv.rotate() } else { mv }
}

/// Mirror a king move so that its source square lies on files 1–5.
///
/// King moves are never drops; passing one fails with
/// [`CodecError::InvalidKingMove`].
pub fn to_right(mv: Move) -> Result<Move, CodecError> {
    match mv.source() {
        Source::Drop(_) => Err(CodecError::InvalidKingMove { mv }),
        Source::Board(sq) if sq.file().is_right_half() => Ok(mv),
        Source::Board(_) => Ok(mv.mirror()),
    }
}

#[cfg(test)]
mod tests {
    use super::{to_black, to_right};
    use crate::drop_kind::DropKind;
    use crate::error::CodecError;
    use crate::shogi_move::Move;
    use crate::square::Square;

    fn mv(s: &str) -> Move {
        Move::from_usi(s).unwrap()
    }

    #[test]
    fn to_black_only_rotates_second_player() {
        let m = mv("3c3d");
        assert_eq!(to_black(m, false), m);
        assert_eq!(to_black(m, true), mv("7g7f"));
    }

    #[test]
    fn to_black_is_its_own_inverse() {
        for m in [mv("2h2b+"), mv("P*5e"), mv("1i1h")] {
            assert_eq!(to_black(to_black(m, true), true), m);
        }
    }

    #[test]
    fn to_right_keeps_right_half_sources() {
        assert_eq!(to_right(mv("5i4h")), Ok(mv("5i4h")));
        assert_eq!(to_right(mv("1a2b")), Ok(mv("1a2b")));
        // The centre file is already canonical, even when stepping left.
        assert_eq!(to_right(mv("5i6h")), Ok(mv("5i6h")));
    }

    #[test]
    fn to_right_mirrors_left_half_sources() {
        assert_eq!(to_right(mv("6i7h")), Ok(mv("4i3h")));
        assert_eq!(to_right(mv("9a8b")), Ok(mv("1a2b")));
    }

    #[test]
    fn to_right_output_is_always_canonical() {
        for from in Square::all() {
            for (df, dr) in [(-1, -1), (0, -1), (1, 0), (1, 1)] {
                let Some(to) = from.offset(df, dr) else {
                    continue;
                };
                let canon = to_right(Move::new(from, to)).unwrap();
                let src = canon.source().square().unwrap();
                assert!(src.file().is_right_half(), "{canon} not canonical");
            }
        }
    }

    #[test]
    fn to_right_rejects_drops() {
        let drop = Move::new_drop(DropKind::Gold, Square::from_usi("5e").unwrap());
        assert_eq!(to_right(drop), Err(CodecError::InvalidKingMove { mv: drop }));
    }
}
