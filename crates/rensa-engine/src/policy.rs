//! Policy summaries: how many of a move's opponent replies its tables accept.

use rensa_core::{Color, EvaluationSet, Move, MoveClass, RelationKind};

use crate::error::EngineError;
use crate::position::Position;

/// Largest policy score.
pub const MAX_POLICY: u16 = 1000;

/// Per-mille share of `positive` in `total`, rounded half up.
///
/// `None` when there is nothing to share.
#[inline]
pub fn policy_from_counts(positive: usize, total: usize) -> Option<u16> {
    if total == 0 {
        return None;
    }
    let positive = positive.min(total);
    Some(((positive * MAX_POLICY as usize + total / 2) / total) as u16)
}

/// A candidate move and the table cells its opponent replies address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRelations {
    pub mv: Move,
    /// Side playing `mv`; its evaluation set holds the relations.
    pub color: Color,
    pub class: MoveClass,
    /// Canonical index of `mv` (table row).
    pub self_index: usize,
    /// Canonical indices of the opponent's king replies.
    pub king_replies: Vec<usize>,
    /// Canonical indices of the opponent's other replies.
    pub piece_replies: Vec<usize>,
}

impl MoveRelations {
    /// The table relating this move to replies of class `reply`.
    #[inline]
    pub fn kind_for(&self, reply: MoveClass) -> RelationKind {
        RelationKind::new(self.class, reply)
    }

    /// Reply indices of class `reply`.
    pub fn replies(&self, reply: MoveClass) -> &[usize] {
        match reply {
            MoveClass::King => &self.king_replies,
            MoveClass::Piece => &self.piece_replies,
        }
    }

    /// Number of opponent replies.
    pub fn total(&self) -> usize {
        self.king_replies.len() + self.piece_replies.len()
    }
}

/// Positive and total reply counts for one move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub positive: usize,
    pub total: usize,
}

impl Summary {
    /// Per-mille policy, or `None` for a move without replies.
    #[inline]
    pub fn policy(&self) -> Option<u16> {
        policy_from_counts(self.positive, self.total)
    }
}

/// Collect the table cells `mv` relates to in `position`.
///
/// The move is played and undone; the position must come back unchanged.
pub fn relations<P: Position>(position: &mut P, mv: Move) -> Result<MoveRelations, EngineError> {
    let color = position.side_to_move();
    let class = MoveClass::from_is_king(position.is_king_move(mv));
    let self_index = class.index_of(mv, color)?;

    let before = position.sfen();
    position.push(mv);
    let replies = reply_indices(position, color.flip());
    position.pop();
    let after = position.sfen();
    if after != before {
        return Err(EngineError::RestoreMismatch {
            expected: before,
            found: after,
        });
    }

    let (king_replies, piece_replies) = replies?;
    Ok(MoveRelations {
        mv,
        color,
        class,
        self_index,
        king_replies,
        piece_replies,
    })
}

fn reply_indices<P: Position>(
    position: &P,
    opponent: Color,
) -> Result<(Vec<usize>, Vec<usize>), EngineError> {
    let mut king = Vec::new();
    let mut piece = Vec::new();
    for reply in position.legal_moves() {
        if position.is_king_move(reply) {
            king.push(MoveClass::King.index_of(reply, opponent)?);
        } else {
            piece.push(MoveClass::Piece.index_of(reply, opponent)?);
        }
    }
    Ok((king, piece))
}

/// Count the replies whose relation bit is set. Reads only.
pub fn summarize(set: &EvaluationSet, relations: &MoveRelations) -> Result<Summary, EngineError> {
    let mut positive = 0;
    for reply in [MoveClass::King, MoveClass::Piece] {
        let kind = relations.kind_for(reply);
        for &other in relations.replies(reply) {
            if set.get(kind, relations.self_index, other)? {
                positive += 1;
            }
        }
    }
    Ok(Summary {
        positive,
        total: relations.total(),
    })
}

#[cfg(test)]
mod tests {
    use rensa_core::{Color, EvaluationSet, Move, MoveClass, RelationKind};

    use super::{Summary, policy_from_counts, relations, summarize};
    use crate::fixture::ToyPosition;
    use crate::position::Position;

    fn mv(s: &str) -> Move {
        Move::from_usi(s).unwrap()
    }

    #[test]
    fn policy_rounds_half_up() {
        assert_eq!(policy_from_counts(0, 0), None);
        assert_eq!(policy_from_counts(0, 7), Some(0));
        assert_eq!(policy_from_counts(7, 7), Some(1000));
        assert_eq!(policy_from_counts(1, 3), Some(333));
        assert_eq!(policy_from_counts(2, 3), Some(667));
        // 1/2000 = 0.5 per mille rounds up.
        assert_eq!(policy_from_counts(1, 2000), Some(1));
    }

    #[test]
    fn policy_is_monotone_in_positive_count() {
        for total in 1..=64 {
            let mut last = 0;
            for positive in 0..=total {
                let policy = policy_from_counts(positive, total).unwrap();
                assert!(policy >= last, "{positive}/{total} decreased policy");
                last = policy;
            }
            assert_eq!(last, 1000);
        }
    }

    #[test]
    fn relations_split_replies_by_class() {
        let mut position = ToyPosition::startpos();
        let before = position.sfen();
        let rel = relations(&mut position, mv("5i4h")).unwrap();

        assert_eq!(position.sfen(), before, "position must be restored");
        assert_eq!(rel.color, Color::Black);
        assert_eq!(rel.class, MoveClass::King);
        assert_eq!(rel.kind_for(MoveClass::Piece), RelationKind::Kp);

        let replies = {
            let mut after = position.clone();
            after.push(mv("5i4h"));
            after.legal_moves()
        };
        assert_eq!(rel.total(), replies.len());
        assert!(!rel.king_replies.is_empty());
        assert!(!rel.piece_replies.is_empty());
    }

    #[test]
    fn drops_are_piece_moves() {
        let mut position = ToyPosition::startpos();
        let rel = relations(&mut position, mv("G*5e")).unwrap();
        assert_eq!(rel.class, MoveClass::Piece);
        assert_eq!(rel.kind_for(MoveClass::King), RelationKind::Pk);
    }

    #[test]
    fn summary_counts_set_bits() {
        let mut position = ToyPosition::startpos();
        let rel = relations(&mut position, mv("5i5h")).unwrap();
        let mut set = EvaluationSet::new_zeroed(Color::Black);
        assert_eq!(
            summarize(&set, &rel).unwrap(),
            Summary {
                positive: 0,
                total: rel.total()
            }
        );

        let kind = rel.kind_for(MoveClass::Piece);
        let first = rel.piece_replies[0];
        set.set(kind, rel.self_index, first, true).unwrap();
        let summary = summarize(&set, &rel).unwrap();
        let expected = rel.piece_replies.iter().filter(|&&o| o == first).count();
        assert_eq!(summary.positive, expected);
    }

    #[test]
    fn second_player_relations_use_black_orientation() {
        // After Black's 5i5h, White's 5a5b mirrors it exactly.
        let mut black = ToyPosition::startpos();
        let black_rel = relations(&mut black, mv("5i5h")).unwrap();

        let mut white = ToyPosition::startpos();
        white.push(mv("5i5h"));
        let white_rel = relations(&mut white, mv("5a5b")).unwrap();

        assert_eq!(white_rel.color, Color::White);
        assert_eq!(white_rel.self_index, black_rel.self_index);
    }
}
