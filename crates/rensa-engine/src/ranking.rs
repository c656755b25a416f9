//! Tiered move ranking and random selection within the best tier.

use rand::Rng;
use rand::seq::SliceRandom;

use rensa_core::{EvaluationSet, Move};

use crate::config::EmptyReplyPolicy;
use crate::error::EngineError;
use crate::policy::{MAX_POLICY, Summary, relations, summarize};
use crate::position::Position;

/// Tier of a policy score among `resolution` tiers; 0 is best.
///
/// A policy of 1000 lands in tier 0 and a policy of 0 in tier
/// `resolution - 1`.
#[inline]
pub fn tier_of(policy: u16, resolution: usize) -> usize {
    let policy = policy.min(MAX_POLICY) as usize;
    (MAX_POLICY as usize - policy) * resolution / (MAX_POLICY as usize + 1)
}

/// A legal move with its relation summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedMove {
    pub mv: Move,
    pub summary: Summary,
    /// Score used for bucketing; neutral for moves without replies.
    pub policy: u16,
}

/// Legal moves bucketed into tiers, best tier first.
///
/// Within a tier, moves keep the order the board generated them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking {
    tiers: Vec<Vec<RankedMove>>,
    /// Moves without replies left out under [`EmptyReplyPolicy::Exclude`].
    excluded: Vec<Move>,
}

impl Ranking {
    /// All tiers, including empty ones.
    pub fn tiers(&self) -> &[Vec<RankedMove>] {
        &self.tiers
    }

    /// Number of tiers.
    pub fn resolution(&self) -> usize {
        self.tiers.len()
    }

    /// Moves that were not ranked.
    pub fn excluded(&self) -> &[Move] {
        &self.excluded
    }

    /// The first non-empty tier and its index.
    pub fn best_tier(&self) -> Option<(usize, &[RankedMove])> {
        self.tiers
            .iter()
            .enumerate()
            .find(|(_, tier)| !tier.is_empty())
            .map(|(i, tier)| (i, tier.as_slice()))
    }

    /// The last non-empty tier and its index.
    pub fn worst_tier(&self) -> Option<(usize, &[RankedMove])> {
        self.tiers
            .iter()
            .enumerate()
            .rev()
            .find(|(_, tier)| !tier.is_empty())
            .map(|(i, tier)| (i, tier.as_slice()))
    }

    /// Tier holding `mv`, if it was ranked.
    pub fn tier_of_move(&self, mv: Move) -> Option<usize> {
        self.tiers
            .iter()
            .position(|tier| tier.iter().any(|ranked| ranked.mv == mv))
    }

    /// Ranked moves, best tier first.
    pub fn iter(&self) -> impl Iterator<Item = &RankedMove> {
        self.tiers.iter().flatten()
    }

    /// Number of ranked moves.
    pub fn len(&self) -> usize {
        self.tiers.iter().map(Vec::len).sum()
    }

    /// Return `true` if no move was ranked.
    pub fn is_empty(&self) -> bool {
        self.tiers.iter().all(Vec::is_empty)
    }
}

/// Rank every legal move of the side to move using `set`.
///
/// `set` must be the side-to-move's tables. Bucketing depends only on the
/// table contents and the legal move order.
pub fn rank_all<P: Position>(
    set: &EvaluationSet,
    position: &mut P,
    resolution: usize,
    empty_reply: EmptyReplyPolicy,
) -> Result<Ranking, EngineError> {
    let resolution = resolution.max(1);
    let mut ranking = Ranking {
        tiers: vec![Vec::new(); resolution],
        excluded: Vec::new(),
    };

    for mv in position.legal_moves() {
        let rel = relations(position, mv)?;
        let summary = summarize(set, &rel)?;
        let policy = match (summary.policy(), empty_reply) {
            (Some(policy), _) => policy,
            (None, EmptyReplyPolicy::Neutral) => EmptyReplyPolicy::NEUTRAL_POLICY,
            (None, EmptyReplyPolicy::Exclude) => {
                ranking.excluded.push(mv);
                continue;
            }
        };
        ranking.tiers[tier_of(policy, resolution)].push(RankedMove {
            mv,
            summary,
            policy,
        });
    }

    Ok(ranking)
}

/// Pick a move uniformly at random from the best non-empty tier.
///
/// When every move was excluded, one of those is picked instead. `None`
/// means there was no legal move at all.
pub fn select_best<R: Rng + ?Sized>(ranking: &Ranking, rng: &mut R) -> Option<Move> {
    match ranking.best_tier() {
        Some((_, tier)) => tier.choose(rng).map(|ranked| ranked.mv),
        None => ranking.excluded.choose(rng).copied(),
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rensa_core::{Color, EvaluationSet, Move, MoveClass};

    use super::{rank_all, select_best, tier_of};
    use crate::config::EmptyReplyPolicy;
    use crate::fixture::ToyPosition;
    use crate::policy::relations;
    use crate::position::Position;

    fn mv(s: &str) -> Move {
        Move::from_usi(s).unwrap()
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(tier_of(1000, 10), 0);
        assert_eq!(tier_of(901, 10), 0);
        assert_eq!(tier_of(900, 10), 0);
        assert_eq!(tier_of(899, 10), 1);
        assert_eq!(tier_of(500, 10), 4);
        assert_eq!(tier_of(0, 10), 9);
        assert_eq!(tier_of(0, 1), 0);
        assert_eq!(tier_of(0, 1000), 999);
    }

    #[test]
    fn tiers_are_monotone_and_in_range() {
        for resolution in [1, 2, 3, 7, 10, 1000] {
            let mut last = 0;
            for policy in (0..=1000).rev() {
                let tier = tier_of(policy, resolution);
                assert!(tier < resolution, "policy {policy} out of range");
                assert!(tier >= last, "tier decreased at policy {policy}");
                last = tier;
            }
        }
    }

    fn all_ones_for(set: &mut EvaluationSet, position: &mut ToyPosition, target: Move) {
        let rel = relations(position, target).unwrap();
        for reply in [MoveClass::King, MoveClass::Piece] {
            for &other in rel.replies(reply) {
                set.set(rel.kind_for(reply), rel.self_index, other, true).unwrap();
            }
        }
    }

    #[test]
    fn preferred_move_is_alone_in_the_best_tier() {
        let mut position = ToyPosition::startpos();
        let mut set = EvaluationSet::new_zeroed(Color::Black);
        all_ones_for(&mut set, &mut position, mv("G*5e"));

        let ranking = rank_all(&set, &mut position, 10, EmptyReplyPolicy::Neutral).unwrap();
        let (index, best) = ranking.best_tier().unwrap();
        assert_eq!(index, 0);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].mv, mv("G*5e"));
        assert_eq!(best[0].policy, 1000);

        let (worst, rest) = ranking.worst_tier().unwrap();
        assert_eq!(worst, 9);
        assert_eq!(rest.len(), ranking.len() - 1);
        assert_eq!(ranking.len(), position.legal_moves().len());

        let order: Vec<Move> = ranking.iter().map(|ranked| ranked.mv).collect();
        assert_eq!(order.first(), Some(&mv("G*5e")), "best tier comes first");
        assert_eq!(order.len(), ranking.len());

        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..10 {
            assert_eq!(select_best(&ranking, &mut rng), Some(mv("G*5e")));
        }
    }

    #[test]
    fn ranking_is_deterministic() {
        let mut position = ToyPosition::startpos();
        let mut rng = StdRng::seed_from_u64(5);
        let set = EvaluationSet::new_random(Color::Black, &mut rng);
        let first = rank_all(&set, &mut position, 10, EmptyReplyPolicy::Neutral).unwrap();
        let second = rank_all(&set, &mut position, 10, EmptyReplyPolicy::Neutral).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn selection_stays_in_the_best_tier() {
        let mut position = ToyPosition::startpos();
        let mut rng = StdRng::seed_from_u64(9);
        let set = EvaluationSet::new_random(Color::Black, &mut rng);
        let ranking = rank_all(&set, &mut position, 3, EmptyReplyPolicy::Neutral).unwrap();
        let (best, _) = ranking.best_tier().unwrap();
        for _ in 0..32 {
            let chosen = select_best(&ranking, &mut rng).unwrap();
            assert_eq!(ranking.tier_of_move(chosen), Some(best));
        }
    }

    #[test]
    fn moves_without_replies_follow_the_empty_reply_policy() {
        let mut position = ToyPosition::cornered();
        let trap = ToyPosition::CORNERING_MOVE;
        let set = EvaluationSet::new_zeroed(position.side_to_move());

        let neutral = rank_all(&set, &mut position, 10, EmptyReplyPolicy::Neutral).unwrap();
        let tier = neutral.tier_of_move(trap).expect("trap move ranked");
        assert_eq!(tier, 4, "neutral policy 500 lands in the middle tier");

        let excluded = rank_all(&set, &mut position, 10, EmptyReplyPolicy::Exclude).unwrap();
        assert_eq!(excluded.tier_of_move(trap), None);
        assert_eq!(excluded.excluded(), &[trap]);
        assert_eq!(excluded.len() + 1, neutral.len());
    }

    #[test]
    fn excluded_moves_are_a_last_resort() {
        let mut position = ToyPosition::cornered();
        let set = EvaluationSet::new_zeroed(position.side_to_move());
        let mut ranking = rank_all(&set, &mut position, 10, EmptyReplyPolicy::Exclude).unwrap();
        for tier in ranking.tiers.iter_mut() {
            tier.clear();
        }
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_best(&ranking, &mut rng), Some(ToyPosition::CORNERING_MOVE));
    }

    #[test]
    fn no_legal_moves_selects_nothing() {
        let ranking = super::Ranking {
            tiers: vec![Vec::new(); 10],
            excluded: Vec::new(),
        };
        assert!(ranking.is_empty());
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_best(&ranking, &mut rng), None);
    }
}
