//! Weaken and strengthen: flip a move's relation bits toward a 50% policy.

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use rensa_core::{EvaluationSet, MoveClass};

use crate::error::EngineError;
use crate::policy::{MoveRelations, Summary, summarize};

/// Result code of one weaken or strengthen call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOutcome {
    /// At least one bit was flipped.
    Changed,
    /// Bits were selected but none changed.
    Keep,
    /// The move is already on the requested side of its target.
    Unnecessary,
    /// The move has no replies to relate to.
    EmptyMoves,
}

impl EditOutcome {
    pub const fn name(self) -> &'static str {
        match self {
            EditOutcome::Changed => "changed",
            EditOutcome::Keep => "keep",
            EditOutcome::Unnecessary => "unnecessary",
            EditOutcome::EmptyMoves => "empty_moves",
        }
    }
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An edit's outcome with the move's summary before and after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditReport {
    pub outcome: EditOutcome,
    pub before: Summary,
    pub after: Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Weaken,
    Strengthen,
}

impl Direction {
    /// The bit value that gets flipped away from.
    const fn from_bit(self) -> bool {
        matches!(self, Direction::Weaken)
    }
}

/// Positive count `weaken` aims for: just under half of `total`.
#[inline]
pub const fn weaken_target(total: usize) -> usize {
    (total / 2).saturating_sub(1)
}

/// Positive count `strengthen` aims for: half of `total`, rounded up.
#[inline]
pub const fn strengthen_target(total: usize) -> usize {
    total.div_ceil(2)
}

/// Split `delta` flips between two sub-tables with `first` and `second`
/// flippable replies.
///
/// The first share is proportional and rounded half up, the second takes the
/// remainder, and whatever a side cannot absorb moves to the other.
pub fn split_quota(delta: usize, first: usize, second: usize) -> (usize, usize) {
    let available = first + second;
    if available == 0 {
        return (0, 0);
    }
    let delta = delta.min(available);
    let mut a = ((2 * delta * first + available) / (2 * available)).min(first);
    let mut b = delta - a;
    if b > second {
        a += b - second;
        b = second;
    }
    (a, b)
}

/// Distinct reply cells of one sub-table still holding `bit`, with how many
/// replies address each.
fn flippable(
    set: &EvaluationSet,
    relations: &MoveRelations,
    reply: MoveClass,
    bit: bool,
) -> Result<Vec<(usize, usize)>, EngineError> {
    let kind = relations.kind_for(reply);
    let mut weights = BTreeMap::new();
    for &other in relations.replies(reply) {
        *weights.entry(other).or_insert(0usize) += 1;
    }
    let mut cells = Vec::with_capacity(weights.len());
    for (other, weight) in weights {
        if set.get(kind, relations.self_index, other)? == bit {
            cells.push((other, weight));
        }
    }
    Ok(cells)
}

/// Flip random cells until `quota` replies are covered. Returns the number
/// of cells that changed.
fn flip_cells<R: Rng + ?Sized>(
    set: &mut EvaluationSet,
    relations: &MoveRelations,
    reply: MoveClass,
    mut cells: Vec<(usize, usize)>,
    quota: usize,
    to: bool,
    rng: &mut R,
) -> Result<usize, EngineError> {
    let kind = relations.kind_for(reply);
    cells.shuffle(rng);
    let mut covered = 0;
    let mut changed = 0;
    for (other, weight) in cells {
        if covered >= quota {
            break;
        }
        if set.set(kind, relations.self_index, other, to)? {
            changed += 1;
        }
        covered += weight;
    }
    Ok(changed)
}

fn edit<R: Rng + ?Sized>(
    set: &mut EvaluationSet,
    relations: &MoveRelations,
    direction: Direction,
    rng: &mut R,
) -> Result<EditReport, EngineError> {
    let before = summarize(set, relations)?;
    let unchanged = |outcome| EditReport {
        outcome,
        before,
        after: before,
    };

    if before.total == 0 {
        return Ok(unchanged(EditOutcome::EmptyMoves));
    }
    let delta = match direction {
        Direction::Weaken => before.positive.saturating_sub(weaken_target(before.total)),
        Direction::Strengthen => strengthen_target(before.total).saturating_sub(before.positive),
    };
    if delta < 1 {
        return Ok(unchanged(EditOutcome::Unnecessary));
    }

    let from = direction.from_bit();
    let king_cells = flippable(set, relations, MoveClass::King, from)?;
    let piece_cells = flippable(set, relations, MoveClass::Piece, from)?;
    let king_weight: usize = king_cells.iter().map(|&(_, w)| w).sum();
    let piece_weight: usize = piece_cells.iter().map(|&(_, w)| w).sum();
    if king_weight == 0 && piece_weight == 0 {
        return Ok(unchanged(EditOutcome::EmptyMoves));
    }

    let (king_quota, piece_quota) = split_quota(delta, king_weight, piece_weight);
    let changed = flip_cells(set, relations, MoveClass::King, king_cells, king_quota, !from, rng)?
        + flip_cells(set, relations, MoveClass::Piece, piece_cells, piece_quota, !from, rng)?;

    let after = summarize(set, relations)?;
    let outcome = if changed > 0 {
        EditOutcome::Changed
    } else {
        EditOutcome::Keep
    };
    debug!(
        mv = %relations.mv,
        ?direction,
        delta,
        king_quota,
        piece_quota,
        changed,
        before = before.positive,
        after = after.positive,
        total = before.total,
        "edited relations"
    );
    Ok(EditReport {
        outcome,
        before,
        after,
    })
}

/// Clear relation bits of a move until its positive count is just under
/// half of its replies.
pub fn weaken<R: Rng + ?Sized>(
    set: &mut EvaluationSet,
    relations: &MoveRelations,
    rng: &mut R,
) -> Result<EditReport, EngineError> {
    edit(set, relations, Direction::Weaken, rng)
}

/// Set relation bits of a move until at least half of its replies are
/// positive.
pub fn strengthen<R: Rng + ?Sized>(
    set: &mut EvaluationSet,
    relations: &MoveRelations,
    rng: &mut R,
) -> Result<EditReport, EngineError> {
    edit(set, relations, Direction::Strengthen, rng)
}
