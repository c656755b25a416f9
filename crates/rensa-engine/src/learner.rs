//! Learning from a finished game by walking it backward.
//!
//! Starting one ply before the end and moving one ply further back each
//! step, the moves of the best tier are probed by playout and weakened when
//! they do worse than what the game's mover actually achieved; the moves of
//! the worst tier are strengthened when they do better.

use std::fmt;

use tracing::{debug, info};

use rensa_core::{Color, Move};

use crate::editor::{EditOutcome, strengthen, weaken};
use crate::error::EngineError;
use crate::playout::playout;
use crate::policy::relations;
use crate::position::{GameResult, Outcome, Position};
use crate::ranking::rank_all;
use crate::state::EngineState;

/// Counters from one learning pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LearnReport {
    /// Plies walked back from the end.
    pub steps: usize,
    /// Playouts run.
    pub probes: usize,
    /// Best-tier moves whose relations were weakened.
    pub weakened: usize,
    /// Worst-tier moves whose relations were strengthened.
    pub strengthened: usize,
    /// Tables written to disk.
    pub saved: usize,
}

impl fmt::Display for LearnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "steps {} probes {} weakened {} strengthened {} saved {}",
            self.steps, self.probes, self.weakened, self.strengthened, self.saved
        )
    }
}

#[derive(Debug, Clone, Copy)]
enum Probe {
    /// Weaken when the playout ends worse than expected.
    Good,
    /// Strengthen when the playout ends better than expected.
    Bad,
}

/// Learn from the finished game in `position`.
///
/// The position is left exactly as it was found.
pub fn learn<P: Position>(state: &mut EngineState, position: &mut P) -> Result<LearnReport, EngineError> {
    let outcome = position.outcome().ok_or(EngineError::NotTerminal)?;
    let terminal = position.sfen();
    let limit = position.ply().min(state.config().max_learn_plies);

    let mut report = LearnReport::default();
    let mut popped = Vec::with_capacity(limit);
    let walked = walk(state, position, outcome, limit, &mut popped, &mut report);

    for &mv in popped.iter().rev() {
        position.push(mv);
    }
    walked?;

    let found = position.sfen();
    if found != terminal {
        return Err(EngineError::RestoreMismatch {
            expected: terminal,
            found,
        });
    }

    report.saved += state.save_tables()?;
    info!(
        winner = ?outcome.winner,
        reason = ?outcome.reason,
        steps = report.steps,
        probes = report.probes,
        weakened = report.weakened,
        strengthened = report.strengthened,
        "learning finished"
    );
    Ok(report)
}

fn walk<P: Position>(
    state: &mut EngineState,
    position: &mut P,
    outcome: Outcome,
    limit: usize,
    popped: &mut Vec<Move>,
    report: &mut LearnReport,
) -> Result<(), EngineError> {
    let save_interval = state.config().save_interval;

    for step in 1..=limit {
        let Some(mv) = position.pop() else {
            break;
        };
        popped.push(mv);
        report.steps = step;

        learn_step(state, position, outcome, report)?;

        if save_interval > 0 && step % save_interval == 0 {
            report.saved += state.save_tables()?;
        }
    }
    Ok(())
}

fn learn_step<P: Position>(
    state: &mut EngineState,
    position: &mut P,
    outcome: Outcome,
    report: &mut LearnReport,
) -> Result<(), EngineError> {
    let mover = position.side_to_move();
    let expected = outcome.result_for(mover);
    let ranking = rank_all(
        state.evaluation(mover)?,
        position,
        state.config().ranking_resolution,
        state.config().empty_reply,
    )?;
    debug!(
        ply = position.ply(),
        %mover,
        %expected,
        ranked = ranking.len(),
        "learning step"
    );

    let Some((best, good)) = ranking.best_tier() else {
        return Ok(());
    };
    for ranked in good {
        probe(state, position, ranked.mv, mover, expected, Probe::Good, report)?;
    }

    if let Some((worst, bad)) = ranking.worst_tier() {
        if worst != best {
            for ranked in bad {
                probe(state, position, ranked.mv, mover, expected, Probe::Bad, report)?;
            }
        }
    }
    Ok(())
}

fn probe<P: Position>(
    state: &mut EngineState,
    position: &mut P,
    mv: Move,
    mover: Color,
    expected: GameResult,
    kind: Probe,
    report: &mut LearnReport,
) -> Result<(), EngineError> {
    let before = position.sfen();
    let max_depth = state.config().max_playout_depth;

    position.push(mv);
    let simulated = playout(state, position, max_depth);
    position.pop();

    let found = position.sfen();
    if found != before {
        return Err(EngineError::RestoreMismatch {
            expected: before,
            found,
        });
    }
    let result = GameResult::for_color(simulated?, mover);
    report.probes += 1;

    let disappointing = match kind {
        Probe::Good => result < expected,
        Probe::Bad => result > expected,
    };
    if !disappointing {
        return Ok(());
    }

    let rel = relations(position, mv)?;
    let (set, rng) = state.evaluation_and_rng(mover)?;
    let edited = match kind {
        Probe::Good => weaken(set, &rel, rng)?,
        Probe::Bad => strengthen(set, &rel, rng)?,
    };
    debug!(%mv, ?kind, %result, %expected, outcome = %edited.outcome, "probe edited relations");

    if edited.outcome == EditOutcome::Changed {
        match kind {
            Probe::Good => report.weakened += 1,
            Probe::Bad => report.strengthened += 1,
        }
    }
    Ok(())
}
