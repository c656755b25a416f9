//! Bounded self-play from a position, used as the learning oracle.

use tracing::trace;

use crate::error::EngineError;
use crate::position::{Outcome, Position, Termination};
use crate::ranking::{rank_all, select_best};
use crate::state::EngineState;

/// Play ranked moves for both sides until the game ends or `max_depth`
/// plies have been played, then undo them all.
///
/// Returns `None` when the depth cap was hit before the game ended; callers
/// score that as a draw. A side left without a move resigns.
pub fn playout<P: Position>(
    state: &mut EngineState,
    position: &mut P,
    max_depth: usize,
) -> Result<Option<Outcome>, EngineError> {
    let mut played = 0;
    let result = play(state, position, max_depth, &mut played);
    for _ in 0..played {
        position.pop();
    }
    result
}

fn play<P: Position>(
    state: &mut EngineState,
    position: &mut P,
    max_depth: usize,
    played: &mut usize,
) -> Result<Option<Outcome>, EngineError> {
    let resolution = state.config().ranking_resolution;
    let empty_reply = state.config().empty_reply;

    while *played < max_depth {
        if let Some(outcome) = position.outcome() {
            return Ok(Some(outcome));
        }
        let color = position.side_to_move();
        let ranking = rank_all(state.evaluation(color)?, position, resolution, empty_reply)?;
        let Some(mv) = select_best(&ranking, state.rng_mut()) else {
            return Ok(Some(Outcome::win(color.flip(), Termination::Resignation)));
        };
        trace!(ply = *played, %mv, "playout move");
        position.push(mv);
        *played += 1;
    }
    Ok(position.outcome())
}

#[cfg(test)]
mod tests {
    use rensa_core::{Color, EvaluationSet};

    use super::playout;
    use crate::config::EngineConfig;
    use crate::fixture::ToyPosition;
    use crate::position::Position;
    use crate::state::EngineState;

    fn state(seed: u64) -> EngineState {
        let config = EngineConfig {
            seed,
            ..EngineConfig::default()
        };
        EngineState::with_sets(
            config,
            EvaluationSet::new_zeroed(Color::Black),
            EvaluationSet::new_zeroed(Color::White),
        )
    }

    #[test]
    fn playout_restores_the_position() {
        let mut state = state(3);
        let mut position = ToyPosition::startpos();
        let before = position.sfen();
        let outcome = playout(&mut state, &mut position, 256).unwrap();
        assert!(outcome.is_some(), "toy games always finish within the cap");
        assert_eq!(position.sfen(), before);
        assert_eq!(position.ply(), 0);
    }

    #[test]
    fn depth_cap_ends_without_an_outcome() {
        let mut state = state(3);
        let mut position = ToyPosition::startpos();
        assert_eq!(playout(&mut state, &mut position, 2).unwrap(), None);
        assert_eq!(position.ply(), 0);
    }

    #[test]
    fn finished_positions_report_their_outcome() {
        let mut state = state(3);
        let mut position = ToyPosition::cornered();
        position.push(ToyPosition::CORNERING_MOVE);
        let expected = position.outcome();
        assert!(expected.is_some());
        assert_eq!(playout(&mut state, &mut position, 0).unwrap(), expected);
        assert_eq!(playout(&mut state, &mut position, 8).unwrap(), expected);
        assert_eq!(position.ply(), 1);
    }

    #[test]
    fn playouts_need_tables() {
        let mut state = EngineState::new(EngineConfig::default());
        let mut position = ToyPosition::startpos();
        assert!(playout(&mut state, &mut position, 4).is_err());
    }
}
