//! The board collaborator and game outcomes.

use std::fmt;

use rensa_core::{Color, Move};

/// Why a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    Checkmate,
    Resignation,
    MaxMoves,
    Declaration,
    Repetition,
}

/// Result of a game from one side's point of view, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GameResult {
    Loss,
    Draw,
    Win,
}

impl GameResult {
    /// Score a finished game for `color`. `None` (no result reached) is a draw.
    pub fn for_color(outcome: Option<Outcome>, color: Color) -> GameResult {
        match outcome.and_then(|o| o.winner) {
            None => GameResult::Draw,
            Some(winner) if winner == color => GameResult::Win,
            Some(_) => GameResult::Loss,
        }
    }

    /// The USI `gameover` keyword for this result.
    pub const fn usi_keyword(self) -> &'static str {
        match self {
            GameResult::Loss => "lose",
            GameResult::Draw => "draw",
            GameResult::Win => "win",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.usi_keyword())
    }
}

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outcome {
    /// The winning side, or `None` for a draw.
    pub winner: Option<Color>,
    pub reason: Termination,
}

impl Outcome {
    /// A decisive result.
    pub const fn win(winner: Color, reason: Termination) -> Outcome {
        Outcome {
            winner: Some(winner),
            reason,
        }
    }

    /// A drawn result.
    pub const fn draw(reason: Termination) -> Outcome {
        Outcome {
            winner: None,
            reason,
        }
    }

    /// This outcome scored for `color`.
    pub fn result_for(self, color: Color) -> GameResult {
        GameResult::for_color(Some(self), color)
    }
}

/// A shogi position with a move history.
///
/// Legal move generation, terminal detection and SFEN serialization live
/// outside this crate; implementations are expected to be correct.
pub trait Position: Sized {
    /// Error returned by [`Position::from_sfen`].
    type Error: std::error::Error + Send + Sync + 'static;

    /// The standard starting position.
    fn startpos() -> Self;

    /// Parse a position from SFEN text. The history starts empty.
    fn from_sfen(sfen: &str) -> Result<Self, Self::Error>;

    /// SFEN text of the current position.
    fn sfen(&self) -> String;

    /// Every legal move for the side to move.
    fn legal_moves(&self) -> Vec<Move>;

    /// Play a legal move.
    fn push(&mut self, mv: Move);

    /// Undo the last move, returning it, or `None` if the history is empty.
    fn pop(&mut self) -> Option<Move>;

    /// Whether `mv`, legal in this position, moves the side-to-move's king.
    fn is_king_move(&self, mv: Move) -> bool;

    fn side_to_move(&self) -> Color;

    /// The result if the game is over.
    fn outcome(&self) -> Option<Outcome>;

    /// Number of moves in the history.
    fn ply(&self) -> usize;
}

#[cfg(test)]
mod tests {
    use rensa_core::Color;

    use super::{GameResult, Outcome, Termination};

    #[test]
    fn results_are_ordered_worst_to_best() {
        assert!(GameResult::Loss < GameResult::Draw);
        assert!(GameResult::Draw < GameResult::Win);
    }

    #[test]
    fn outcome_scores_each_side() {
        let outcome = Outcome::win(Color::White, Termination::Checkmate);
        assert_eq!(outcome.result_for(Color::White), GameResult::Win);
        assert_eq!(outcome.result_for(Color::Black), GameResult::Loss);

        let draw = Outcome::draw(Termination::Repetition);
        assert_eq!(draw.result_for(Color::Black), GameResult::Draw);
    }

    #[test]
    fn unfinished_playouts_count_as_draws() {
        assert_eq!(GameResult::for_color(None, Color::Black), GameResult::Draw);
    }
}
