//! Policy ranking, table editing and self-play learning over relation tables.

pub mod config;
pub mod editor;
pub mod error;
#[cfg(any(test, feature = "test-support"))]
pub mod fixture;
pub mod learner;
pub mod playout;
pub mod policy;
pub mod position;
pub mod ranking;
pub mod state;

pub use config::{EmptyReplyPolicy, EngineConfig};
pub use editor::{EditOutcome, EditReport, strengthen, weaken};
pub use error::EngineError;
pub use learner::{LearnReport, learn};
pub use playout::playout;
pub use policy::{MoveRelations, Summary, relations, summarize};
pub use position::{GameResult, Outcome, Position, Termination};
pub use ranking::{RankedMove, Ranking, rank_all, select_best};
pub use state::EngineState;
