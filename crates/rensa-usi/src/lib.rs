//! USI protocol handling for rensa.

pub mod command;
pub mod engine;
pub mod error;

pub use command::{Command, PositionBase, PositionSpec, UsiOption, parse_command};
pub use engine::UsiEngine;
pub use error::UsiError;
