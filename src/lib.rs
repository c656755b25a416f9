//! rensa: a shogi engine that learns move relations from finished games.
//!
//! The engine is generic over the board. A binary wires a concrete
//! [`Position`] implementation in through [`run`]:
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     rensa::init_logging()?;
//!     rensa::run::<MyBoard>()
//! }
//! ```

use std::io;

use anyhow::{Context, Result};
use tracing::info;
use tracing::level_filters::LevelFilter;

pub use rensa_core as core;
pub use rensa_engine as engine;
pub use rensa_engine::{EngineConfig, Position};
pub use rensa_usi as usi;
pub use rensa_usi::UsiEngine;

/// Install the fmt subscriber on stderr; stdout carries the USI protocol.
pub fn init_logging() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(LevelFilter::INFO)
        .try_init()
        .map_err(anyhow::Error::msg)
}

/// Serve USI on stdin and stdout with the default configuration.
pub fn run<B: Position>() -> Result<()> {
    serve::<B, _, _>(EngineConfig::default(), io::stdin().lock(), &mut io::stdout().lock())
}

/// Serve USI on the given streams until `quit` or end of input.
pub fn serve<B, R, W>(config: EngineConfig, input: R, out: &mut W) -> Result<()>
where
    B: Position,
    R: io::BufRead,
    W: io::Write,
{
    info!(engine_id = %config.engine_id, data_dir = %config.data_dir.display(), "rensa starting");
    UsiEngine::<B>::new(config)
        .run(input, out)
        .context("USI session failed")
}
