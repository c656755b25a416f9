//! Synchronous USI engine loop over any [`Position`] implementation.

use std::io::{BufRead, Write};

use tracing::{debug, error, info, warn};

use rensa_core::{Move, MoveClass};
use rensa_engine::{
    EngineConfig, EngineError, EngineState, GameResult, Position, learn, rank_all, relations,
    select_best, strengthen, summarize, weaken,
};

use crate::command::{Command, PositionBase, PositionSpec, UsiOption, parse_command};
use crate::error::UsiError;

/// Whether the loop keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// The USI engine, holding the current position and the learning state.
///
/// Commands are handled one at a time on the calling thread; every reply
/// is written to the output before the next line is read.
pub struct UsiEngine<B: Position> {
    position: B,
    state: EngineState,
}

impl<B: Position> UsiEngine<B> {
    /// Create an engine at the starting position. Tables load lazily.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            position: B::startpos(),
            state: EngineState::new(config),
        }
    }

    pub fn position(&self) -> &B {
        &self.position
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Run the USI loop until `quit` or end of input.
    ///
    /// Command failures are reported on `out` and the loop goes on; only
    /// I/O errors on the USI channel end it.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<(), UsiError> {
        for line in input.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            debug!(cmd = %trimmed, "received USI command");

            match parse_command(trimmed).and_then(|cmd| self.handle(cmd, out)) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(e @ UsiError::Io { .. }) => return Err(e),
                Err(e @ UsiError::Usage { .. }) => {
                    warn!(cmd = %trimmed, error = %e, "USI usage error");
                    writeln!(out, "info string {e}")?;
                }
                Err(e) => {
                    error!(cmd = %trimmed, error = %e, "USI command failed");
                    writeln!(out, "info string error: {e}")?;
                }
            }
            out.flush()?;
        }

        self.shutdown()?;
        Ok(())
    }

    fn handle<W: Write>(&mut self, cmd: Command, out: &mut W) -> Result<Flow, UsiError> {
        match cmd {
            Command::Usi => self.handle_usi(out)?,
            Command::IsReady => self.handle_isready(out)?,
            Command::SetOption(option) => self.handle_setoption(option)?,
            Command::UsiNewGame => self.handle_usinewgame()?,
            Command::Position(spec) => self.handle_position(spec)?,
            Command::Go => self.handle_go(out)?,
            Command::GameOver(result) => self.handle_gameover(result)?,
            Command::Quit => return Ok(Flow::Quit),
            Command::Policy => self.handle_policy(out)?,
            Command::Relation(mv) => self.handle_relation(mv, out)?,
            Command::Weaken(mv) => self.handle_edit(mv, false, out)?,
            Command::Strengthen(mv) => self.handle_edit(mv, true, out)?,
            Command::Learn => self.handle_learn(out)?,
            Command::Unknown(word) => {
                if !word.is_empty() {
                    debug!(%word, "ignoring unknown command");
                }
            }
        }
        Ok(Flow::Continue)
    }

    fn handle_usi<W: Write>(&self, out: &mut W) -> Result<(), UsiError> {
        let config = self.state.config();
        writeln!(out, "id name {}", config.engine_id)?;
        writeln!(out, "id author the rensa developers")?;
        writeln!(out, "option name EngineId type string default {}", config.engine_id)?;
        writeln!(out, "option name DataDir type string default {}", config.data_dir.display())?;
        writeln!(
            out,
            "option name RankingResolution type spin default {} min {} max {}",
            config.ranking_resolution,
            EngineConfig::MIN_RESOLUTION,
            EngineConfig::MAX_RESOLUTION
        )?;
        writeln!(
            out,
            "option name MaxPlayoutDepth type spin default {} min 1 max 4096",
            config.max_playout_depth
        )?;
        writeln!(
            out,
            "option name MaxLearnPlies type spin default {} min 1 max 1024",
            config.max_learn_plies
        )?;
        writeln!(
            out,
            "option name SaveInterval type spin default {} min 0 max 1024",
            config.save_interval
        )?;
        writeln!(
            out,
            "option name EmptyReply type combo default {} var neutral var exclude",
            config.empty_reply
        )?;
        writeln!(
            out,
            "option name Seed type spin default {} min 0 max {}",
            config.seed,
            u64::MAX
        )?;
        writeln!(out, "usiok")?;
        Ok(())
    }

    fn handle_isready<W: Write>(&mut self, out: &mut W) -> Result<(), UsiError> {
        self.state.load_tables()?;
        writeln!(out, "readyok")?;
        Ok(())
    }

    fn handle_setoption(&mut self, option: UsiOption) -> Result<(), UsiError> {
        let mut config = self.state.config().clone();
        option.apply(&mut config);
        self.state.reconfigure(config)?;
        Ok(())
    }

    fn handle_usinewgame(&mut self) -> Result<(), UsiError> {
        self.state.load_tables()?;
        self.position = B::startpos();
        Ok(())
    }

    /// Replace the position. On any error the previous position is kept.
    fn handle_position(&mut self, spec: PositionSpec) -> Result<(), UsiError> {
        let mut position = match spec.base {
            PositionBase::StartPos => B::startpos(),
            PositionBase::Sfen(sfen) => B::from_sfen(&sfen).map_err(|e| UsiError::InvalidSfen {
                reason: e.to_string(),
                sfen,
            })?,
        };
        for mv in spec.moves {
            ensure_legal(&position, mv)?;
            position.push(mv);
        }
        self.position = position;
        Ok(())
    }

    fn handle_go<W: Write>(&mut self, out: &mut W) -> Result<(), UsiError> {
        if self.position.outcome().is_some() {
            writeln!(out, "bestmove resign")?;
            return Ok(());
        }

        self.state.load_tables()?;
        let color = self.position.side_to_move();
        let config = self.state.config();
        let (resolution, empty_reply) = (config.ranking_resolution, config.empty_reply);
        let ranking = rank_all(
            self.state.evaluation(color)?,
            &mut self.position,
            resolution,
            empty_reply,
        )?;

        match select_best(&ranking, self.state.rng_mut()) {
            Some(mv) => {
                debug!(%mv, tier = ?ranking.tier_of_move(mv), "selected move");
                writeln!(out, "bestmove {mv}")?;
            }
            None => writeln!(out, "bestmove resign")?,
        }
        Ok(())
    }

    fn handle_gameover(&mut self, result: GameResult) -> Result<(), UsiError> {
        let saved = self.state.save_tables()?;
        info!(%result, saved, "game over");
        Ok(())
    }

    fn handle_policy<W: Write>(&mut self, out: &mut W) -> Result<(), UsiError> {
        self.state.load_tables()?;
        let color = self.position.side_to_move();
        let config = self.state.config();
        let (resolution, empty_reply) = (config.ranking_resolution, config.empty_reply);
        let ranking = rank_all(
            self.state.evaluation(color)?,
            &mut self.position,
            resolution,
            empty_reply,
        )?;

        for (tier, moves) in ranking.tiers().iter().enumerate() {
            for ranked in moves {
                writeln!(
                    out,
                    "info string tier {tier} move {} policy {} positive {} total {}",
                    ranked.mv, ranked.policy, ranked.summary.positive, ranked.summary.total
                )?;
            }
        }
        for mv in ranking.excluded() {
            writeln!(out, "info string excluded move {mv}")?;
        }
        writeln!(
            out,
            "info string ranked {} excluded {} tiers {}",
            ranking.len(),
            ranking.excluded().len(),
            ranking.resolution()
        )?;
        Ok(())
    }

    /// Dump every relation bit the move addresses, one reply per line.
    fn handle_relation<W: Write>(&mut self, mv: Move, out: &mut W) -> Result<(), UsiError> {
        ensure_legal(&self.position, mv)?;
        self.state.load_tables()?;
        let rel = relations(&mut self.position, mv)?;
        let set = self.state.evaluation(rel.color)?;

        writeln!(
            out,
            "info string relation move {mv} color {} index {} replies {}",
            rel.color,
            rel.self_index,
            rel.total()
        )?;
        for reply in [MoveClass::King, MoveClass::Piece] {
            let kind = rel.kind_for(reply);
            for &other in rel.replies(reply) {
                let bit = set.get(kind, rel.self_index, other).map_err(EngineError::from)?;
                let canonical = reply.decode(other).map_err(EngineError::from)?;
                writeln!(
                    out,
                    "info string {kind} reply {other} {canonical} {}",
                    u8::from(bit)
                )?;
            }
        }
        let summary = summarize(set, &rel)?;
        writeln!(
            out,
            "info string positive {} total {}",
            summary.positive, summary.total
        )?;
        Ok(())
    }

    fn handle_edit<W: Write>(&mut self, mv: Move, raise: bool, out: &mut W) -> Result<(), UsiError> {
        ensure_legal(&self.position, mv)?;
        self.state.load_tables()?;
        let rel = relations(&mut self.position, mv)?;
        let (set, rng) = self.state.evaluation_and_rng(rel.color)?;
        let (verb, report) = if raise {
            ("strengthen", strengthen(set, &rel, rng)?)
        } else {
            ("weaken", weaken(set, &rel, rng)?)
        };
        info!(%mv, verb, outcome = %report.outcome, "edited relations");
        writeln!(
            out,
            "info string {verb} {mv} {} positive {} -> {} total {}",
            report.outcome, report.before.positive, report.after.positive, report.after.total
        )?;
        Ok(())
    }

    fn handle_learn<W: Write>(&mut self, out: &mut W) -> Result<(), UsiError> {
        self.state.load_tables()?;
        let report = learn(&mut self.state, &mut self.position)?;
        writeln!(out, "info string learn {report}")?;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<(), UsiError> {
        let saved = self.state.save_tables()?;
        info!(saved, "rensa shutting down");
        Ok(())
    }
}

fn ensure_legal<B: Position>(position: &B, mv: Move) -> Result<(), UsiError> {
    if position.legal_moves().contains(&mv) {
        Ok(())
    } else {
        Err(UsiError::InvalidMove {
            text: mv.to_usi(),
        })
    }
}
