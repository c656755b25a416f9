//! USI command parsing.

use std::path::PathBuf;

use rensa_core::Move;
use rensa_engine::{EmptyReplyPolicy, EngineConfig, GameResult};

use crate::error::UsiError;

/// An option set through `setoption name <N> value <V>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsiOption {
    EngineId(String),
    DataDir(PathBuf),
    RankingResolution(usize),
    MaxPlayoutDepth(usize),
    MaxLearnPlies(usize),
    SaveInterval(usize),
    EmptyReply(EmptyReplyPolicy),
    Seed(u64),
}

impl UsiOption {
    /// Apply this option to `config`.
    pub fn apply(self, config: &mut EngineConfig) {
        match self {
            UsiOption::EngineId(id) => config.engine_id = id,
            UsiOption::DataDir(dir) => config.data_dir = dir,
            UsiOption::RankingResolution(r) => config.ranking_resolution = r,
            UsiOption::MaxPlayoutDepth(d) => config.max_playout_depth = d,
            UsiOption::MaxLearnPlies(n) => config.max_learn_plies = n,
            UsiOption::SaveInterval(n) => config.save_interval = n,
            UsiOption::EmptyReply(policy) => config.empty_reply = policy,
            UsiOption::Seed(seed) => config.seed = seed,
        }
    }
}

/// Where a `position` command starts from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionBase {
    StartPos,
    Sfen(String),
}

/// A parsed `position` command; the board is built by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionSpec {
    pub base: PositionBase,
    /// Moves to play from the base position, in order.
    pub moves: Vec<Move>,
}

/// A parsed USI command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `usi` -- identify the engine and list its options.
    Usi,
    /// `isready` -- load tables, then answer `readyok`.
    IsReady,
    /// `setoption name <N> value <V>`.
    SetOption(UsiOption),
    /// `usinewgame` -- load or create tables and reset the board.
    UsiNewGame,
    /// `position startpos|sfen <sfen> [moves ...]`.
    Position(PositionSpec),
    /// `go ...` -- choose a move. Time controls are ignored.
    Go,
    /// `gameover win|lose|draw` -- save dirty tables.
    GameOver(GameResult),
    /// `quit` -- save dirty tables and exit.
    Quit,
    /// `policy` -- print the ranking of every legal move.
    Policy,
    /// `relation <move>` -- dump the relation bits of one move.
    Relation(Move),
    /// `weaken <move>`.
    Weaken(Move),
    /// `strengthen <move>`.
    Strengthen(Move),
    /// `learn` -- learn from the finished game on the board.
    Learn,
    /// Unrecognized command (silently ignored per USI convention).
    Unknown(String),
}

/// Parse a single line of USI input into a [`Command`].
pub fn parse_command(line: &str) -> Result<Command, UsiError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = tokens.split_first() else {
        return Ok(Command::Unknown(String::new()));
    };

    match head {
        "usi" => Ok(Command::Usi),
        "isready" => Ok(Command::IsReady),
        "usinewgame" => Ok(Command::UsiNewGame),
        "go" => Ok(Command::Go),
        "quit" => Ok(Command::Quit),
        "setoption" => parse_setoption(args),
        "position" => parse_position(args),
        "gameover" => parse_gameover(args),
        "policy" => no_args(args, "policy", Command::Policy),
        "learn" => no_args(args, "learn", Command::Learn),
        "relation" => one_move(args, "relation <move>").map(Command::Relation),
        "weaken" => one_move(args, "weaken <move>").map(Command::Weaken),
        "strengthen" => one_move(args, "strengthen <move>").map(Command::Strengthen),
        _ => Ok(Command::Unknown(head.to_string())),
    }
}

fn no_args(args: &[&str], usage: &'static str, command: Command) -> Result<Command, UsiError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(UsiError::Usage { usage })
    }
}

fn one_move(args: &[&str], usage: &'static str) -> Result<Move, UsiError> {
    match args {
        [text] => parse_move(text),
        _ => Err(UsiError::Usage { usage }),
    }
}

fn parse_move(text: &str) -> Result<Move, UsiError> {
    Move::from_usi(text).map_err(|_| UsiError::InvalidMove {
        text: text.to_string(),
    })
}

fn parse_gameover(args: &[&str]) -> Result<Command, UsiError> {
    let result = match args {
        ["win"] => GameResult::Win,
        ["lose"] => GameResult::Loss,
        ["draw"] => GameResult::Draw,
        _ => {
            return Err(UsiError::Usage {
                usage: "gameover win|lose|draw",
            });
        }
    };
    Ok(Command::GameOver(result))
}

/// Parse the `position` command arguments.
///
/// Supports:
/// - `position startpos [moves 7g7f 3c3d ...]`
/// - `position sfen <sfen fields...> [moves 7g7f 3c3d ...]`
fn parse_position(args: &[&str]) -> Result<Command, UsiError> {
    let split = args.iter().position(|&t| t == "moves").unwrap_or(args.len());
    let (head, tail) = args.split_at(split);

    let base = match head {
        ["startpos"] => PositionBase::StartPos,
        ["sfen", fields @ ..] if !fields.is_empty() => PositionBase::Sfen(fields.join(" ")),
        ["sfen"] => {
            return Err(UsiError::InvalidSfen {
                sfen: String::new(),
                reason: "empty".to_string(),
            });
        }
        _ => return Err(UsiError::MalformedPosition),
    };

    let moves = tail
        .iter()
        .skip(1)
        .map(|text| parse_move(text))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Command::Position(PositionSpec { base, moves }))
}

/// Parse `setoption name <N> value <V>`. Values may contain spaces.
fn parse_setoption(args: &[&str]) -> Result<Command, UsiError> {
    const USAGE: &str = "setoption name <name> value <value>";

    let ["name", rest @ ..] = args else {
        return Err(UsiError::Usage { usage: USAGE });
    };
    let split = rest.iter().position(|&t| t == "value").unwrap_or(rest.len());
    let (name, value) = rest.split_at(split);
    if name.is_empty() {
        return Err(UsiError::Usage { usage: USAGE });
    }
    let name = name.join(" ");
    let value = value.get(1..).unwrap_or_default().join(" ");

    let invalid = || UsiError::InvalidOption {
        name: name.clone(),
        value: value.clone(),
    };
    let number = |min: usize, max: usize| {
        value
            .parse::<usize>()
            .ok()
            .filter(|n| (min..=max).contains(n))
            .ok_or_else(invalid)
    };

    let option = match name.to_ascii_lowercase().as_str() {
        "engineid" if !value.is_empty() => UsiOption::EngineId(value.clone()),
        "datadir" if !value.is_empty() => UsiOption::DataDir(PathBuf::from(&value)),
        "rankingresolution" => UsiOption::RankingResolution(number(
            EngineConfig::MIN_RESOLUTION,
            EngineConfig::MAX_RESOLUTION,
        )?),
        "maxplayoutdepth" => UsiOption::MaxPlayoutDepth(number(1, 4096)?),
        "maxlearnplies" => UsiOption::MaxLearnPlies(number(1, 1024)?),
        "saveinterval" => UsiOption::SaveInterval(number(0, 1024)?),
        "emptyreply" => UsiOption::EmptyReply(value.parse().map_err(|_| invalid())?),
        "seed" => UsiOption::Seed(value.parse().map_err(|_| invalid())?),
        _ => return Err(invalid()),
    };
    Ok(Command::SetOption(option))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rensa_core::Move;
    use rensa_engine::{EmptyReplyPolicy, EngineConfig, GameResult};

    use super::*;

    fn mv(s: &str) -> Move {
        Move::from_usi(s).unwrap()
    }

    #[test]
    fn parse_handshake() {
        assert_eq!(parse_command("usi").unwrap(), Command::Usi);
        assert_eq!(parse_command("isready").unwrap(), Command::IsReady);
        assert_eq!(parse_command("usinewgame").unwrap(), Command::UsiNewGame);
        assert_eq!(parse_command("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn parse_go_ignores_time_controls() {
        assert_eq!(
            parse_command("go btime 1000 wtime 1000 byoyomi 100").unwrap(),
            Command::Go
        );
    }

    #[test]
    fn parse_position_startpos_with_moves() {
        let cmd = parse_command("position startpos moves 7g7f 3c3d").unwrap();
        assert_eq!(
            cmd,
            Command::Position(PositionSpec {
                base: PositionBase::StartPos,
                moves: vec![mv("7g7f"), mv("3c3d")],
            })
        );
    }

    #[test]
    fn parse_position_sfen_keeps_all_fields() {
        let cmd = parse_command(
            "position sfen lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1 moves 2g2f",
        )
        .unwrap();
        match cmd {
            Command::Position(spec) => {
                assert_eq!(
                    spec.base,
                    PositionBase::Sfen(
                        "lnsgkgsnl/1r5b1/ppppppppp/9/9/9/PPPPPPPPP/1B5R1/LNSGKGSNL b - 1".to_string()
                    )
                );
                assert_eq!(spec.moves, vec![mv("2g2f")]);
            }
            other => panic!("expected Position, got {other:?}"),
        }
    }

    #[test]
    fn parse_position_errors() {
        assert!(matches!(
            parse_command("position"),
            Err(UsiError::MalformedPosition)
        ));
        assert!(matches!(
            parse_command("position sfen"),
            Err(UsiError::InvalidSfen { .. })
        ));
        assert!(matches!(
            parse_command("position startpos moves 7g7z"),
            Err(UsiError::InvalidMove { .. })
        ));
    }

    #[test]
    fn parse_custom_commands() {
        assert_eq!(parse_command("policy").unwrap(), Command::Policy);
        assert_eq!(parse_command("learn").unwrap(), Command::Learn);
        assert_eq!(
            parse_command("relation 5i4h").unwrap(),
            Command::Relation(mv("5i4h"))
        );
        assert_eq!(parse_command("weaken G*5e").unwrap(), Command::Weaken(mv("G*5e")));
        assert_eq!(
            parse_command("strengthen 8h2b+").unwrap(),
            Command::Strengthen(mv("8h2b+"))
        );
    }

    #[test]
    fn wrong_argument_counts_are_usage_errors() {
        for line in ["relation", "weaken 7g7f 3c3d", "strengthen", "policy now", "learn 3", "gameover"] {
            assert!(
                matches!(parse_command(line), Err(UsiError::Usage { .. })),
                "{line:?} should be a usage error"
            );
        }
    }

    #[test]
    fn parse_gameover() {
        assert_eq!(
            parse_command("gameover lose").unwrap(),
            Command::GameOver(GameResult::Loss)
        );
        assert!(parse_command("gameover maybe").is_err());
    }

    #[test]
    fn parse_setoption_values() {
        assert_eq!(
            parse_command("setoption name RankingResolution value 20").unwrap(),
            Command::SetOption(UsiOption::RankingResolution(20))
        );
        assert_eq!(
            parse_command("setoption name DataDir value /tmp/my tables").unwrap(),
            Command::SetOption(UsiOption::DataDir(PathBuf::from("/tmp/my tables")))
        );
        assert_eq!(
            parse_command("setoption name EmptyReply value exclude").unwrap(),
            Command::SetOption(UsiOption::EmptyReply(EmptyReplyPolicy::Exclude))
        );
    }

    #[test]
    fn parse_setoption_rejects_bad_values() {
        for line in [
            "setoption name RankingResolution value 0",
            "setoption name RankingResolution value 1001",
            "setoption name Seed value -1",
            "setoption name EmptyReply value sometimes",
            "setoption name Hash value 16",
            "setoption name EngineId value",
        ] {
            assert!(
                matches!(parse_command(line), Err(UsiError::InvalidOption { .. })),
                "{line:?} should be rejected"
            );
        }
        assert!(matches!(
            parse_command("setoption RankingResolution 3"),
            Err(UsiError::Usage { .. })
        ));
    }

    #[test]
    fn options_apply_to_config() {
        let mut config = EngineConfig::default();
        UsiOption::SaveInterval(3).apply(&mut config);
        UsiOption::EngineId("probe".to_string()).apply(&mut config);
        assert_eq!(config.save_interval, 3);
        assert_eq!(config.engine_id, "probe");
    }

    #[test]
    fn parse_unknown_and_empty() {
        assert_eq!(
            parse_command("ponderhit").unwrap(),
            Command::Unknown("ponderhit".to_string())
        );
        assert_eq!(parse_command("   ").unwrap(), Command::Unknown(String::new()));
    }
}
