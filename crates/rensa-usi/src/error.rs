//! USI protocol errors.

use rensa_engine::EngineError;

/// Errors that can occur during USI protocol handling.
#[derive(Debug, thiserror::Error)]
pub enum UsiError {
    /// A command was given the wrong number of arguments.
    #[error("usage: {usage}")]
    Usage {
        /// The expected form of the command.
        usage: &'static str,
    },

    /// A move could not be parsed or is not legal in the current position.
    #[error("invalid move: {text}")]
    InvalidMove {
        /// The move text as received.
        text: String,
    },

    /// `setoption` named an unknown option or gave it an unusable value.
    #[error("invalid option {name} = \"{value}\"")]
    InvalidOption {
        /// Option name as received.
        name: String,
        /// Option value as received.
        value: String,
    },

    /// The `position` command is missing the `startpos` or `sfen` keyword.
    #[error("malformed position command: missing startpos or sfen keyword")]
    MalformedPosition,

    /// The board rejected an SFEN string.
    #[error("invalid SFEN \"{sfen}\": {reason}")]
    InvalidSfen {
        /// The SFEN string that failed to parse.
        sfen: String,
        /// Why the board rejected it.
        reason: String,
    },

    /// A ranking, editing or learning operation failed.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// An I/O error occurred while reading commands or writing replies.
    #[error("I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}
