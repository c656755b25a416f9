//! Engine errors.

use rensa_core::{CodecError, TableError};

/// Errors from ranking, editing and learning.
///
/// Apart from [`EngineError::NotTerminal`] and [`EngineError::TablesNotLoaded`],
/// these indicate an internal inconsistency and abort the current command.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A move could not be canonicalized or indexed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A relation table could not be read, written or addressed.
    #[error(transparent)]
    Table(#[from] TableError),

    /// Undoing moves did not bring the position back to where it started.
    #[error("position not restored: expected \"{expected}\", found \"{found}\"")]
    RestoreMismatch {
        /// SFEN recorded before the moves were made.
        expected: String,
        /// SFEN after undoing them.
        found: String,
    },

    /// Learning was requested on a game that has not finished.
    #[error("learning requires a finished game")]
    NotTerminal,

    /// The relation tables have not been loaded yet.
    #[error("relation tables are not loaded")]
    TablesNotLoaded,
}
