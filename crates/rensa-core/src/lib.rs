//! Core shogi relation types: coordinates, moves, symmetry-reduced move
//! codecs, and the bit-packed relation tables they address.

mod canonical;
mod color;
mod drop_kind;
mod error;
mod evaluation_set;
mod file;
mod king_index;
mod piece_index;
mod rank;
mod relation;
mod relation_table;
mod shogi_move;
mod square;

pub use canonical::{to_black, to_right};
pub use color::Color;
pub use drop_kind::DropKind;
pub use error::{CodecError, ParseMoveError, TableError};
pub use evaluation_set::{EvaluationSet, TableStore, table_file_name};
pub use file::File;
pub use king_index::KingIndex;
pub use piece_index::PieceIndex;
pub use rank::Rank;
pub use relation::{MoveClass, RelationKind};
pub use relation_table::RelationTable;
pub use shogi_move::{Move, Source};
pub use square::Square;
