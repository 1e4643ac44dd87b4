//! Board representation types.
//!
//! Contains the square index, the piece table, parsed positions, and moves.

pub mod moves;
pub mod piece;
pub mod position;
pub mod square;

pub use moves::Move;
pub use piece::{piece_from_char, Color, Piece, PieceKind, ALL_PIECE_KINDS};
pub use position::{CastlingRights, Position};
pub use square::{index_to_square, square_to_index, Square, SQUARE_COUNT};
