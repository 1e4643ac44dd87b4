//! Text formats and the codec line protocol.
//!
//! This module implements parsing and serialization for FEN positions, UCI
//! move text, and the command parser for the interactive codec loop.

pub mod fen;
pub mod parser;
pub mod uci;

pub use fen::{encode_fen, parse_fen, parse_fen_with, FenOptions, STARTPOS_FEN};
pub use parser::{parse_command, Command, PositionSpec};
pub use uci::{format_move, parse_move};
