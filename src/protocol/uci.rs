//! UCI long-algebraic move text.
//!
//! A move is written as two square names followed by an optional lowercase
//! promotion letter: `e2e4`, `g1f3`, `e7e8q`, `a2a1n`.

use std::fmt;

use crate::board::{Move, PieceKind, Square};
use crate::error::CodecError;

/// Parses a 4- or 5-character UCI move string.
pub fn parse_move(s: &str) -> Result<Move, CodecError> {
    if !s.is_ascii() || !(4..=5).contains(&s.len()) {
        return Err(CodecError::MalformedMove(s.to_string()));
    }

    let from = Square::from_name(&s[0..2])?;
    let to = Square::from_name(&s[2..4])?;

    match s[4..].chars().next() {
        None => Ok(Move::new(from, to)),
        Some(c) => {
            let kind = PieceKind::from_promotion_char(c).ok_or(CodecError::InvalidPromotionChar(c))?;
            Ok(Move::with_promotion(from, to, kind))
        }
    }
}

/// Formats a move as UCI text.
pub fn format_move(mv: &Move) -> String {
    mv.to_string()
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.fen_char())?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Move {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_move(s)
    }
}
