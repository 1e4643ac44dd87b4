//! FEN parsing and serialization.
//!
//! A FEN string has six space-separated fields:
//! `<placement> <side> <castling> <en-passant> <halfmove> <fullmove>`
//!
//! Placement lists ranks 8 down to 1 separated by '/', each rank from file a
//! to file h, with digits standing for runs of empty squares.

use std::num::IntErrorKind;

use log::debug;

use crate::board::{piece_from_char, CastlingRights, Color, Position, Square};
use crate::error::CodecError;

/// The standard starting position.
pub const STARTPOS_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Number of fields in a FEN string.
const FEN_FIELD_COUNT: usize = 6;

/// Parsing options for FEN input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenOptions {
    /// Reject castling fields containing characters other than `KQkq`.
    /// When false, unknown characters are ignored.
    pub strict_castling: bool,
}

/// Parses the placement field into `pos`.
fn parse_placement(s: &str, pos: &mut Position) -> Result<(), CodecError> {
    let ranks: Vec<&str> = s.split('/').collect();
    if ranks.len() != 8 {
        return Err(CodecError::malformed(
            s,
            format!("expected 8 ranks, got {}", ranks.len()),
        ));
    }

    for (i, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file: usize = 0;
        for c in rank_str.chars() {
            match c {
                '0'..='9' => file += (c as u8 - b'0') as usize,
                _ => {
                    let piece = piece_from_char(c)?;
                    if let Some(sq) = Square::from_coords(file as u8, rank) {
                        pos.place(sq, piece);
                    }
                    file += 1;
                }
            }
            if file > 8 {
                return Err(CodecError::RankOverflow {
                    rank: rank + 1,
                    files: file,
                });
            }
        }
        if file != 8 {
            return Err(CodecError::RankOverflow {
                rank: rank + 1,
                files: file,
            });
        }
    }

    Ok(())
}

fn parse_side(s: &str) -> Result<Color, CodecError> {
    match s {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(CodecError::InvalidSideToMove(s.to_string())),
    }
}

fn parse_castling(s: &str, options: &FenOptions) -> Result<CastlingRights, CodecError> {
    let mut rights = CastlingRights::default();
    if s == "-" {
        return Ok(rights);
    }

    for c in s.chars() {
        match c {
            'K' => rights.white_kingside = true,
            'Q' => rights.white_queenside = true,
            'k' => rights.black_kingside = true,
            'q' => rights.black_queenside = true,
            other if options.strict_castling => {
                return Err(CodecError::InvalidCastlingChar(other));
            }
            other => debug!("ignoring castling character '{}' in '{}'", other, s),
        }
    }

    Ok(rights)
}

fn parse_en_passant(s: &str) -> Result<Option<Square>, CodecError> {
    if s == "-" {
        return Ok(None);
    }
    Square::from_name(s).map(Some)
}

/// Parses a move counter. All-digit values too large for `u32` saturate,
/// since the encoder clamps them anyway.
fn parse_counter(s: &str) -> Result<u32, CodecError> {
    match s.parse::<u32>() {
        Ok(n) => Ok(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow && s.bytes().all(|b| b.is_ascii_digit()) => {
            Ok(u32::MAX)
        }
        Err(_) => Err(CodecError::InvalidCounter(s.to_string())),
    }
}

/// Parses a FEN string with default (lenient) options.
pub fn parse_fen(s: &str) -> Result<Position, CodecError> {
    parse_fen_with(s, &FenOptions::default())
}

/// Parses a FEN string into a `Position`.
pub fn parse_fen_with(s: &str, options: &FenOptions) -> Result<Position, CodecError> {
    let fields: Vec<&str> = s.split_whitespace().collect();
    if fields.len() != FEN_FIELD_COUNT {
        return Err(CodecError::malformed(
            s,
            format!("expected {} fields, got {}", FEN_FIELD_COUNT, fields.len()),
        ));
    }

    let mut pos = Position::empty();
    parse_placement(fields[0], &mut pos)?;
    pos.side_to_move = parse_side(fields[1])?;
    pos.castling = parse_castling(fields[2], options)?;
    pos.en_passant = parse_en_passant(fields[3])?;
    pos.halfmove_clock = parse_counter(fields[4])?;
    pos.fullmove_number = parse_counter(fields[5])?;

    Ok(pos)
}

/// Encodes a `Position` as a FEN string.
pub fn encode_fen(pos: &Position) -> String {
    let mut out = String::with_capacity(90);

    for rank in (0..8u8).rev() {
        let mut empty = 0;
        for file in 0..8u8 {
            let piece = Square::from_coords(file, rank).and_then(|sq| pos.piece_at(sq));
            match piece {
                Some(p) => {
                    if empty > 0 {
                        out.push((b'0' + empty) as char);
                        empty = 0;
                    }
                    out.push(p.fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push((b'0' + empty) as char);
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out.push(' ');
    out.push(pos.side_to_move.fen_char());

    out.push(' ');
    if pos.castling.is_empty() {
        out.push('-');
    } else {
        for (flag, c) in pos.castling.as_array().iter().zip(['K', 'Q', 'k', 'q']) {
            if *flag {
                out.push(c);
            }
        }
    }

    out.push(' ');
    match pos.en_passant {
        Some(sq) => out.push_str(&sq.name()),
        None => out.push('-'),
    }

    out.push_str(&format!(" {} {}", pos.halfmove_clock, pos.fullmove_number));
    out
}
