//! Codec session state.
//!
//! Holds the current position and codec options between protocol commands.
//! Move encoding and decoding take their piece-kind and side-to-move context
//! from the current position.

use std::collections::HashMap;
use std::io::{self, Write};

use log::{debug, warn};

use crate::board::{Color, PieceKind, Position};
use crate::error::CodecError;
use crate::nn::encoding::{encode_position, NUM_PLANES};
use crate::nn::policy::{decode_index, encode_move, PolicyIndex};
use crate::protocol::fen::{parse_fen_with, FenOptions, STARTPOS_FEN};
use crate::protocol::parser::PositionSpec;
use crate::protocol::uci::parse_move;

/// Option name toggling strict castling-field validation.
pub const STRICT_CASTLING_OPTION: &str = "StrictCastling";

/// Errors reported back to the protocol client.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no position set")]
    NoPosition,
    #[error("no piece on from-square '{0}'")]
    EmptyFromSquare(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Holds the mutable state of a codec session between commands.
pub struct Session {
    pub position: Option<Position>,
    pub options: HashMap<String, String>,
}

impl Session {
    /// Creates a session with no position and default options.
    pub fn new() -> Self {
        Session {
            position: None,
            options: HashMap::new(),
        }
    }

    /// Sets the current position. On failure the previous position is kept.
    pub fn set_position(&mut self, spec: &PositionSpec) -> Result<(), CodecError> {
        let fen = match spec {
            PositionSpec::StartPos => STARTPOS_FEN,
            PositionSpec::Fen(fen) => fen.as_str(),
        };
        let position = parse_fen_with(fen, &self.fen_options())?;
        debug!("position set: {}", fen);
        self.position = Some(position);
        Ok(())
    }

    /// Sets a codec option.
    pub fn set_option(&mut self, name: String, value: Option<String>) {
        self.options.insert(name, value.unwrap_or_default());
    }

    /// FEN parsing options derived from the session options.
    pub fn fen_options(&self) -> FenOptions {
        let strict_castling = match self.options.get(STRICT_CASTLING_OPTION) {
            Some(v) => match v.as_str() {
                "true" => true,
                "false" | "" => false,
                other => {
                    warn!("ignoring {} value '{}'", STRICT_CASTLING_OPTION, other);
                    false
                }
            },
            None => false,
        };
        FenOptions { strict_castling }
    }

    fn current(&self) -> Result<&Position, SessionError> {
        self.position.as_ref().ok_or(SessionError::NoPosition)
    }

    /// Encodes `uci` played in the current position.
    pub fn encode(&self, uci: &str) -> Result<PolicyIndex, SessionError> {
        let pos = self.current()?;
        let mv = parse_move(uci)?;
        let piece = pos.piece_kind_at(mv.from);
        if piece == PieceKind::Empty {
            return Err(SessionError::EmptyFromSquare(mv.from.name()));
        }
        Ok(encode_move(&mv, piece, pos.side_to_move)?)
    }

    /// Decodes `index` in the context of the current position.
    pub fn decode(&self, index: usize) -> Result<String, SessionError> {
        let pos = self.current()?;
        let index = PolicyIndex::new(index)?;
        let piece = pos.piece_kind_at(index.from_square());
        let mv = decode_index(index, piece, pos.side_to_move)?;
        Ok(mv.to_string())
    }

    /// Returns the sum of each input plane for the current position.
    pub fn plane_sums(&self) -> Result<[f32; NUM_PLANES], SessionError> {
        let tensor = encode_position(self.current()?);
        let mut sums = [0.0f32; NUM_PLANES];
        for (plane, sum) in sums.iter_mut().enumerate() {
            *sum = tensor.plane_sum(plane);
        }
        Ok(sums)
    }

    /// Side to move in the current position, if one is set.
    pub fn side_to_move(&self) -> Option<Color> {
        self.position.as_ref().map(|p| p.side_to_move)
    }

    /// Handles the handshake: writes id and option lines, then `codecok`.
    pub fn handle_codec<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name hyperion-codec")?;
        writeln!(out, "id author hyperion")?;
        writeln!(
            out,
            "option name {} type check default false",
            STRICT_CASTLING_OPTION
        )?;
        writeln!(out, "codecok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles `position`, reporting parse failures as an error line.
    pub fn handle_position<W: Write>(&mut self, spec: &PositionSpec, out: &mut W) -> io::Result<()> {
        if let Err(e) = self.set_position(spec) {
            return write_error(out, &e);
        }
        Ok(())
    }

    /// Handles `encode <uci>`: writes `index <n> type <t>`.
    pub fn handle_encode<W: Write>(&self, uci: &str, out: &mut W) -> io::Result<()> {
        match self.encode(uci) {
            Ok(index) => {
                writeln!(out, "index {} type {}", index, index.move_type_index())?;
                out.flush()
            }
            Err(e) => write_error(out, &e),
        }
    }

    /// Handles `decode <n>`: writes `move <uci>`.
    pub fn handle_decode<W: Write>(&self, index: usize, out: &mut W) -> io::Result<()> {
        match self.decode(index) {
            Ok(text) => {
                writeln!(out, "move {}", text)?;
                out.flush()
            }
            Err(e) => write_error(out, &e),
        }
    }

    /// Handles `planes`: writes the per-plane sums on one line.
    pub fn handle_planes<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.plane_sums() {
            Ok(sums) => {
                let parts: Vec<String> = sums.iter().map(|s| format!("{}", s)).collect();
                writeln!(out, "planes {}", parts.join(" "))?;
                out.flush()
            }
            Err(e) => write_error(out, &e),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

fn write_error<W: Write>(out: &mut W, err: &dyn std::fmt::Display) -> io::Result<()> {
    warn!("{}", err);
    writeln!(out, "error {}", err)?;
    out.flush()
}
