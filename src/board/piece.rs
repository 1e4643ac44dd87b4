//! Piece kinds, colors, and the piece-character table.
//!
//! FEN piece letters are uppercase for White and lowercase for Black. The
//! letter case only carries color; the kind is case-insensitive.

use crate::error::CodecError;

/// The kind of a piece, independent of its color.
///
/// `Empty` stands for "no piece" where a kind is needed for an unoccupied
/// square (for example when looking up the moving piece of a move).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    Empty = 0,
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

/// The six real piece kinds, in plane order.
pub const ALL_PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

impl PieceKind {
    /// Returns the lowercase FEN letter, or '.' for `Empty`.
    pub const fn fen_char(self) -> char {
        match self {
            PieceKind::Empty => '.',
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Parses a piece kind from a letter, ignoring case.
    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    /// Parses the promotion suffix of a UCI move (lowercase `n`, `b`, `r`, `q`).
    pub fn from_promotion_char(c: char) -> Option<PieceKind> {
        match c {
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            _ => None,
        }
    }

    /// Returns the slot of an underpromotion piece (knight 0, bishop 1, rook 2).
    pub const fn underpromotion_slot(self) -> Option<u8> {
        match self {
            PieceKind::Knight => Some(0),
            PieceKind::Bishop => Some(1),
            PieceKind::Rook => Some(2),
            PieceKind::Empty | PieceKind::Pawn | PieceKind::Queen | PieceKind::King => None,
        }
    }

    /// Inverse of [`PieceKind::underpromotion_slot`].
    pub const fn from_underpromotion_slot(slot: u8) -> Option<PieceKind> {
        match slot {
            0 => Some(PieceKind::Knight),
            1 => Some(PieceKind::Bishop),
            2 => Some(PieceKind::Rook),
            _ => None,
        }
    }
}

/// A side in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const fn flip(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The rank direction pawns of this color advance in.
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The rank index (0..7) on which pawns of this color promote.
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Returns the FEN side-to-move token.
    pub const fn fen_char(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

/// A colored piece as it appears on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }

    /// Parses a FEN piece letter (`PNBRQKpnbrqk`).
    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece { kind, color })
    }

    /// Returns the FEN letter for this piece.
    pub fn fen_char(self) -> char {
        let c = self.kind.fen_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Returns the one-hot plane this piece occupies: white P..K are 0..5,
    /// black P..K are 6..11. `Empty` pieces have no plane.
    pub const fn plane(self) -> Option<usize> {
        let kind_offset = match self.kind {
            PieceKind::Empty => return None,
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        };
        let color_offset = match self.color {
            Color::White => 0,
            Color::Black => 6,
        };
        Some(color_offset + kind_offset)
    }
}

/// Looks up a FEN piece letter in the piece table.
pub fn piece_from_char(c: char) -> Result<Piece, CodecError> {
    Piece::from_fen_char(c).ok_or(CodecError::UnknownPieceChar(c))
}
