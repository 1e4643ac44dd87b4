//! Parsed chess position.
//!
//! Holds the six FEN fields in structured form. The position is a snapshot
//! only: nothing here validates legality or tracks game history.

use super::piece::{Color, Piece, PieceKind};
use super::square::{Square, SQUARE_COUNT};

/// The four independent castling-availability flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        white_kingside: true,
        white_queenside: true,
        black_kingside: true,
        black_queenside: true,
    };

    /// Returns the flags in plane order: WK, WQ, BK, BQ.
    pub const fn as_array(self) -> [bool; 4] {
        [
            self.white_kingside,
            self.white_queenside,
            self.black_kingside,
            self.black_queenside,
        ]
    }

    pub const fn is_empty(self) -> bool {
        !(self.white_kingside || self.white_queenside || self.black_kingside || self.black_queenside)
    }
}

/// A complete chess position as described by a FEN string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Piece placement indexed by square (a1 = 0).
    pub squares: [Option<Piece>; SQUARE_COUNT],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Position {
    /// Returns an empty board with White to move and no rights.
    pub fn empty() -> Self {
        Position {
            squares: [None; SQUARE_COUNT],
            side_to_move: Color::White,
            castling: CastlingRights::default(),
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Returns the kind of the piece on `square`, or `PieceKind::Empty`.
    pub fn piece_kind_at(&self, square: Square) -> PieceKind {
        self.piece_at(square)
            .map_or(PieceKind::Empty, |piece| piece.kind)
    }

    pub fn place(&mut self, square: Square, piece: Piece) {
        self.squares[square.index()] = Some(piece);
    }

    /// Iterates over occupied squares and their pieces.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |sq| self.piece_at(sq).map(|p| (sq, p)))
    }
}
