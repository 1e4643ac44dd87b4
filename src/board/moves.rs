//! Move representation.
//!
//! A move is a from/to square pair with an optional promotion piece. It
//! carries no knowledge of the moving piece or side; the codec receives those
//! separately from the position the move was played in.

use super::piece::PieceKind;
use super::square::Square;

/// A move between two squares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// Promotion piece: knight, bishop, rook or queen.
    pub promotion: Option<PieceKind>,
}

impl Move {
    pub const fn new(from: Square, to: Square) -> Self {
        Move {
            from,
            to,
            promotion: None,
        }
    }

    pub const fn with_promotion(from: Square, to: Square, promotion: PieceKind) -> Self {
        Move {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// Linear-index difference `to - from`.
    #[inline]
    pub const fn delta(self) -> i8 {
        self.to.index() as i8 - self.from.index() as i8
    }

    #[inline]
    pub const fn file_delta(self) -> i8 {
        self.to.file() as i8 - self.from.file() as i8
    }

    #[inline]
    pub const fn rank_delta(self) -> i8 {
        self.to.rank() as i8 - self.from.rank() as i8
    }

    /// Returns true if the move promotes to a knight, bishop, or rook.
    pub fn is_underpromotion(self) -> bool {
        self.promotion
            .is_some_and(|kind| kind.underpromotion_slot().is_some())
    }
}
