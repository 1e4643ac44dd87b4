//! Square indexing.
//!
//! Squares are numbered 0..63 starting at a1 and running file-major within a
//! rank: a1 = 0, b1 = 1, ..., h1 = 7, a2 = 8, ..., h8 = 63.

use std::fmt;

use crate::error::CodecError;

/// The number of squares on the board.
pub const SQUARE_COUNT: usize = 64;

/// A board square, stored as its linear index 0..63.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    /// Returns the square with the given linear index, if it is on the board.
    pub const fn new(index: u8) -> Option<Square> {
        if (index as usize) < SQUARE_COUNT {
            Some(Square(index))
        } else {
            None
        }
    }

    /// Returns the square at (file, rank), both 0..7.
    pub const fn from_coords(file: u8, rank: u8) -> Option<Square> {
        if file < 8 && rank < 8 {
            Some(Square(rank * 8 + file))
        } else {
            None
        }
    }

    /// Builds a square from an index already known to be below 64.
    pub(crate) const fn from_index_masked(index: u8) -> Square {
        Square(index & 63)
    }

    /// Parses an algebraic square name such as "e4".
    ///
    /// The name must be exactly a lowercase file letter followed by a rank digit.
    pub fn from_name(name: &str) -> Result<Square, CodecError> {
        match name.as_bytes() {
            [f @ b'a'..=b'h', r @ b'1'..=b'8'] => Ok(Square((r - b'1') * 8 + (f - b'a'))),
            _ => Err(CodecError::InvalidSquare(name.to_string())),
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Returns the square shifted by `file_delta` files and `rank_delta` ranks,
    /// or None if that leaves the board.
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Square::from_coords(file as u8, rank as u8)
        } else {
            None
        }
    }

    /// Returns the algebraic name of this square.
    pub fn name(self) -> String {
        self.to_string()
    }

    /// Iterates over all 64 squares in index order.
    pub fn iter() -> impl Iterator<Item = Square> {
        (0..SQUARE_COUNT as u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file()) as char,
            (b'1' + self.rank()) as char
        )
    }
}

/// Maps an algebraic square name to its index.
pub fn square_to_index(name: &str) -> Result<Square, CodecError> {
    Square::from_name(name)
}

/// Maps a square to its algebraic name.
pub fn index_to_square(square: Square) -> String {
    square.name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_squares() {
        assert_eq!(square_to_index("a1").unwrap().index(), 0);
        assert_eq!(square_to_index("h1").unwrap().index(), 7);
        assert_eq!(square_to_index("a8").unwrap().index(), 56);
        assert_eq!(square_to_index("h8").unwrap().index(), 63);
        assert_eq!(square_to_index("e4").unwrap().index(), 28);
    }

    #[test]
    fn name_roundtrip_all_squares() {
        for sq in Square::iter() {
            let name = index_to_square(sq);
            assert_eq!(square_to_index(&name).unwrap(), sq, "roundtrip failed for {}", name);
        }
    }

    #[test]
    fn file_and_rank() {
        let e6 = Square::from_name("e6").unwrap();
        assert_eq!(e6.file(), 4);
        assert_eq!(e6.rank(), 5);
    }

    #[test]
    fn rejects_malformed_names() {
        for bad in ["", "e", "e9", "i1", "E4", "e0", "e44", "4e", " e4"] {
            assert_eq!(
                square_to_index(bad),
                Err(CodecError::InvalidSquare(bad.to_string())),
                "'{}' should be rejected",
                bad
            );
        }
    }

    #[test]
    fn offset_stays_on_board() {
        let h1 = Square::from_name("h1").unwrap();
        assert_eq!(h1.offset(1, 0), None);
        assert_eq!(h1.offset(0, -1), None);
        assert_eq!(h1.offset(-1, 1), Square::from_name("g2").ok());
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(Square::new(63).is_some());
        assert!(Square::new(64).is_none());
    }
}
