//! Position -> input plane encoding for the policy/value network.
//!
//! Produces a [20, 8, 8] f32 tensor, plane-major. Within a plane, row is the
//! rank index (row 0 = rank 1) and column is the file index (col 0 = file a),
//! so a1 sits at [p, 0, 0] and h8 at [p, 7, 7].
//!
//! Plane layout (changing it breaks trained models):
//!   [0:6]   white P, N, B, R, Q, K (one-hot)
//!   [6:12]  black P, N, B, R, Q, K (one-hot)
//!   [12]    side to move: 1.0 white, 0.0 black (broadcast)
//!   [13:17] castling rights WK, WQ, BK, BQ (broadcast)
//!   [17]    en passant target square (one-hot)
//!   [18]    halfmove clock / 100, clamped to 1.0 (broadcast)
//!   [19]    fullmove number / 200, clamped to 1.0 (broadcast)

use crate::board::{Color, Position};
use crate::error::CodecError;
use crate::protocol::fen::{parse_fen_with, FenOptions};

/// Total number of input planes.
pub const NUM_PLANES: usize = 20;

/// Cells per plane.
pub const PLANE_SIZE: usize = 64;

/// Number of f32 values in an encoded position.
pub const TENSOR_LEN: usize = NUM_PLANES * PLANE_SIZE;

pub const SIDE_TO_MOVE_PLANE: usize = 12;
pub const WK_CASTLE_PLANE: usize = 13;
pub const WQ_CASTLE_PLANE: usize = 14;
pub const BK_CASTLE_PLANE: usize = 15;
pub const BQ_CASTLE_PLANE: usize = 16;
pub const EN_PASSANT_PLANE: usize = 17;
pub const HALFMOVE_PLANE: usize = 18;
pub const FULLMOVE_PLANE: usize = 19;

/// Halfmove clock value that maps to 1.0 (the fifty-move rule horizon).
const HALFMOVE_NORM: f32 = 100.0;

/// Fullmove number that maps to 1.0.
const FULLMOVE_NORM: f32 = 200.0;

/// An encoded position: 20 planes of 8x8 f32 values.
#[derive(Clone, PartialEq)]
pub struct PlaneTensor {
    data: [f32; TENSOR_LEN],
}

impl PlaneTensor {
    pub fn zeros() -> Self {
        PlaneTensor {
            data: [0.0; TENSOR_LEN],
        }
    }

    /// Returns the value at (plane, rank, file).
    #[inline]
    pub fn get(&self, plane: usize, rank: usize, file: usize) -> f32 {
        self.data[plane * PLANE_SIZE + rank * 8 + file]
    }

    #[inline]
    fn set(&mut self, plane: usize, cell: usize, value: f32) {
        self.data[plane * PLANE_SIZE + cell] = value;
    }

    fn fill(&mut self, plane: usize, value: f32) {
        let start = plane * PLANE_SIZE;
        self.data[start..start + PLANE_SIZE].fill(value);
    }

    /// Returns the 64 cells of a plane, indexed by square.
    pub fn plane(&self, plane: usize) -> &[f32] {
        &self.data[plane * PLANE_SIZE..(plane + 1) * PLANE_SIZE]
    }

    /// Sum of all cells in a plane.
    pub fn plane_sum(&self, plane: usize) -> f32 {
        self.plane(plane).iter().sum()
    }

    /// Flat row-major view of the whole tensor.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.data.to_vec()
    }

    /// Converts into an `ndarray` of shape (20, 8, 8).
    #[cfg(feature = "ndarray")]
    pub fn to_array3(&self) -> ndarray::Array3<f32> {
        ndarray::Array3::from_shape_fn((NUM_PLANES, 8, 8), |(plane, rank, file)| {
            self.get(plane, rank, file)
        })
    }
}

impl std::fmt::Debug for PlaneTensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sums: Vec<f32> = (0..NUM_PLANES).map(|p| self.plane_sum(p)).collect();
        f.debug_struct("PlaneTensor").field("plane_sums", &sums).finish()
    }
}

/// Encodes a parsed `Position` into input planes.
pub fn encode_position(pos: &Position) -> PlaneTensor {
    let mut tensor = PlaneTensor::zeros();

    for (sq, piece) in pos.pieces() {
        if let Some(plane) = piece.plane() {
            tensor.set(plane, sq.index(), 1.0);
        }
    }

    if pos.side_to_move == Color::White {
        tensor.fill(SIDE_TO_MOVE_PLANE, 1.0);
    }

    for (i, &allowed) in pos.castling.as_array().iter().enumerate() {
        if allowed {
            tensor.fill(WK_CASTLE_PLANE + i, 1.0);
        }
    }

    if let Some(sq) = pos.en_passant {
        tensor.set(EN_PASSANT_PLANE, sq.index(), 1.0);
    }

    tensor.fill(
        HALFMOVE_PLANE,
        (pos.halfmove_clock as f32 / HALFMOVE_NORM).min(1.0),
    );
    tensor.fill(
        FULLMOVE_PLANE,
        (pos.fullmove_number as f32 / FULLMOVE_NORM).min(1.0),
    );

    tensor
}

/// Encodes a FEN string into input planes with lenient castling parsing.
pub fn encode(fen: &str) -> Result<PlaneTensor, CodecError> {
    encode_with(fen, &FenOptions::default())
}

/// Encodes a FEN string into input planes.
pub fn encode_with(fen: &str, options: &FenOptions) -> Result<PlaneTensor, CodecError> {
    let pos = parse_fen_with(fen, options)?;
    Ok(encode_position(&pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::fen::STARTPOS_FEN;

    const P_W: usize = 0;
    const N_W: usize = 1;
    const B_W: usize = 2;
    const R_W: usize = 3;
    const Q_W: usize = 4;
    const K_W: usize = 5;
    const P_B: usize = 6;
    const R_B: usize = 9;
    const Q_B: usize = 10;
    const K_B: usize = 11;

    fn all_equal(tensor: &PlaneTensor, plane: usize, value: f32) -> bool {
        tensor.plane(plane).iter().all(|&v| v == value)
    }

    fn assert_ep_plane(tensor: &PlaneTensor, expected: Option<(usize, usize)>) {
        for rank in 0..8 {
            for file in 0..8 {
                let want = if expected == Some((rank, file)) { 1.0 } else { 0.0 };
                assert_eq!(
                    tensor.get(EN_PASSANT_PLANE, rank, file),
                    want,
                    "en passant plane mismatch at ({}, {})",
                    rank,
                    file
                );
            }
        }
    }

    #[test]
    fn tensor_shape_and_values() {
        let tensor = encode(STARTPOS_FEN).unwrap();
        assert_eq!(tensor.as_slice().len(), TENSOR_LEN);
        assert_eq!(TENSOR_LEN, 20 * 8 * 8);
        for &v in tensor.as_slice() {
            assert!((0.0..=1.0).contains(&v), "value out of range: {}", v);
        }
    }

    #[test]
    fn initial_position_piece_planes() {
        let t = encode(STARTPOS_FEN).unwrap();

        for file in 0..8 {
            assert_eq!(t.get(P_W, 1, file), 1.0, "white pawn missing on file {}", file);
            assert_eq!(t.get(P_B, 6, file), 1.0, "black pawn missing on file {}", file);
            assert_eq!(t.get(P_W, 0, file), 0.0);
        }
        assert_eq!(t.plane_sum(P_W), 8.0);

        assert_eq!(t.get(R_W, 0, 0), 1.0);
        assert_eq!(t.get(R_W, 0, 7), 1.0);
        assert_eq!(t.get(N_W, 0, 1), 1.0);
        assert_eq!(t.get(N_W, 0, 6), 1.0);
        assert_eq!(t.get(B_W, 0, 2), 1.0);
        assert_eq!(t.get(B_W, 0, 5), 1.0);
        assert_eq!(t.get(Q_W, 0, 3), 1.0);
        assert_eq!(t.get(K_W, 0, 4), 1.0);
        assert_eq!(t.get(R_B, 7, 0), 1.0);
        assert_eq!(t.get(R_B, 7, 7), 1.0);
        assert_eq!(t.get(Q_B, 7, 3), 1.0);
        assert_eq!(t.get(K_B, 7, 4), 1.0);

        let total: f32 = (0..12).map(|p| t.plane_sum(p)).sum();
        assert_eq!(total, 32.0);
    }

    #[test]
    fn initial_position_auxiliary_planes() {
        let t = encode(STARTPOS_FEN).unwrap();
        assert!(all_equal(&t, SIDE_TO_MOVE_PLANE, 1.0));
        for plane in WK_CASTLE_PLANE..=BQ_CASTLE_PLANE {
            assert!(all_equal(&t, plane, 1.0), "castling plane {} not set", plane);
        }
        assert_ep_plane(&t, None);
        assert!(all_equal(&t, HALFMOVE_PLANE, 0.0));
        assert!(all_equal(&t, FULLMOVE_PLANE, 1.0 / 200.0));
    }

    #[test]
    fn side_to_move() {
        for (fen, expected) in [
            (STARTPOS_FEN, 1.0),
            ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1", 0.0),
            ("4k3/8/8/8/8/8/8/4K2R w K - 0 1", 1.0),
        ] {
            let t = encode(fen).unwrap();
            assert!(all_equal(&t, SIDE_TO_MOVE_PLANE, expected), "{}", fen);
        }
    }

    #[test]
    fn castling_rights() {
        for (fen, rights) in [
            ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Kk - 0 1", [1.0, 0.0, 1.0, 0.0]),
            ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w Qq - 0 1", [0.0, 1.0, 0.0, 1.0]),
            ("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1", [0.0; 4]),
            ("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", [1.0, 1.0, 0.0, 0.0]),
            ("r3k2r/8/8/8/8/8/8/4K3 b kq - 0 1", [0.0, 0.0, 1.0, 1.0]),
            (
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
                [1.0; 4],
            ),
        ] {
            let t = encode(fen).unwrap();
            for (i, &want) in rights.iter().enumerate() {
                assert!(
                    all_equal(&t, WK_CASTLE_PLANE + i, want),
                    "castling plane {} wrong for {}",
                    WK_CASTLE_PLANE + i,
                    fen
                );
            }
        }
    }

    #[test]
    fn en_passant_target() {
        for (fen, expected) in [
            ("rnbqkbnr/pppp1ppp/8/4p3/3P4/8/PPP1PPPP/RNBQKBNR w KQkq e6 0 2", Some((5, 4))),
            ("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR b KQkq d3 0 2", Some((2, 3))),
            ("8/4k3/8/8/3pP3/8/4K3/8 w - d3 0 1", Some((2, 3))),
            ("8/4k3/8/3Pp3/8/8/4K3/8 b - e6 0 1", Some((5, 4))),
        ] {
            let t = encode(fen).unwrap();
            assert_ep_plane(&t, expected);
        }
    }

    #[test]
    fn counters_normalize_and_clamp() {
        for (halfmove, fullmove, want_half, want_full) in [
            (0, 1, 0.0, 1.0 / 200.0),
            (25, 50, 0.25, 0.25),
            (100, 1, 1.0, 1.0 / 200.0),
            (150, 1, 1.0, 1.0 / 200.0),
            (0, 200, 0.0, 1.0),
            (0, 300, 0.0, 1.0),
        ] {
            let fen = format!(
                "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - {} {}",
                halfmove, fullmove
            );
            let t = encode(&fen).unwrap();
            assert!((t.get(HALFMOVE_PLANE, 3, 3) - want_half).abs() < 1e-6, "{}", fen);
            assert!((t.get(FULLMOVE_PLANE, 3, 3) - want_full).abs() < 1e-6, "{}", fen);
            assert!(all_equal(&t, HALFMOVE_PLANE, t.get(HALFMOVE_PLANE, 0, 0)));
            assert!(all_equal(&t, FULLMOVE_PLANE, t.get(FULLMOVE_PLANE, 0, 0)));
        }
    }

    #[test]
    fn counters_beyond_u32_clamp_to_one() {
        let t = encode("8/8/8/8/8/8/8/8 w - - 4294967296 4294967296").unwrap();
        assert!(all_equal(&t, HALFMOVE_PLANE, 1.0));
        assert!(all_equal(&t, FULLMOVE_PLANE, 1.0));
    }

    #[test]
    fn kings_only_board() {
        let t = encode("8/4k3/8/8/8/8/3K4/8 w - - 0 1").unwrap();
        assert_eq!(t.get(K_W, 1, 3), 1.0);
        assert_eq!(t.get(K_B, 6, 4), 1.0);
        let total: f32 = (0..12).map(|p| t.plane_sum(p)).sum();
        assert_eq!(total, 2.0);
    }

    #[test]
    fn errors_propagate() {
        assert!(matches!(
            encode("8/8/8/8 w - - 0"),
            Err(CodecError::MalformedPosition { .. })
        ));
        assert_eq!(
            encode("8/8/8/8/8/8/8/8 w - - 0 one"),
            Err(CodecError::InvalidCounter("one".to_string()))
        );
        let strict = FenOptions {
            strict_castling: true,
        };
        assert_eq!(
            encode_with("8/8/8/8/8/8/8/8 w KZ - 0 1", &strict),
            Err(CodecError::InvalidCastlingChar('Z'))
        );
    }

    #[cfg(feature = "ndarray")]
    #[test]
    fn ndarray_view_matches_layout() {
        let t = encode(STARTPOS_FEN).unwrap();
        let arr = t.to_array3();
        assert_eq!(arr.shape(), &[NUM_PLANES, 8, 8]);
        assert_eq!(arr[[K_W, 0, 4]], 1.0);
        assert_eq!(arr[[P_B, 6, 0]], 1.0);
    }
}
