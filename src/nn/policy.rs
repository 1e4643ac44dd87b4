//! Move <-> policy index codec for the 8x8x73 policy head.
//!
//! Every move is addressed as `from_square * 73 + move_type`, where
//! `move_type` falls into one of three disjoint ranges:
//!
//!   [0, 56)   queen-like slides: direction * 7 + (distance - 1)
//!   [56, 64)  knight jumps: 56 + knight direction
//!   [64, 73)  underpromotions: 64 + piece slot * 3 + pawn direction
//!
//! Queen promotions, castling (a two-square king slide) and plain pawn moves
//! all go through the slide range. The moving piece kind and side to move are
//! supplied by the caller from the position the move was played in.

use crate::board::{Color, Move, PieceKind, Square};
use crate::error::CodecError;
use crate::protocol::uci::parse_move;

/// Maximum slide distance.
pub const MAX_SLIDE_DISTANCE: usize = 7;

/// Number of slide move types (8 directions x 7 distances).
pub const SLIDE_MOVE_TYPES: usize = 8 * MAX_SLIDE_DISTANCE;

/// Number of knight move types.
pub const KNIGHT_MOVE_TYPES: usize = 8;

/// Number of underpromotion move types (3 pieces x 3 pawn directions).
pub const UNDERPROMOTION_MOVE_TYPES: usize = 3 * 3;

/// First knight move type.
pub const KNIGHT_BASE: usize = SLIDE_MOVE_TYPES;

/// First underpromotion move type.
pub const UNDERPROMOTION_BASE: usize = KNIGHT_BASE + KNIGHT_MOVE_TYPES;

/// Move types per from-square.
pub const MOVE_TYPES: usize = UNDERPROMOTION_BASE + UNDERPROMOTION_MOVE_TYPES;

/// Size of the policy vector.
pub const POLICY_SIZE: usize = 64 * MOVE_TYPES;

/// Slide directions N, NE, E, SE, S, SW, W, NW as (file step, rank step).
/// The matching linear-index deltas are 8, 9, 1, -7, -8, -9, -1, 7.
const SLIDE_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Knight jumps as (file delta, rank delta), in direction-id order.
/// The matching linear-index deltas are 17, 10, -6, -15, -17, -10, 6, 15.
const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Pawn file steps for underpromotions as seen by the mover: straight, left
/// diagonal, right diagonal. Black's left is White's right, so the file step
/// is mirrored for Black.
const PAWN_FILE_STEPS: [i8; 3] = [0, -1, 1];

/// A classified `move_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveType {
    /// Queen-like move; `direction` 0..8 (N clockwise), `distance` 1..=7.
    Slide { direction: u8, distance: u8 },
    /// Knight jump; `direction` 0..8.
    Knight { direction: u8 },
    /// Underpromotion; `piece` is knight, bishop or rook, `direction` 0..3
    /// is straight, left diagonal, right diagonal from the mover's view.
    Underpromotion { piece: PieceKind, direction: u8 },
}

impl MoveType {
    /// Returns the raw move type in [0, 73), or None if a field is out of
    /// range for its variant (direction, distance, or a non-underpromotion
    /// piece).
    pub fn index(self) -> Option<usize> {
        match self {
            MoveType::Slide {
                direction,
                distance,
            } if (direction as usize) < SLIDE_DIRECTIONS.len()
                && (1..=MAX_SLIDE_DISTANCE).contains(&(distance as usize)) =>
            {
                Some(direction as usize * MAX_SLIDE_DISTANCE + (distance as usize - 1))
            }
            MoveType::Knight { direction } if (direction as usize) < KNIGHT_MOVE_TYPES => {
                Some(KNIGHT_BASE + direction as usize)
            }
            MoveType::Underpromotion { piece, direction }
                if (direction as usize) < PAWN_FILE_STEPS.len() =>
            {
                let slot = piece.underpromotion_slot()? as usize;
                Some(UNDERPROMOTION_BASE + slot * 3 + direction as usize)
            }
            _ => None,
        }
    }

    /// Splits a raw move type back into its variant. Returns None for
    /// values outside [0, 73).
    pub fn from_index(move_type: usize) -> Option<MoveType> {
        match move_type {
            t if t < KNIGHT_BASE => Some(MoveType::Slide {
                direction: (t / MAX_SLIDE_DISTANCE) as u8,
                distance: (t % MAX_SLIDE_DISTANCE + 1) as u8,
            }),
            t if t < UNDERPROMOTION_BASE => Some(MoveType::Knight {
                direction: (t - KNIGHT_BASE) as u8,
            }),
            t if t < MOVE_TYPES => {
                let rel = t - UNDERPROMOTION_BASE;
                Some(MoveType::Underpromotion {
                    piece: PieceKind::from_underpromotion_slot((rel / 3) as u8)?,
                    direction: (rel % 3) as u8,
                })
            }
            _ => None,
        }
    }
}

/// An index into the policy vector, always in [0, 4672).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PolicyIndex(u16);

impl PolicyIndex {
    pub fn new(index: usize) -> Result<PolicyIndex, CodecError> {
        if index < POLICY_SIZE {
            Ok(PolicyIndex(index as u16))
        } else {
            Err(CodecError::PolicyIndexOutOfRange(index))
        }
    }

    fn from_parts(from: Square, move_type: MoveType) -> Result<PolicyIndex, CodecError> {
        let raw = move_type
            .index()
            .ok_or_else(|| CodecError::InvalidMoveType(format!("{:?}", move_type)))?;
        PolicyIndex::new(from.index() * MOVE_TYPES + raw)
    }

    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }

    pub fn from_square(self) -> Square {
        // 4671 / 73 = 63, so the square is always on the board.
        Square::from_index_masked((self.get() / MOVE_TYPES) as u8)
    }

    /// Raw move type in [0, 73).
    pub fn move_type_index(self) -> usize {
        self.get() % MOVE_TYPES
    }

    pub fn move_type(self) -> MoveType {
        MoveType::from_index(self.move_type_index())
            .unwrap_or_else(|| unreachable!("move type is reduced modulo {}", MOVE_TYPES))
    }
}

impl std::fmt::Display for PolicyIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the three move-type ranges a move belongs to.
enum MoveClass {
    Knight,
    Underpromotion(PieceKind),
    Slide,
}

fn classify(mv: &Move, piece: PieceKind) -> MoveClass {
    match (piece, mv.promotion) {
        (PieceKind::Knight, _) => MoveClass::Knight,
        (_, Some(promo)) if mv.is_underpromotion() => MoveClass::Underpromotion(promo),
        _ => MoveClass::Slide,
    }
}

fn knight_direction(mv: &Move) -> Option<u8> {
    let step = (mv.file_delta(), mv.rank_delta());
    KNIGHT_JUMPS
        .iter()
        .position(|&jump| jump == step)
        .map(|d| d as u8)
}

fn pawn_direction(mv: &Move, side: Color) -> Option<u8> {
    if mv.rank_delta() != side.forward() {
        return None;
    }
    let file_step = mv.file_delta() * side.forward();
    PAWN_FILE_STEPS
        .iter()
        .position(|&step| step == file_step)
        .map(|d| d as u8)
}

/// Returns (direction, distance) for a straight or diagonal move.
fn slide_direction(mv: &Move) -> Option<(u8, u8)> {
    let (df, dr) = (mv.file_delta(), mv.rank_delta());
    if (df == 0 && dr == 0) || (df != 0 && dr != 0 && df.abs() != dr.abs()) {
        return None;
    }
    let distance = if df == 0 { dr.abs() } else { df.abs() };
    let step = (df.signum(), dr.signum());
    let direction = SLIDE_DIRECTIONS.iter().position(|&d| d == step)?;
    Some((direction as u8, distance as u8))
}

/// Encodes a move into its policy index.
pub fn encode_move(mv: &Move, piece: PieceKind, side: Color) -> Result<PolicyIndex, CodecError> {
    let move_type = match classify(mv, piece) {
        MoveClass::Knight => {
            let direction = knight_direction(mv).ok_or_else(|| CodecError::IllegalKnightDelta {
                text: mv.to_string(),
                delta: mv.delta(),
            })?;
            MoveType::Knight { direction }
        }
        MoveClass::Underpromotion(promo) => {
            let direction = pawn_direction(mv, side).ok_or_else(|| CodecError::IllegalPawnDelta {
                text: mv.to_string(),
                delta: mv.delta(),
            })?;
            MoveType::Underpromotion {
                piece: promo,
                direction,
            }
        }
        MoveClass::Slide => {
            let (direction, distance) =
                slide_direction(mv).ok_or_else(|| CodecError::IllegalSlideDelta {
                    text: mv.to_string(),
                    delta: mv.delta(),
                })?;
            MoveType::Slide {
                direction,
                distance,
            }
        }
    };

    PolicyIndex::from_parts(mv.from, move_type)
}

/// Encodes UCI move text into its policy index.
pub fn encode(move_text: &str, piece: PieceKind, side: Color) -> Result<PolicyIndex, CodecError> {
    let mv = parse_move(move_text)?;
    encode_move(&mv, piece, side)
}

/// Decodes a policy index into a move.
///
/// A slide by a pawn that lands on its promotion rank decodes as a queen
/// promotion.
pub fn decode_index(index: PolicyIndex, piece: PieceKind, side: Color) -> Result<Move, CodecError> {
    let from = index.from_square();
    let off_board = || CodecError::OffBoardTarget(index.get());

    let mv = match index.move_type() {
        MoveType::Slide {
            direction,
            distance,
        } => {
            let (sf, sr) = SLIDE_DIRECTIONS[direction as usize];
            let d = distance as i8;
            let to = from.offset(sf * d, sr * d).ok_or_else(off_board)?;
            if piece == PieceKind::Pawn && to.rank() == side.promotion_rank() {
                Move::with_promotion(from, to, PieceKind::Queen)
            } else {
                Move::new(from, to)
            }
        }
        MoveType::Knight { direction } => {
            let (df, dr) = KNIGHT_JUMPS[direction as usize];
            Move::new(from, from.offset(df, dr).ok_or_else(off_board)?)
        }
        MoveType::Underpromotion {
            piece: promo,
            direction,
        } => {
            let df = PAWN_FILE_STEPS[direction as usize] * side.forward();
            let to = from.offset(df, side.forward()).ok_or_else(off_board)?;
            Move::with_promotion(from, to, promo)
        }
    };

    Ok(mv)
}

/// Decodes a raw policy index into UCI move text.
pub fn decode(index: usize, piece: PieceKind, side: Color) -> Result<String, CodecError> {
    let index = PolicyIndex::new(index)?;
    decode_index(index, piece, side).map(|mv| mv.to_string())
}

/// Returns a one-hot policy target with 1.0 at `index`.
pub fn policy_target(index: PolicyIndex) -> Vec<f32> {
    let mut target = vec![0.0f32; POLICY_SIZE];
    target[index.get()] = 1.0;
    target
}
