//! Error taxonomy shared by the position encoder and the move codec.
//!
//! Every variant is a local data-validity error: nothing here is transient,
//! so callers should surface the error rather than retry.

/// Errors raised while parsing positions, moves, or policy indices.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("invalid square name: '{0}'")]
    InvalidSquare(String),

    #[error("unknown piece character: '{0}'")]
    UnknownPieceChar(char),

    #[error("malformed position '{text}': {reason}")]
    MalformedPosition { text: String, reason: String },

    #[error("rank {rank} describes {files} files, expected 8")]
    RankOverflow { rank: u8, files: usize },

    #[error("invalid side to move: '{0}'")]
    InvalidSideToMove(String),

    #[error("invalid castling character: '{0}'")]
    InvalidCastlingChar(char),

    #[error("invalid move counter: '{0}'")]
    InvalidCounter(String),

    #[error("malformed move text: '{0}'")]
    MalformedMove(String),

    #[error("move '{text}' has delta {delta}, which is not a knight jump")]
    IllegalKnightDelta { text: String, delta: i8 },

    #[error("move '{text}' has delta {delta}, which is not a promoting pawn step")]
    IllegalPawnDelta { text: String, delta: i8 },

    #[error("invalid promotion character: '{0}'")]
    InvalidPromotionChar(char),

    #[error("move '{text}' has delta {delta}, which is not a straight or diagonal slide")]
    IllegalSlideDelta { text: String, delta: i8 },

    #[error("policy index {0} is outside [0, 4672)")]
    PolicyIndexOutOfRange(usize),

    #[error("move type {0} has a field outside its range")]
    InvalidMoveType(String),

    #[error("policy index {0} points off the board")]
    OffBoardTarget(usize),
}

impl CodecError {
    pub(crate) fn malformed(text: &str, reason: impl Into<String>) -> Self {
        CodecError::MalformedPosition {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}
