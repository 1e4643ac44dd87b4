//! Neural network input and output encoding.
//!
//! `encoding` turns positions into the [20, 8, 8] input planes; `policy`
//! maps moves to and from the 4672-entry policy vector.

pub mod encoding;
pub mod policy;

pub use encoding::{encode_position, PlaneTensor, NUM_PLANES, TENSOR_LEN};
pub use policy::{decode_index, encode_move, policy_target, MoveType, PolicyIndex, POLICY_SIZE};
