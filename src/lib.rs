//! Hyperion codec library.
//!
//! Encodes chess positions into network input planes and maps moves to and
//! from policy-vector indices. Also exposes the training-sample pipeline and
//! the line protocol used by the binaries.

pub mod board;
pub mod dataset;
pub mod error;
pub mod nn;
pub mod protocol;
pub mod session;

pub use error::CodecError;
