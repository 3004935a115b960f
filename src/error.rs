//! Error taxonomy for the proving and verification core.

use thiserror::Error;

/// All ways a proof can fail to be built, parsed, or verified.
///
/// Every variant here corresponds 1:1 to an error kind named by the
/// specification this crate implements. All failures are terminal: the
/// core never retries or catches-and-continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// A proof is missing required fields, or a field has the wrong shape
    /// (e.g. more than one boundary query, or a non-boundary query missing
    /// its `next_value`/`next_path`).
    #[error("invalid proof shape: {0}")]
    InvalidProofShape(String),

    /// `proof_type` (or `algorithm` tag) fell outside the closed set this
    /// crate recognizes.
    #[error("unknown proof type or algorithm tag: {0}")]
    UnknownProofType(String),

    /// A field value or Merkle path entry did not parse as a canonical
    /// decimal integer in `[0, p)` (and was not the empty-sibling token).
    #[error("encoding mismatch: {0}")]
    EncodingMismatch(String),

    /// An authentication path at the given leaf index did not fold to the
    /// committed root.
    #[error("merkle authentication failed at index {index}")]
    MerkleMismatch {
        /// The trace index whose path failed to authenticate.
        index: u64,
    },

    /// The trace value at the boundary index does not equal the proof's
    /// declared output.
    #[error("boundary value does not match declared output")]
    BoundaryMismatch,

    /// The cube transition relation failed to hold between `value` and
    /// `next_value` at the given index.
    #[error("transition constraint failed at index {index}")]
    TransitionMismatch {
        /// The trace index whose transition relation failed.
        index: u64,
    },

    /// A knowledge-of-preimage proof revealed the witness by including a
    /// query at index 0.
    #[error("knowledge proof leaks the witness: index 0 was queried")]
    WitnessLeak,

    /// The Fiat-Shamir sampler exceeded its iteration cap before finding
    /// enough distinct indices.
    #[error("transcript sampler exceeded its iteration cap")]
    TranscriptStuck,

    /// A field arithmetic operation hit a domain error (e.g. inverting 0).
    #[error("invalid field operation: {0}")]
    InvalidField(String),
}

/// Convenience alias used throughout the core.
pub type Result<T> = std::result::Result<T, ProofError>;
