//! A didactic STARK-style proof engine over a small prime field.
//!
//! This crate lets a prover convince a verifier of one of two claims
//! without revealing the witness:
//!
//!   - **Hash integrity**: the prover ran a MiMC permutation whose
//!     per-round key is bound to a publicly claimed password-hash
//!     artifact, and the trace terminates at a declared field output.
//!   - **Knowledge of preimage**: the prover knows a secret value `H`
//!     such that a MiMC permutation keyed by a public nonce maps `H` to a
//!     public output `K`, without revealing `H`.
//!
//! # Scope
//!
//! The cryptographic machinery here, the prime field, the MiMC round
//! function, the algebraic Merkle commitment, the Fiat-Shamir index
//! sampler, and the prover/verifier state machines, is the whole of this
//! crate's concern. The browser UI, the HTTP verification endpoint's
//! transport, and the internal soundness of the KDF implementations are
//! treated as external collaborators.
//!
//! # Hiding, not zero-knowledge
//!
//! This construction hides un-queried trace cells behind the Merkle
//! commitment only. It is **not** cryptographically zero-knowledge: a
//! colluding prover and sampler could reveal more than intended, FRI
//! low-degree testing is not implemented, and no proof-of-work grinding
//! is performed. The field is 32-bit and the spot-check count is small,
//! so this does not reach production security levels. It is a teaching
//! tool, not a production proving system.

pub mod error;
pub mod field;
pub mod kdf;
pub mod merkle;
pub mod mimc;
pub mod proof;
pub mod prover;
pub mod transcript;
pub mod verifier;

pub use error::ProofError;
pub use field::FieldValue;
pub use proof::{AlgorithmTag, Proof, ProofType, PublicInputs, TraceQuery};
pub use prover::{prove_hash_integrity, prove_knowledge_of_preimage, KdfParams};
pub use verifier::{verify, Accepted};
