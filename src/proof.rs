//! The proof data model: algorithm tags, public inputs, trace queries, and
//! the top-level [`Proof`] record, as laid out in the specification's data
//! model section. All [`FieldValue`]s serialize as canonical decimal
//! strings (see [`crate::field`]).

use serde::{Deserialize, Serialize};

use crate::error::{ProofError, Result};
use crate::field::FieldValue;
use crate::mimc::ROUNDS;

/// The closed set of password-hashing algorithm tags this crate accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlgorithmTag {
    /// Argon2id, the memory-hard default.
    Argon2id,
    /// bcrypt, for legacy compatibility.
    Bcrypt,
    /// The identity carve-out: `mimc_key = 0` and the artifact equals the
    /// declared MiMC output directly.
    NativeMimc,
}

/// Which of the two claims a [`Proof`] makes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProofType {
    /// The prover ran MiMC keyed by a password-hash artifact.
    HashIntegrity,
    /// The prover knows a preimage H mapping to a public output under a
    /// public nonce.
    KnowledgeOfPreimage,
}

/// Public inputs for a hash-integrity proof.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HashIntegrityInputs {
    /// The KDF algorithm tag bound to this proof.
    pub algorithm: AlgorithmTag,
    /// The opaque artifact bytes (hex-encoded) from the KDF, or the
    /// field output itself in native-mimc mode.
    pub output_artifact: String,
    /// The declared final trace value.
    pub mimc_output: FieldValue,
    /// The Merkle root of the committed trace.
    pub trace_root: FieldValue,
}

/// Public inputs for a knowledge-of-preimage proof.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KnowledgeOfPreimageInputs {
    /// The public nonce (hex-encoded bytes) keying the MiMC permutation.
    pub nonce: String,
    /// The declared public output.
    pub public_output: FieldValue,
    /// The Merkle root of the committed trace.
    pub trace_root: FieldValue,
}

/// The public inputs carried by a proof, tagged by proof type.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "proof_type", rename_all = "kebab-case")]
pub enum PublicInputs {
    /// See [`HashIntegrityInputs`].
    HashIntegrity(HashIntegrityInputs),
    /// See [`KnowledgeOfPreimageInputs`].
    KnowledgeOfPreimage(KnowledgeOfPreimageInputs),
}

impl PublicInputs {
    /// The proof type this set of public inputs belongs to.
    pub fn proof_type(&self) -> ProofType {
        match self {
            PublicInputs::HashIntegrity(_) => ProofType::HashIntegrity,
            PublicInputs::KnowledgeOfPreimage(_) => ProofType::KnowledgeOfPreimage,
        }
    }

    /// The trace root common to both proof shapes.
    pub fn trace_root(&self) -> FieldValue {
        match self {
            PublicInputs::HashIntegrity(i) => i.trace_root,
            PublicInputs::KnowledgeOfPreimage(i) => i.trace_root,
        }
    }

    /// The declared boundary output common to both proof shapes.
    pub fn declared_output(&self) -> FieldValue {
        match self {
            PublicInputs::HashIntegrity(i) => i.mimc_output,
            PublicInputs::KnowledgeOfPreimage(i) => i.public_output,
        }
    }
}

/// One spot-check query against the committed trace.
///
/// `next_value`/`next_path` are present iff `index < R`. At the boundary
/// position (`index == R`) they are absent, and `value` is constrained to
/// equal the declared output rather than a transition relation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TraceQuery {
    /// The trace position this query authenticates.
    pub index: u64,
    /// The trace value at `index`.
    pub value: FieldValue,
    /// The authentication path for `(index, value)`.
    pub path: Vec<FieldValue>,
    /// The trace value at `index + 1`, absent at the boundary.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_value: Option<FieldValue>,
    /// The authentication path for `(index + 1, next_value)`, absent at
    /// the boundary.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next_path: Option<Vec<FieldValue>>,
}

impl TraceQuery {
    /// Whether this is the boundary query (`index == R`).
    pub fn is_boundary(&self) -> bool {
        self.index == ROUNDS as u64
    }
}

/// A complete proof: a tagged claim plus the spot-check queries that back
/// it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proof {
    /// The claim's public inputs, tagged by proof type.
    pub public_inputs: PublicInputs,
    /// The sampled spot-check queries, including exactly one boundary
    /// query at `index == R`.
    pub trace_queries: Vec<TraceQuery>,
}

impl Proof {
    /// Structural validation: shape only, no cryptographic checks.
    ///
    /// Checks that exactly one query is the boundary query (missing
    /// next-fields), that every non-boundary query carries its
    /// next-fields, and, for knowledge-of-preimage proofs, that index 0
    /// was never queried.
    ///
    /// # Errors
    /// Returns [`ProofError::InvalidProofShape`] on a structural defect,
    /// or [`ProofError::WitnessLeak`] if a knowledge proof queries index 0.
    pub fn check_shape(&self) -> Result<()> {
        if self.trace_queries.is_empty() {
            return Err(ProofError::InvalidProofShape(
                "proof has no trace queries".to_string(),
            ));
        }

        let mut boundary_count = 0usize;
        for q in &self.trace_queries {
            if q.index > ROUNDS as u64 {
                return Err(ProofError::InvalidProofShape(format!(
                    "query index {} exceeds round count {}",
                    q.index, ROUNDS
                )));
            }
            if q.is_boundary() {
                boundary_count += 1;
                if q.next_value.is_some() || q.next_path.is_some() {
                    return Err(ProofError::InvalidProofShape(
                        "boundary query must not carry next-fields".to_string(),
                    ));
                }
            } else if q.next_value.is_none() || q.next_path.is_none() {
                return Err(ProofError::InvalidProofShape(format!(
                    "non-boundary query at index {} is missing next-fields",
                    q.index
                )));
            }
        }
        if boundary_count != 1 {
            return Err(ProofError::InvalidProofShape(format!(
                "expected exactly one boundary query, found {boundary_count}"
            )));
        }

        if self.public_inputs.proof_type() == ProofType::KnowledgeOfPreimage
            && self.trace_queries.iter().any(|q| q.index == 0)
        {
            return Err(ProofError::WitnessLeak);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hash_integrity_inputs() -> PublicInputs {
        PublicInputs::HashIntegrity(HashIntegrityInputs {
            algorithm: AlgorithmTag::NativeMimc,
            output_artifact: "0".to_string(),
            mimc_output: FieldValue::ZERO,
            trace_root: FieldValue::from_u64(7),
        })
    }

    fn boundary_query() -> TraceQuery {
        TraceQuery {
            index: ROUNDS as u64,
            value: FieldValue::ZERO,
            path: vec![],
            next_value: None,
            next_path: None,
        }
    }

    fn non_boundary_query(index: u64) -> TraceQuery {
        TraceQuery {
            index,
            value: FieldValue::ZERO,
            path: vec![],
            next_value: Some(FieldValue::ZERO),
            next_path: Some(vec![]),
        }
    }

    #[test]
    fn algorithm_tag_serializes_to_spec_wire_format() {
        assert_eq!(
            serde_json::to_string(&AlgorithmTag::NativeMimc).unwrap(),
            "\"native-mimc\""
        );
        assert_eq!(
            serde_json::to_string(&AlgorithmTag::Argon2id).unwrap(),
            "\"argon2id\""
        );
        assert_eq!(
            serde_json::to_string(&AlgorithmTag::Bcrypt).unwrap(),
            "\"bcrypt\""
        );
    }

    #[test]
    fn valid_shape_passes() {
        let proof = Proof {
            public_inputs: sample_hash_integrity_inputs(),
            trace_queries: vec![non_boundary_query(3), boundary_query()],
        };
        assert!(proof.check_shape().is_ok());
    }

    #[test]
    fn missing_boundary_query_is_rejected() {
        let proof = Proof {
            public_inputs: sample_hash_integrity_inputs(),
            trace_queries: vec![non_boundary_query(3)],
        };
        assert!(matches!(
            proof.check_shape(),
            Err(ProofError::InvalidProofShape(_))
        ));
    }

    #[test]
    fn knowledge_proof_with_index_zero_is_witness_leak() {
        let inputs = PublicInputs::KnowledgeOfPreimage(KnowledgeOfPreimageInputs {
            nonce: "6e6f6e6365".to_string(),
            public_output: FieldValue::ZERO,
            trace_root: FieldValue::from_u64(9),
        });
        let proof = Proof {
            public_inputs: inputs,
            trace_queries: vec![non_boundary_query(0), boundary_query()],
        };
        assert_eq!(proof.check_shape(), Err(ProofError::WitnessLeak));
    }
}
