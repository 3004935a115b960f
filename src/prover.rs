//! The prover: builds a [`Proof`] for either the hash-integrity or the
//! knowledge-of-preimage claim.

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::field::FieldValue;
use crate::kdf;
use crate::merkle::MerkleTree;
use crate::mimc::{build_trace, ROUNDS};
use crate::proof::{
    AlgorithmTag, HashIntegrityInputs, KnowledgeOfPreimageInputs, Proof, PublicInputs, TraceQuery,
};
use crate::transcript::{sample_indices, sample_indices_filtered, NUM_QUERIES};

/// KDF cost parameters for a hash-integrity proof. Only the fields
/// relevant to the chosen [`AlgorithmTag`] are consulted.
#[derive(Clone, Debug)]
pub struct KdfParams {
    /// Salt passed to Argon2id.
    pub salt: String,
    /// Argon2id time cost (iterations).
    pub time_cost: u32,
    /// Argon2id memory cost, in KiB.
    pub memory_kib: u32,
    /// bcrypt cost factor.
    pub cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        KdfParams {
            salt: "zkhash-default-salt".to_string(),
            time_cost: 2,
            memory_kib: 19_456,
            cost: 10,
        }
    }
}

/// Build every spot-check query (the non-boundary ones plus the single
/// boundary query) from a trace, tree, and set of sampled indices.
fn build_queries(trace: &[FieldValue], tree: &MerkleTree, indices: &[u64]) -> Vec<TraceQuery> {
    let mut queries = Vec::with_capacity(indices.len() + 1);
    for &i in indices {
        let idx = i as usize;
        queries.push(TraceQuery {
            index: i,
            value: trace[idx],
            path: tree.get_path(idx),
            next_value: Some(trace[idx + 1]),
            next_path: Some(tree.get_path(idx + 1)),
        });
    }
    queries.push(TraceQuery {
        index: ROUNDS as u64,
        value: trace[ROUNDS],
        path: tree.get_path(ROUNDS),
        next_value: None,
        next_path: None,
    });
    queries
}

/// Prove the hash-integrity claim: the prover ran MiMC keyed by a
/// password-hash artifact and the trace terminates at a declared output.
///
/// `password` is the witness. `algorithm` selects which KDF (or the
/// native-mimc carve-out) binds the MiMC key. KDF failure is fatal to the
/// proof and surfaces as an `anyhow` error, since it is outside this
/// crate's enumerated error taxonomy.
///
/// # Errors
/// Returns an error if the KDF call fails or the transcript sampler is
/// exhausted (see [`crate::error::ProofError::TranscriptStuck`]).
#[instrument(skip(password, params), fields(algorithm = ?algorithm))]
pub fn prove_hash_integrity(
    password: &[u8],
    algorithm: AlgorithmTag,
    params: &KdfParams,
) -> anyhow::Result<Proof> {
    let t0 = FieldValue::string_to_field(password);

    let (mimc_key, artifact_text) = match algorithm {
        AlgorithmTag::NativeMimc => {
            // The key is fixed before the artifact can be computed: the
            // artifact *is* the declared output, derived after the trace.
            let trace = build_trace(t0, FieldValue::ZERO);
            let output = trace[ROUNDS];
            (FieldValue::ZERO, output.to_canonical_decimal())
        }
        _ => {
            let artifact = kdf::derive_artifact(
                algorithm,
                password,
                &params.salt,
                params.time_cost,
                params.memory_kib,
                params.cost,
                FieldValue::ZERO,
            )?;
            let key = FieldValue::string_to_field(&artifact);
            (key, hex::encode(&artifact))
        }
    };

    let trace = build_trace(t0, mimc_key);
    let mimc_output = trace[ROUNDS];
    info!(trace_len = trace.len(), "built hash-integrity trace");

    let tree = MerkleTree::build(&trace);
    let root = tree.root();

    let indices = sample_indices(&root.to_canonical_decimal(), NUM_QUERIES, ROUNDS as u64)?;
    debug!(?indices, "sampled spot-check indices");

    let trace_queries = build_queries(&trace, &tree, &indices);

    Ok(Proof {
        public_inputs: PublicInputs::HashIntegrity(HashIntegrityInputs {
            algorithm,
            output_artifact: artifact_text,
            mimc_output,
            trace_root: root,
        }),
        trace_queries,
    })
}

/// Prove the knowledge-of-preimage claim: the prover knows `secret` such
/// that MiMC keyed by `nonce` maps `secret` to the declared public output,
/// without revealing `secret`.
///
/// Index 0 is never revealed: sampling resamples away from it rather than
/// including it, preserving commitment-hiding of the witness.
///
/// # Errors
/// Returns [`crate::error::ProofError::TranscriptStuck`] if the sampler
/// cannot find enough non-zero indices within its iteration cap.
#[instrument(skip(secret))]
pub fn prove_knowledge_of_preimage(secret: &[u8], nonce: &[u8]) -> Result<Proof> {
    let h = FieldValue::string_to_field(secret);
    let nonce_val = FieldValue::string_to_field(nonce);

    let trace = build_trace(h, nonce_val);
    let public_output = trace[ROUNDS];
    info!(trace_len = trace.len(), "built knowledge-of-preimage trace");

    let tree = MerkleTree::build(&trace);
    let root = tree.root();

    let indices = sample_indices_filtered(
        &root.to_canonical_decimal(),
        NUM_QUERIES,
        ROUNDS as u64,
        |i| i != 0,
    )?;
    debug!(?indices, "sampled spot-check indices (excluding index 0)");

    let trace_queries = build_queries(&trace, &tree, &indices);

    Ok(Proof {
        public_inputs: PublicInputs::KnowledgeOfPreimage(KnowledgeOfPreimageInputs {
            nonce: hex::encode(nonce),
            public_output,
            trace_root: root,
        }),
        trace_queries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_mimc_round_trip_builds_valid_shape() {
        let proof = prove_hash_integrity(b"abc", AlgorithmTag::NativeMimc, &KdfParams::default())
            .unwrap();
        assert!(proof.check_shape().is_ok());
        if let PublicInputs::HashIntegrity(inputs) = &proof.public_inputs {
            assert_eq!(inputs.output_artifact, inputs.mimc_output.to_canonical_decimal());
        } else {
            panic!("expected hash-integrity public inputs");
        }
    }

    #[test]
    fn knowledge_proof_never_reveals_index_zero() {
        let proof = prove_knowledge_of_preimage(b"deadbeef", b"nonce-1").unwrap();
        assert!(proof.trace_queries.iter().all(|q| q.index != 0));
        assert!(proof.check_shape().is_ok());
    }

    #[test]
    fn boundary_query_value_matches_declared_output() {
        let proof = prove_knowledge_of_preimage(b"deadbeef", b"nonce-1").unwrap();
        let boundary = proof
            .trace_queries
            .iter()
            .find(|q| q.is_boundary())
            .unwrap();
        if let PublicInputs::KnowledgeOfPreimage(inputs) = &proof.public_inputs {
            assert_eq!(boundary.value, inputs.public_output);
        } else {
            panic!("expected knowledge-of-preimage public inputs");
        }
    }
}
