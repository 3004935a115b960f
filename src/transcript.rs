//! Fiat-Shamir index sampler: deterministically derives query indices from
//! a committed Merkle root.

use std::collections::BTreeSet;

use crate::error::{ProofError, Result};
use crate::field::FieldValue;
use crate::mimc::mimc_hash;

/// Number of spot-check queries sampled per proof.
pub const NUM_QUERIES: usize = 5;

/// Safety cap on sampler iterations, guarding against transcript
/// starvation for pathological `(n, domain)` pairs.
const MAX_ITERATIONS: u64 = 10_000;

/// Sample `n` distinct indices in `[0, domain)`, deterministically derived
/// from the canonical-decimal `root`.
///
/// Seeds from the full canonical-decimal root, parsed as a field element.
///
/// # Errors
/// Returns [`ProofError::EncodingMismatch`] if `root` does not parse as a
/// canonical field value, or [`ProofError::TranscriptStuck`] if the
/// iteration cap is exceeded before `n` distinct indices are found.
pub fn sample_indices(root: &str, n: usize, domain: u64) -> Result<Vec<u64>> {
    let seed = FieldValue::from_canonical_decimal(root)?;
    sample_indices_from_seed(seed, n, domain, |_| true)
}

/// Like [`sample_indices`] but additionally filters out indices rejected
/// by `accept`. Used by the knowledge-of-preimage prover to resample away
/// from index 0 without weakening the cap on total iterations.
pub fn sample_indices_filtered(
    root: &str,
    n: usize,
    domain: u64,
    accept: impl Fn(u64) -> bool,
) -> Result<Vec<u64>> {
    let seed = FieldValue::from_canonical_decimal(root)?;
    sample_indices_from_seed(seed, n, domain, accept)
}

fn sample_indices_from_seed(
    seed: FieldValue,
    n: usize,
    domain: u64,
    accept: impl Fn(u64) -> bool,
) -> Result<Vec<u64>> {
    let mut indices = BTreeSet::new();
    let mut counter: u64 = 0;
    while indices.len() < n {
        if counter >= MAX_ITERATIONS {
            return Err(ProofError::TranscriptStuck);
        }
        let r = mimc_hash(seed, FieldValue::from_u64(counter));
        let candidate = r.as_u64() % domain;
        if accept(candidate) {
            indices.insert(candidate);
        }
        counter += 1;
    }
    Ok(indices.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_in_root() {
        let a = sample_indices("12345", 5, 64).unwrap();
        let b = sample_indices("12345", 5, 64).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn returns_n_distinct_sorted_indices() {
        let indices = sample_indices("987654321", 5, 64).unwrap();
        assert_eq!(indices.len(), 5);
        let mut sorted = indices.clone();
        sorted.sort_unstable();
        assert_eq!(indices, sorted);
        let unique: BTreeSet<_> = indices.iter().collect();
        assert_eq!(unique.len(), indices.len());
        assert!(indices.iter().all(|&i| i < 64));
    }

    #[test]
    fn different_roots_usually_differ() {
        let a = sample_indices("1", 5, 64).unwrap();
        let b = sample_indices("2", 5, 64).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn filtered_sampling_excludes_zero() {
        let indices = sample_indices_filtered("555", 5, 64, |i| i != 0).unwrap();
        assert!(!indices.contains(&0));
        assert_eq!(indices.len(), 5);
    }

    #[test]
    fn rejects_malformed_root() {
        assert!(sample_indices("not-a-number", 5, 64).is_err());
    }
}
