//! Fixed-round keyed MiMC permutation over [`FieldValue`].
//!
//! Two distinct entry points exist on purpose and must never be unified:
//! [`build_trace`] (the AIR the prover/verifier check, no closing key-add)
//! and [`mimc_hash`] (the PRF-like primitive used by the Merkle combiner
//! and the Fiat-Shamir sampler, which does add the key back in at the end).

use crate::field::FieldValue;

/// Number of MiMC rounds in the fixed permutation.
pub const ROUNDS: usize = 64;

/// The round constant for round `i`: `c_i = i * 123_456_789 mod p`.
pub fn round_constant(i: usize) -> FieldValue {
    FieldValue::reduce(i as i128 * 123_456_789)
}

/// One MiMC round: `t' = ((t + key + c_i) mod p)^3 mod p`.
pub fn round(t: FieldValue, key: FieldValue, i: usize) -> FieldValue {
    t.add(key).add(round_constant(i)).cube()
}

/// Build the execution trace `(t_0, t_1, ..., t_ROUNDS)` for input `x` and
/// round key `key`.
///
/// This is the *trace-building* loop: it does **not** fold the key back in
/// after the last round. The AIR verified by the prover/verifier is the
/// per-round cube relation alone; mixing this with [`mimc_hash`]'s closing
/// add breaks verification.
pub fn build_trace(x: FieldValue, key: FieldValue) -> Vec<FieldValue> {
    let mut trace = Vec::with_capacity(ROUNDS + 1);
    trace.push(x);
    let mut t = x;
    for i in 0..ROUNDS {
        t = round(t, key, i);
        trace.push(t);
    }
    trace
}

/// The MiMC hash primitive: runs the full `ROUNDS` rounds starting from
/// `x` under `key`, then folds the key back in: `(t_ROUNDS + key) mod p`.
///
/// Used only as a PRF by the Merkle node combiner ([`crate::merkle`]) and
/// the Fiat-Shamir index sampler ([`crate::transcript`]), never by the
/// trace-building loop the AIR checks.
pub fn mimc_hash(x: FieldValue, key: FieldValue) -> FieldValue {
    let mut t = x;
    for i in 0..ROUNDS {
        t = round(t, key, i);
    }
    t.add(key)
}
