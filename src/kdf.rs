//! KDF collaborator adapters.
//!
//! The specification treats the password-hashing KDFs as opaque external
//! collaborators: the cryptographic core (`field`, `mimc`, `merkle`,
//! `transcript`, `prover`, `verifier`) never depends on this module and
//! only ever sees the artifact bytes it produces, through
//! [`crate::field::FieldValue::string_to_field`]. KDF failure is fatal to
//! the proof being built, so these adapters return `anyhow::Result`
//! rather than a [`crate::error::ProofError`] variant. There is no
//! enumerated error kind for "the KDF failed" in the core's taxonomy.

use anyhow::{Context, Result};
use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHasher, Version};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::proof::AlgorithmTag;

/// Generate a fresh random salt for callers (the CLI) that don't supply
/// their own. `KdfParams::default` and all tests pin an explicit salt
/// instead.
pub fn random_salt(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Run Argon2id over `password` with the given cost parameters and
/// return the artifact bytes: the PHC-formatted hash string's bytes,
/// which carries the parameters and salt alongside the digest (the
/// "encoded hash, possibly with parameter prefix" the spec describes).
pub fn argon2id(
    password: &[u8],
    salt: &str,
    time_cost: u32,
    memory_kib: u32,
    hash_len: usize,
) -> Result<Vec<u8>> {
    let params = Params::new(memory_kib, time_cost, 1, Some(hash_len))
        .context("invalid argon2id parameters")?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::encode_b64(salt.as_bytes()).context("invalid argon2id salt")?;
    let hash = argon2
        .hash_password(password, &salt)
        .map_err(|e| anyhow::anyhow!("argon2id hashing failed: {e}"))?;
    Ok(hash.to_string().into_bytes())
}

/// Run bcrypt over `password` at the given cost and return the artifact
/// bytes: the encoded bcrypt hash string's bytes.
pub fn bcrypt(password: &[u8], cost: u32) -> Result<Vec<u8>> {
    let hash = bcrypt::hash(password, cost).context("bcrypt hashing failed")?;
    Ok(hash.into_bytes())
}

/// The "native-mimc" carve-out: the artifact is the canonical decimal
/// encoding of the field value itself, so `output_artifact == mimc_output`
/// holds trivially and `mimc_key = 0`.
pub fn native_mimc_artifact(x: crate::field::FieldValue) -> Vec<u8> {
    x.to_canonical_decimal().into_bytes()
}

/// Dispatch on an [`AlgorithmTag`], producing artifact bytes from either a
/// live KDF call (`Argon2id`/`Bcrypt`) or the native carve-out.
///
/// `password` is only consulted for `Argon2id`/`Bcrypt`; `NativeMimc`
/// ignores it and derives the artifact from `native_value` instead.
pub fn derive_artifact(
    algorithm: AlgorithmTag,
    password: &[u8],
    salt: &str,
    time_cost: u32,
    memory_kib: u32,
    cost: u32,
    native_value: crate::field::FieldValue,
) -> Result<Vec<u8>> {
    match algorithm {
        AlgorithmTag::Argon2id => argon2id(password, salt, time_cost, memory_kib, 32),
        AlgorithmTag::Bcrypt => bcrypt(password, cost),
        AlgorithmTag::NativeMimc => Ok(native_mimc_artifact(native_value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldValue;

    #[test]
    fn argon2id_is_deterministic_given_the_same_salt() {
        let a = argon2id(b"hunter2", "testsalt1234", 2, 19456, 32).unwrap();
        let b = argon2id(b"hunter2", "testsalt1234", 2, 19456, 32).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_salts_change_the_artifact() {
        let a = argon2id(b"hunter2", "saltaaaaaaaa", 2, 19456, 32).unwrap();
        let b = argon2id(b"hunter2", "saltbbbbbbbb", 2, 19456, 32).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn bcrypt_round_trips_through_its_own_verify() {
        let hash = bcrypt(b"correct horse battery staple", 4).unwrap();
        let hash_str = String::from_utf8(hash).unwrap();
        assert!(bcrypt::verify("correct horse battery staple", &hash_str).unwrap());
    }

    #[test]
    fn native_mimc_artifact_matches_canonical_decimal() {
        let x = FieldValue::from_u64(42);
        assert_eq!(native_mimc_artifact(x), b"42".to_vec());
    }

    #[test]
    fn random_salt_has_requested_length_and_varies() {
        let a = random_salt(16);
        let b = random_salt(16);
        assert_eq!(a.len(), 16);
        assert_ne!(a, b);
    }
}
