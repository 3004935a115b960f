//! Prime field arithmetic over `F_p` with `p = 3 * 2^30 + 1`.
//!
//! The modulus is small enough that every intermediate product of two
//! canonical representatives fits in a `u64` (max product < 2^62), so this
//! module works entirely with native 64-bit integers rather than bignums.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ProofError, Result};

/// The field modulus, `p = 3 * 2^30 + 1`.
pub const MODULUS: u64 = 3_221_225_473;

/// An element of `F_p`, always held in canonical form (the unique
/// representative in `[0, p)`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldValue(u64);

impl FieldValue {
    /// The additive identity.
    pub const ZERO: FieldValue = FieldValue(0);
    /// The multiplicative identity.
    pub const ONE: FieldValue = FieldValue(1);

    /// Reduce a signed integer into canonical form: `((x mod p) + p) mod p`.
    pub fn reduce(x: i128) -> FieldValue {
        let p = MODULUS as i128;
        let r = ((x % p) + p) % p;
        FieldValue(r as u64)
    }

    /// Build a `FieldValue` from an unsigned integer, reducing mod `p`.
    pub fn from_u64(x: u64) -> FieldValue {
        FieldValue(x % MODULUS)
    }

    /// The canonical integer representative in `[0, p)`.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// `self + other`, reduced.
    pub fn add(self, other: FieldValue) -> FieldValue {
        FieldValue((self.0 + other.0) % MODULUS)
    }

    /// `self - other`, reduced into `[0, p)`.
    pub fn sub(self, other: FieldValue) -> FieldValue {
        FieldValue((self.0 + MODULUS - other.0) % MODULUS)
    }

    /// `self * other`, reduced. The product fits in `u64` since both
    /// operands are < p < 2^32.
    pub fn mul(self, other: FieldValue) -> FieldValue {
        FieldValue(((self.0 as u128 * other.0 as u128) % MODULUS as u128) as u64)
    }

    /// `self^3`, reduced.
    pub fn cube(self) -> FieldValue {
        self.mul(self).mul(self)
    }

    /// `self^exp mod p` via square-and-multiply.
    pub fn pow(self, mut exp: u64) -> FieldValue {
        let mut base = self;
        let mut result = FieldValue::ONE;
        while exp > 0 {
            if exp & 1 == 1 {
                result = result.mul(base);
            }
            base = base.mul(base);
            exp >>= 1;
        }
        result
    }

    /// Multiplicative inverse via Fermat's little theorem: `x^(p-2)`.
    ///
    /// # Errors
    /// Returns [`ProofError::InvalidField`] if `self` is zero.
    pub fn inv(self) -> Result<FieldValue> {
        if self.0 == 0 {
            return Err(ProofError::InvalidField(
                "cannot invert zero in F_p".to_string(),
            ));
        }
        Ok(self.pow(MODULUS - 2))
    }

    /// `self / other`.
    ///
    /// # Errors
    /// Returns [`ProofError::InvalidField`] if `other` is zero.
    pub fn div(self, other: FieldValue) -> Result<FieldValue> {
        Ok(self.mul(other.inv()?))
    }

    /// Render as a canonical decimal string (the wire encoding used
    /// everywhere in this crate: leaves, Merkle nodes, proof fields).
    pub fn to_canonical_decimal(self) -> String {
        self.0.to_string()
    }

    /// Parse a canonical decimal string back into a `FieldValue`.
    ///
    /// Rejects anything that is not a plain base-10 integer, and anything
    /// that is not already in `[0, p)`.
    ///
    /// # Errors
    /// Returns [`ProofError::EncodingMismatch`] if `s` is not a canonical
    /// decimal representation of a field element.
    pub fn from_canonical_decimal(s: &str) -> Result<FieldValue> {
        if s.is_empty() {
            return Ok(FieldValue::ZERO);
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProofError::EncodingMismatch(format!(
                "not a canonical decimal field value: {s:?}"
            )));
        }
        let v: u64 = s.parse().map_err(|_| {
            ProofError::EncodingMismatch(format!("decimal value out of range: {s:?}"))
        })?;
        if v >= MODULUS {
            return Err(ProofError::EncodingMismatch(format!(
                "value {v} is not in canonical form (>= p)"
            )));
        }
        Ok(FieldValue(v))
    }

    /// Interpret an arbitrary byte string as a big-endian base-256 integer
    /// and reduce it mod `p`. Used to derive field values (MiMC keys,
    /// trace inputs) from passwords, nonces, and KDF artifacts.
    ///
    /// This is many-to-one for inputs longer than a few bytes; it is not
    /// assumed to be collision-resistant.
    pub fn string_to_field(bytes: &[u8]) -> FieldValue {
        let mut acc: u64 = 0;
        for &b in bytes {
            acc = ((acc as u128 * 256 + b as u128) % MODULUS as u128) as u64;
        }
        FieldValue(acc)
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldValue({})", self.0)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// `FieldValue` always serializes as a canonical decimal string, per the
/// encoding discipline every proof field follows.
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_decimal())
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        FieldValue::from_canonical_decimal(&s).map_err(D::Error::custom)
    }
}
