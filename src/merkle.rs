//! Algebraic Merkle commitment over a sequence of [`FieldValue`] leaves.
//!
//! Leaves and internal nodes share one encoding (canonical decimal), and
//! are combined with a MiMC-based combiner instead of a bitwise hash. The
//! combiner is cheap, deterministic field arithmetic rather than a
//! collision-resistant sponge.

use crate::error::{ProofError, Result};
use crate::field::FieldValue;
use crate::mimc::mimc_hash;

/// The sibling value substituted for a missing node when a layer has odd
/// length. Encoded on the wire as the empty string, which parses to 0.
pub const EMPTY_SIBLING: FieldValue = FieldValue::ZERO;

/// A pluggable two-to-one combiner for internal Merkle nodes. A
/// collision-resistant sponge (e.g. SHA-256 or Poseidon) would substitute
/// here in a production design. [`MimcCombine`] is the only
/// implementation this crate ships.
pub trait Combine {
    /// Combine an ordered pair of siblings into their parent. Order
    /// matters: a correct implementation must not be commutative, or
    /// authentication paths could be reordered without detection.
    fn combine(&self, left: FieldValue, right: FieldValue) -> FieldValue;
}

/// The default combiner: `h(a, b) = mimc_hash((a + 2b) mod p, key = 0)`.
///
/// The factor of 2 on `b` breaks commutativity so `h(a, b) != h(b, a)`
/// whenever `a != b`.
#[derive(Clone, Copy, Default)]
pub struct MimcCombine;

impl Combine for MimcCombine {
    fn combine(&self, left: FieldValue, right: FieldValue) -> FieldValue {
        let input = left.add(right.add(right));
        mimc_hash(input, FieldValue::ZERO)
    }
}

/// An authentication path: the ordered sequence of sibling values
/// encountered walking from a leaf up to the root, one per layer below
/// the root.
pub type AuthPath = Vec<FieldValue>;

/// An algebraic Merkle tree built bottom-up over a leaf sequence.
#[derive(Clone, Debug)]
pub struct MerkleTree {
    /// All layers bottom-up; `layers[0]` is the (unpadded) leaf layer.
    layers: Vec<Vec<FieldValue>>,
}

impl MerkleTree {
    /// Build a tree over `leaves`. Must not be empty.
    pub fn build(leaves: &[FieldValue]) -> MerkleTree {
        assert!(!leaves.is_empty(), "cannot build a Merkle tree with no leaves");
        let combiner = MimcCombine;
        let mut layers = vec![leaves.to_vec()];
        let mut current = leaves.to_vec();
        while current.len() > 1 {
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            let mut i = 0;
            while i < current.len() {
                let left = current[i];
                let right = if i + 1 < current.len() {
                    current[i + 1]
                } else {
                    EMPTY_SIBLING
                };
                next.push(combiner.combine(left, right));
                i += 2;
            }
            layers.push(next.clone());
            current = next;
        }
        MerkleTree { layers }
    }

    /// The number of leaves originally committed (before any padding).
    pub fn len(&self) -> usize {
        self.layers[0].len()
    }

    /// Whether the tree has any leaves.
    pub fn is_empty(&self) -> bool {
        self.layers[0].is_empty()
    }

    /// The root: the single node of the top layer.
    pub fn root(&self) -> FieldValue {
        self.layers[self.layers.len() - 1][0]
    }

    /// Get the authentication path for leaf `index`.
    ///
    /// At each layer, the sibling at `index ^ 1` is appended (the empty
    /// token if out of range), then `index` is halved. Returns one entry
    /// per layer below the root.
    pub fn get_path(&self, index: usize) -> AuthPath {
        let mut path = Vec::with_capacity(self.layers.len().saturating_sub(1));
        let mut idx = index;
        for layer in &self.layers[..self.layers.len() - 1] {
            let sibling_idx = idx ^ 1;
            let sibling = layer.get(sibling_idx).copied().unwrap_or(EMPTY_SIBLING);
            path.push(sibling);
            idx /= 2;
        }
        path
    }

    /// Verify that `(index, value, path)` authenticates to `root`.
    ///
    /// Folds from the leaf: at each step, if the current index is even,
    /// combine as `h(current, sibling)`, else `h(sibling, current)`.
    ///
    /// # Errors
    /// Returns [`ProofError::MerkleMismatch`] if the folded value does not
    /// equal `root`.
    pub fn verify(
        root: FieldValue,
        index: usize,
        value: FieldValue,
        path: &AuthPath,
    ) -> Result<()> {
        let combiner = MimcCombine;
        let mut current = value;
        let mut idx = index;
        for sibling in path {
            current = if idx % 2 == 0 {
                combiner.combine(current, *sibling)
            } else {
                combiner.combine(*sibling, current)
            };
            idx /= 2;
        }
        if current == root {
            Ok(())
        } else {
            Err(ProofError::MerkleMismatch {
                index: index as u64,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: u64) -> FieldValue {
        FieldValue::from_u64(x)
    }

    #[test]
    fn build_is_deterministic() {
        let leaves = vec![v(1), v(2), v(3), v(4)];
        let t1 = MerkleTree::build(&leaves);
        let t2 = MerkleTree::build(&leaves);
        assert_eq!(t1.root(), t2.root());
    }

    #[test]
    fn every_leaf_authenticates() {
        let leaves: Vec<FieldValue> = (0..7).map(v).collect();
        let tree = MerkleTree::build(&leaves);
        let root = tree.root();
        for (i, leaf) in leaves.iter().enumerate() {
            let path = tree.get_path(i);
            assert!(MerkleTree::verify(root, i, *leaf, &path).is_ok());
        }
    }

    #[test]
    fn wrong_leaf_fails_verification() {
        let leaves = vec![v(1), v(2), v(3), v(4)];
        let tree = MerkleTree::build(&leaves);
        let root = tree.root();
        let path = tree.get_path(0);
        let err = MerkleTree::verify(root, 0, v(99), &path).unwrap_err();
        assert_eq!(err, ProofError::MerkleMismatch { index: 0 });
    }

    #[test]
    fn combiner_is_not_commutative() {
        let combiner = MimcCombine;
        let a = v(1);
        let b = v(2);
        assert_ne!(combiner.combine(a, b), combiner.combine(b, a));
    }

    #[test]
    fn swapped_order_breaks_path_verification() {
        // Build a 2-leaf tree [1, 2] and confirm the verifier rejects a
        // path whose combine order was swapped relative to the root.
        let leaves = vec![v(1), v(2)];
        let tree = MerkleTree::build(&leaves);
        let root = tree.root();

        let combiner = MimcCombine;
        let swapped_root = combiner.combine(v(2), v(1));
        assert_ne!(root, swapped_root);

        // The correct path for leaf 0 is [leaf 1]; verifying leaf 1 (right
        // child) against the swapped combine order must fail against the
        // real root.
        let path = tree.get_path(1);
        assert!(MerkleTree::verify(root, 0, v(2), &path).is_err());
    }

    #[test]
    fn odd_layer_pads_with_empty_sibling() {
        let leaves = vec![v(1), v(2), v(3)];
        let tree = MerkleTree::build(&leaves);
        let root = tree.root();
        let path = tree.get_path(2);
        assert!(MerkleTree::verify(root, 2, v(3), &path).is_ok());
    }
}
