//! Merkle root computation
//!
//! Binary folding over an ordered list of transaction ids.

use super::{hash_pair, Hash256};

/// Compute the Merkle root of an ordered list of transaction ids.
///
/// Adjacent ids are paired left-to-right and each pair's concatenation is
/// double-hashed; the fold repeats on the resulting level. A level of odd
/// cardinality duplicates its last entry before pairing, so `[a, b, c]` and
/// `[a, b, c, c]` commit to the same root. That collision is part of the
/// chain's historical hashing rule and is kept bit-for-bit.
///
/// An empty list yields the zero hash.
pub fn compute_merkle_root(ids: &[Hash256]) -> Hash256 {
    if ids.is_empty() {
        return Hash256::zero();
    }

    if ids.len() == 1 {
        return ids[0];
    }

    let mut current_level: Vec<Hash256> = ids.to_vec();

    while current_level.len() > 1 {
        // If odd number, duplicate last
        if current_level.len() % 2 == 1 {
            let last = current_level[current_level.len() - 1];
            current_level.push(last);
        }

        let mut next_level = Vec::with_capacity(current_level.len() / 2);

        for chunk in current_level.chunks(2) {
            let combined = hash_pair(&chunk[0], &chunk[1]);
            next_level.push(combined);
        }

        current_level = next_level;
    }

    current_level[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::double_sha256;

    fn make_ids(n: usize) -> Vec<Hash256> {
        (0..n).map(|i| double_sha256(&i.to_le_bytes())).collect()
    }

    #[test]
    fn test_empty_merkle_root() {
        let root = compute_merkle_root(&[]);
        assert_eq!(root, Hash256::zero());
    }

    #[test]
    fn test_single_element() {
        let ids = make_ids(1);
        let root = compute_merkle_root(&ids);
        assert_eq!(root, ids[0]);
    }

    #[test]
    fn test_two_elements() {
        let ids = make_ids(2);
        let root = compute_merkle_root(&ids);
        let expected = hash_pair(&ids[0], &ids[1]);
        assert_eq!(root, expected);
    }

    #[test]
    fn test_three_elements_duplicate_last() {
        // The third id pairs with a copy of itself on the first level.
        let ids = make_ids(3);
        let root = compute_merkle_root(&ids);
        let left = hash_pair(&ids[0], &ids[1]);
        let right = hash_pair(&ids[2], &ids[2]);
        assert_eq!(root, hash_pair(&left, &right));
    }

    #[test]
    fn test_duplicated_tail_collides() {
        // [a, b, c] and [a, b, c, c] fold to the same root.
        let ids = make_ids(3);
        let mut padded = ids.clone();
        padded.push(ids[2]);
        assert_eq!(compute_merkle_root(&ids), compute_merkle_root(&padded));
    }

    #[test]
    fn test_merkle_root_deterministic() {
        let ids = make_ids(10);
        let root1 = compute_merkle_root(&ids);
        let root2 = compute_merkle_root(&ids);
        assert_eq!(root1, root2);
    }

    #[test]
    fn test_order_changes_root() {
        let mut ids = make_ids(4);
        let root = compute_merkle_root(&ids);
        ids.swap(0, 3);
        assert_ne!(root, compute_merkle_root(&ids));
    }
}
