//! Canonical serialization for snapshot fingerprints.
//!
//! State collections use `BTreeMap`/`BTreeSet` or insertion-ordered `Vec`s,
//! so the same state always serializes to the same bytes.

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes.
///
/// Panics if `value` cannot be represented as JSON (a map with non-string
/// keys). Engine state never contains one.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    #[test]
    fn test_determinism_independent_of_insertion_order() {
        let a: BTreeSet<&str> = ["u2", "u1"].into_iter().collect();
        let b: BTreeSet<&str> = ["u1", "u2"].into_iter().collect();
        assert_eq!(canonical_hash(&a), canonical_hash(&b));
        assert_eq!(canonical_hash_hex(&a).len(), 16);
    }

    #[test]
    #[should_panic(expected = "Canonical serialization failed")]
    fn test_unrepresentable_value_is_not_hashed_silently() {
        let tuple_keys: BTreeMap<(u8, u8), u8> = [((1, 2), 3)].into_iter().collect();
        canonical_hash(&tuple_keys);
    }
}
