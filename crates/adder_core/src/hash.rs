//! Deterministic hashing helpers.
//!
//! All hashers are seeded with fixed keys so that `hash()` results are stable
//! across runs of the same binary.

use ahash::RandomState;
use hashbrown::{HashMap, HashSet};
use std::hash::Hash;

pub type FastHashMap<K, V> = HashMap<K, V, RandomState>;
pub type FastHashSet<K> = HashSet<K, RandomState>;

pub fn fast_hasher() -> RandomState {
    RandomState::with_seeds(0, 0, 0, 0)
}

pub fn fast_map_new<K: Eq + Hash, V>() -> FastHashMap<K, V> {
    HashMap::with_hasher(fast_hasher())
}

pub fn fast_map_with_capacity<K: Eq + Hash, V>(cap: usize) -> FastHashMap<K, V> {
    HashMap::with_capacity_and_hasher(cap, fast_hasher())
}

pub fn fast_set_with_capacity<K: Eq + Hash>(cap: usize) -> FastHashSet<K> {
    HashSet::with_capacity_and_hasher(cap, fast_hasher())
}

/// `-1` is reserved as an error marker by the hashing protocol of the source
/// language, so every hash funnels through here.
#[inline]
pub fn normalize(h: i64) -> i64 {
    if h == -1 { -2 } else { h }
}

pub fn hash_str(s: &str) -> i64 {
    normalize(fast_hasher().hash_one(s.as_bytes()) as i64)
}

pub fn hash_bytes(b: &[u8]) -> i64 {
    normalize(fast_hasher().hash_one(b) as i64)
}

pub fn hash_int(i: i64) -> i64 {
    normalize(i)
}

const XXPRIME_1: u64 = 11400714785074694791;
const XXPRIME_2: u64 = 14029467366897019727;
const XXPRIME_5: u64 = 2870177450012600261;

/// Order-sensitive combination of element hashes (xxHash-style lanes).
pub fn combine_ordered<I: IntoIterator<Item = i64>>(hashes: I) -> i64 {
    let mut acc = XXPRIME_5;
    let mut len = 0u64;
    for lane in hashes {
        acc = acc.wrapping_add((lane as u64).wrapping_mul(XXPRIME_2));
        acc = acc.rotate_left(31);
        acc = acc.wrapping_mul(XXPRIME_1);
        len += 1;
    }
    acc = acc.wrapping_add(len ^ (XXPRIME_5 ^ 3527539));
    if acc as i64 == -1 {
        return 1546275796;
    }
    acc as i64
}
