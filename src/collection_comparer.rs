//! Value-based collection equality and hashing shared by the map and its views.
//!
//! Two collections are equal when they have the same size and one contains
//! every element of the other; their hash is the wrapping sum of element
//! hashes, so it does not depend on iteration order. Element hashes use a
//! fixed-key hasher: two maps built with different `BuildHasher` instances
//! still agree on `content_hash`.

use core::hash::{Hash, Hasher};
use std::collections::hash_map::DefaultHasher;

/// Order-independent equality: same length and `contains` holds for every
/// element of `other`.
pub fn equals<I, F>(len: usize, other: I, mut contains: F) -> bool
where
    I: IntoIterator,
    I::IntoIter: ExactSizeIterator,
    F: FnMut(I::Item) -> bool,
{
    let other = other.into_iter();
    if len != other.len() {
        return false;
    }
    for item in other {
        if !contains(item) {
            return false;
        }
    }
    true
}

/// Sum of element hashes.
pub fn hash_code<I>(hashes: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    hashes.into_iter().fold(0u64, u64::wrapping_add)
}

/// Hash of a single element with a fixed-key hasher.
pub fn item_hash<T: ?Sized + Hash>(item: &T) -> u64 {
    let mut h = DefaultHasher::new();
    item.hash(&mut h);
    h.finish()
}

/// Hash of a key/value entry.
#[inline]
pub fn entry_hash(key_hash: u64, value_hash: u64) -> u64 {
    key_hash ^ value_hash
}
