//! Equality strategies: caller-supplied `equals`/`hash` pairs that replace a
//! key type's own equality.
//!
//! A strategy must be an equivalence relation over the keys it sees, and
//! `equals(a, b)` must imply `hash(a) == hash(b)`, for as long as any key
//! inserted under it lives in a map. Mutating a key after insertion so that
//! its hash changes breaks lookups in the same way it does for
//! `std::collections::HashMap`; this is not detected.

use crate::collection_comparer::item_hash;
use core::fmt;
use core::hash::Hash;
use core::marker::PhantomData;

/// Two-method capability that decides key equality and hashing for a map.
pub trait EqualityStrategy<T: ?Sized> {
    fn equals(&self, a: &T, b: &T) -> bool;
    fn hash(&self, value: &T) -> u64;
}

/// Uses the type's own `Eq` and `Hash`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeStrategy;

impl<T> EqualityStrategy<T> for NativeStrategy
where
    T: ?Sized + Eq + Hash,
{
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }

    #[inline]
    fn hash(&self, value: &T) -> u64 {
        item_hash(value)
    }
}

/// Compares values by a projected part, e.g. a single field.
pub struct KeyStrategy<T: ?Sized, U: ?Sized, F> {
    project: F,
    _pd: PhantomData<fn(&T) -> &U>,
}

impl<T, U, F> KeyStrategy<T, U, F>
where
    T: ?Sized,
    U: ?Sized + Eq + Hash,
    F: Fn(&T) -> &U,
{
    pub fn new(project: F) -> Self {
        Self {
            project,
            _pd: PhantomData,
        }
    }
}

impl<T, U, F> EqualityStrategy<T> for KeyStrategy<T, U, F>
where
    T: ?Sized,
    U: ?Sized + Eq + Hash,
    F: Fn(&T) -> &U,
{
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.project)(a) == (self.project)(b)
    }

    #[inline]
    fn hash(&self, value: &T) -> u64 {
        item_hash((self.project)(value))
    }
}

impl<T: ?Sized, U: ?Sized, F> fmt::Debug for KeyStrategy<T, U, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyStrategy")
    }
}

/// Strategy assembled from two closures.
pub struct FnStrategy<T: ?Sized, E, H> {
    equals: E,
    hash: H,
    _pd: PhantomData<fn(&T)>,
}

impl<T, E, H> FnStrategy<T, E, H>
where
    T: ?Sized,
    E: Fn(&T, &T) -> bool,
    H: Fn(&T) -> u64,
{
    pub fn new(equals: E, hash: H) -> Self {
        Self {
            equals,
            hash,
            _pd: PhantomData,
        }
    }
}

impl<T, E, H> EqualityStrategy<T> for FnStrategy<T, E, H>
where
    T: ?Sized,
    E: Fn(&T, &T) -> bool,
    H: Fn(&T) -> u64,
{
    #[inline]
    fn equals(&self, a: &T, b: &T) -> bool {
        (self.equals)(a, b)
    }

    #[inline]
    fn hash(&self, value: &T) -> u64 {
        (self.hash)(value)
    }
}

impl<T: ?Sized, E, H> fmt::Debug for FnStrategy<T, E, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnStrategy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Person {
        name: String,
        age: u32,
    }

    /// Invariant: the native strategy agrees with `==` and hashes equal
    /// values identically.
    #[test]
    fn native_strategy_matches_eq() {
        let s = NativeStrategy;
        let a = "x".to_string();
        let b = "x".to_string();
        assert!(EqualityStrategy::<String>::equals(&s, &a, &b));
        assert_eq!(
            EqualityStrategy::<String>::hash(&s, &a),
            EqualityStrategy::<String>::hash(&s, &b)
        );
        assert!(!EqualityStrategy::<String>::equals(&s, &a, &"y".to_string()));
    }

    /// Invariant: a projection strategy ignores everything but the
    /// projected field, for both equality and hashing.
    #[test]
    fn key_strategy_ignores_other_fields() {
        let s = KeyStrategy::new(|p: &Person| p.name.as_str());
        let a = Person {
            name: "ann".into(),
            age: 30,
        };
        let b = Person {
            name: "ann".into(),
            age: 31,
        };
        let c = Person {
            name: "bob".into(),
            age: 30,
        };
        assert!(s.equals(&a, &b));
        assert_eq!(s.hash(&a), s.hash(&b));
        assert!(!s.equals(&a, &c));
        assert_ne!(a.age, b.age);
    }

    /// Invariant: closure strategies dispatch to the supplied closures.
    #[test]
    fn fn_strategy_dispatches() {
        let s = FnStrategy::new(
            |a: &str, b: &str| a.eq_ignore_ascii_case(b),
            |v: &str| v.len() as u64,
        );
        assert!(s.equals("Hello", "hELLO"));
        assert!(!s.equals("Hello", "World!"));
        assert_eq!(s.hash("abc"), 3);
    }
}
