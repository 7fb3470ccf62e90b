//! Comparator objects: a key paired with the strategy instance that compares it.
//!
//! Two objects are equal only if they share the *same* strategy instance
//! (`Rc::ptr_eq`) and that strategy reports their keys equal. Comparing by
//! instance identity keeps `equivalent` symmetric even when two distinct
//! strategies would disagree.
//!
//! Variants
//! - `LazyObject`: borrowed probe wrapper used for lookups. The wrapped
//!   value may be of an unknown runtime type; it is only checked when the
//!   strategy has to run, and a mismatch during `equivalent` counts as
//!   "not equal".
//! - `HashCachingObject`: owned wrapper for stored keys. The strategy hash is
//!   computed once at construction, so a value the strategy cannot handle is
//!   rejected before it reaches the map.

use crate::error::MapError;
use crate::strategy::EqualityStrategy;
use core::any::Any;
use core::fmt;
use core::hash::{Hash, Hasher};
use std::rc::Rc;

/// A lookup argument whose type is not guaranteed to be the map's key type.
pub enum Probe<'a, K> {
    /// A value statically known to be a key.
    Key(&'a K),
    /// A value of arbitrary runtime type; downcast to `K` on first use.
    Foreign(&'a dyn Any),
    /// No value at all. Rejected with `MapError::NullKey`.
    Null,
}

impl<'a, K> Probe<'a, K> {
    pub fn foreign(value: &'a dyn Any) -> Self {
        Probe::Foreign(value)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Probe::Null)
    }
}

impl<'a, K: 'static> Probe<'a, K> {
    /// Resolve the probe to a key reference.
    pub fn resolve(&self) -> Result<&'a K, MapError> {
        match *self {
            Probe::Key(k) => Ok(k),
            Probe::Foreign(v) => v
                .downcast_ref::<K>()
                .ok_or_else(MapError::type_mismatch::<K>),
            Probe::Null => Err(MapError::NullKey),
        }
    }
}

impl<'a, K> Clone for Probe<'a, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K> Copy for Probe<'a, K> {}

impl<'a, K> From<&'a K> for Probe<'a, K> {
    fn from(key: &'a K) -> Self {
        Probe::Key(key)
    }
}

impl<'a, K> From<Option<&'a K>> for Probe<'a, K> {
    fn from(key: Option<&'a K>) -> Self {
        key.map_or(Probe::Null, Probe::Key)
    }
}

impl<'a, K: fmt::Debug> fmt::Debug for Probe<'a, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Probe::Key(k) => f.debug_tuple("Key").field(k).finish(),
            Probe::Foreign(_) => f.write_str("Foreign(..)"),
            Probe::Null => f.write_str("Null"),
        }
    }
}

/// Capability shared by both comparator object variants.
pub trait ComparatorObject<K> {
    type Strategy: EqualityStrategy<K>;

    fn strategy(&self) -> &Rc<Self::Strategy>;

    /// The wrapped key, or the reason it cannot be used as one.
    fn try_object(&self) -> Result<&K, MapError>;

    /// Strategy hash of the wrapped key.
    fn try_hash(&self) -> Result<u64, MapError>;

    /// Hash computed at construction, if this variant caches one.
    fn cached_hash(&self) -> Option<u64> {
        None
    }

    /// Equality through the shared strategy instance. Objects whose keys
    /// cannot be resolved are never equivalent to anything.
    fn equivalent<O>(&self, other: &O) -> bool
    where
        O: ComparatorObject<K, Strategy = Self::Strategy> + ?Sized,
    {
        if !Rc::ptr_eq(self.strategy(), other.strategy()) {
            return false;
        }
        if let (Some(a), Some(b)) = (self.cached_hash(), other.cached_hash()) {
            if a != b {
                return false;
            }
        }
        match (self.try_object(), other.try_object()) {
            (Ok(a), Ok(b)) => core::ptr::eq(a, b) || self.strategy().equals(a, b),
            _ => false,
        }
    }
}

/// Probe-side wrapper: borrows both the strategy and the probed value and
/// computes the hash on every request.
pub struct LazyObject<'a, K, C> {
    strategy: &'a Rc<C>,
    object: Probe<'a, K>,
}

impl<'a, K, C> LazyObject<'a, K, C> {
    /// Wrap a probe. Fails only for a null probe; the value's type is not
    /// checked here.
    pub fn new(strategy: &'a Rc<C>, object: Probe<'a, K>) -> Result<Self, MapError> {
        if object.is_null() {
            return Err(MapError::NullKey);
        }
        Ok(Self { strategy, object })
    }
}

impl<'a, K, C> ComparatorObject<K> for LazyObject<'a, K, C>
where
    K: 'static,
    C: EqualityStrategy<K>,
{
    type Strategy = C;

    fn strategy(&self) -> &Rc<C> {
        self.strategy
    }

    fn try_object(&self) -> Result<&K, MapError> {
        self.object.resolve()
    }

    fn try_hash(&self) -> Result<u64, MapError> {
        let key = self.object.resolve()?;
        Ok(EqualityStrategy::hash(&**self.strategy, key))
    }
}

impl<'a, K: fmt::Debug, C> fmt::Debug for LazyObject<'a, K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LazyObject").field(&self.object).finish()
    }
}

/// Store-side wrapper: owns the key and a clone of the strategy `Rc`, with
/// the strategy hash computed eagerly.
pub struct HashCachingObject<K, C> {
    strategy: Rc<C>,
    object: K,
    hash: u64,
}

impl<K, C> HashCachingObject<K, C>
where
    C: EqualityStrategy<K>,
{
    pub fn new(strategy: Rc<C>, object: K) -> Self {
        let hash = EqualityStrategy::hash(&*strategy, &object);
        Self {
            strategy,
            object,
            hash,
        }
    }

    /// Wrap a value of arbitrary runtime type. A value that is not a `K`
    /// fails here rather than at first comparison.
    pub fn from_any(strategy: Rc<C>, object: Box<dyn Any>) -> Result<Self, MapError>
    where
        K: 'static,
    {
        let object = object
            .downcast::<K>()
            .map_err(|_| MapError::type_mismatch::<K>())?;
        Ok(Self::new(strategy, *object))
    }
}

impl<K, C> HashCachingObject<K, C> {
    #[inline]
    pub fn object(&self) -> &K {
        &self.object
    }

    pub fn into_object(self) -> K {
        self.object
    }

    #[inline]
    pub fn hash_value(&self) -> u64 {
        self.hash
    }
}

impl<K, C> ComparatorObject<K> for HashCachingObject<K, C>
where
    C: EqualityStrategy<K>,
{
    type Strategy = C;

    fn strategy(&self) -> &Rc<C> {
        &self.strategy
    }

    fn try_object(&self) -> Result<&K, MapError> {
        Ok(&self.object)
    }

    fn try_hash(&self) -> Result<u64, MapError> {
        Ok(self.hash)
    }

    fn cached_hash(&self) -> Option<u64> {
        Some(self.hash)
    }
}

impl<K, C> PartialEq for HashCachingObject<K, C>
where
    C: EqualityStrategy<K>,
{
    fn eq(&self, other: &Self) -> bool {
        self.equivalent(other)
    }
}

impl<K, C> Eq for HashCachingObject<K, C> where C: EqualityStrategy<K> {}

// Feeds exactly the cached strategy hash; `HandleHashMap::hash_raw` relies on
// hashing a bare `u64` producing the same value.
impl<K, C> Hash for HashCachingObject<K, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl<K: fmt::Debug, C> fmt::Debug for HashCachingObject<K, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashCachingObject")
            .field("object", &self.object)
            .field("hash", &self.hash)
            .finish()
    }
}
