//! Live view of a map's keys.
//!
//! Membership and removal go through the map's strategy. Adding a key maps
//! it to `V::default()` unless an equal key is already present.

use crate::comparator_map::{ComparatorMap, Keys};
use crate::comparator_object::Probe;
use crate::cursor::Cursor;
use crate::error::MapError;
use crate::strategy::EqualityStrategy;
use crate::view_collection::{AddElements, ClonedElements, ViewCollection};
use core::fmt;
use core::hash::{BuildHasher, Hash};

pub struct KeySet<'m, K, V, C, S> {
    map: &'m mut ComparatorMap<K, V, C, S>,
}

impl<'m, K, V, C, S> KeySet<'m, K, V, C, S>
where
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    pub(crate) fn new(map: &'m mut ComparatorMap<K, V, C, S>) -> Self {
        Self { map }
    }

    pub fn iter(&self) -> Keys<'_, K, V, C, S> {
        self.map.keys()
    }

    pub fn cursor(&mut self) -> Cursor<'_, K, V, C, S> {
        self.map.cursor()
    }

    /// Membership test with a key of unknown type.
    pub fn try_contains<'q>(&self, key: impl Into<Probe<'q, K>>) -> Result<bool, MapError>
    where
        K: 'static,
    {
        self.map.try_contains_key(key)
    }

    /// Removal with a key of unknown type.
    pub fn try_remove<'q>(&mut self, key: impl Into<Probe<'q, K>>) -> Result<bool, MapError>
    where
        K: 'static,
    {
        Ok(self.map.try_remove(key)?.is_some())
    }
}

impl<'m, K, V, C, S> ViewCollection<K, V, C, S> for KeySet<'m, K, V, C, S>
where
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    type Element = K;

    fn backing(&self) -> &ComparatorMap<K, V, C, S> {
        self.map
    }

    fn backing_mut(&mut self) -> &mut ComparatorMap<K, V, C, S> {
        self.map
    }

    fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    fn remove(&mut self, key: &K) -> bool {
        self.map.remove(key).is_some()
    }

    fn projects_to(strategy: &C, key: &K, _value: &V, element: &K) -> bool {
        strategy.equals(key, element)
    }

    fn element_hash(key_hash: u64, _value: &V) -> u64
    where
        V: Hash,
    {
        key_hash
    }
}

// The only operation that needs a value to put next to a new key.
impl<'m, K, V, C, S> AddElements<K, V, C, S> for KeySet<'m, K, V, C, S>
where
    V: Default,
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    fn add(&mut self, key: K) -> Result<bool, MapError> {
        Ok(self.map.insert_with(key, V::default).is_ok())
    }
}

impl<'m, K, V, C, S> ClonedElements<K, V, C, S> for KeySet<'m, K, V, C, S>
where
    K: Clone,
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    fn element_at(key: &K, _value: &V) -> K {
        key.clone()
    }
}

impl<'m, K: fmt::Debug, V, C, S> fmt::Debug for KeySet<'m, K, V, C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.map.store.iter().map(|(_, k, _)| k.object()))
            .finish()
    }
}
