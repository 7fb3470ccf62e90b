//! Live view of a map's entries as `(K, V)` pairs.

use crate::collection_comparer::{entry_hash, item_hash};
use crate::comparator_map::{ComparatorMap, Iter, IterMut};
use crate::cursor::Cursor;
use crate::error::MapError;
use crate::strategy::EqualityStrategy;
use crate::view_collection::{AddElements, ClonedElements, ViewCollection};
use core::fmt;
use core::hash::{BuildHasher, Hash};

pub struct EntrySet<'m, K, V, C, S> {
    map: &'m mut ComparatorMap<K, V, C, S>,
}

impl<'m, K, V, C, S> EntrySet<'m, K, V, C, S>
where
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    pub(crate) fn new(map: &'m mut ComparatorMap<K, V, C, S>) -> Self {
        Self { map }
    }

    pub fn iter(&self) -> Iter<'_, K, V, C, S> {
        self.map.iter()
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, C, S> {
        self.map.iter_mut()
    }

    /// Iteration with removal of the current entry.
    pub fn cursor(&mut self) -> Cursor<'_, K, V, C, S> {
        self.map.cursor()
    }
}

impl<'m, K, V, C, S> ViewCollection<K, V, C, S> for EntrySet<'m, K, V, C, S>
where
    V: PartialEq,
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    type Element = (K, V);

    fn backing(&self) -> &ComparatorMap<K, V, C, S> {
        self.map
    }

    fn backing_mut(&mut self) -> &mut ComparatorMap<K, V, C, S> {
        self.map
    }

    fn contains(&self, (key, value): &(K, V)) -> bool {
        self.map.get(key) == Some(value)
    }

    fn remove(&mut self, element: &(K, V)) -> bool {
        if !self.contains(element) {
            return false;
        }
        self.map.remove(&element.0).is_some()
    }

    fn projects_to(strategy: &C, key: &K, value: &V, (ek, ev): &(K, V)) -> bool {
        strategy.equals(key, ek) && value == ev
    }

    fn element_hash(key_hash: u64, value: &V) -> u64
    where
        V: Hash,
    {
        entry_hash(key_hash, item_hash(value))
    }
}

impl<'m, K, V, C, S> AddElements<K, V, C, S> for EntrySet<'m, K, V, C, S>
where
    V: PartialEq,
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    // Puts the pair; reports a change unless the same mapping was present.
    fn add(&mut self, (key, value): (K, V)) -> Result<bool, MapError> {
        let changed = self.map.get(&key) != Some(&value);
        self.map.put(key, value);
        Ok(changed)
    }
}

impl<'m, K, V, C, S> ClonedElements<K, V, C, S> for EntrySet<'m, K, V, C, S>
where
    K: Clone,
    V: PartialEq + Clone,
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    fn element_at(key: &K, value: &V) -> (K, V) {
        (key.clone(), value.clone())
    }
}

impl<'m, K, V, C, S> fmt::Debug for EntrySet<'m, K, V, C, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.map.store.iter().map(|(_, k, v)| (k.object(), v)))
            .finish()
    }
}
