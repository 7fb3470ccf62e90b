//! Live view of a map's values. Values cannot be added without a key.

use crate::collection_comparer::item_hash;
use crate::comparator_map::{ComparatorMap, IterMut, Values};
use crate::cursor::Cursor;
use crate::error::MapError;
use crate::strategy::EqualityStrategy;
use crate::view_collection::{AddElements, ClonedElements, ViewCollection};
use core::fmt;
use core::hash::{BuildHasher, Hash};

pub struct ValueCollection<'m, K, V, C, S> {
    map: &'m mut ComparatorMap<K, V, C, S>,
}

impl<'m, K, V, C, S> ValueCollection<'m, K, V, C, S>
where
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    pub(crate) fn new(map: &'m mut ComparatorMap<K, V, C, S>) -> Self {
        Self { map }
    }

    pub fn iter(&self) -> Values<'_, K, V, C, S> {
        self.map.values()
    }

    /// Mutable access to each value in place.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut V> + '_ {
        let it: IterMut<'_, K, V, C, S> = self.map.iter_mut();
        it.map(|(_, v)| v)
    }

    pub fn cursor(&mut self) -> Cursor<'_, K, V, C, S> {
        self.map.cursor()
    }
}

impl<'m, K, V, C, S> ViewCollection<K, V, C, S> for ValueCollection<'m, K, V, C, S>
where
    V: PartialEq,
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    type Element = V;

    fn backing(&self) -> &ComparatorMap<K, V, C, S> {
        self.map
    }

    fn backing_mut(&mut self) -> &mut ComparatorMap<K, V, C, S> {
        self.map
    }

    fn contains(&self, value: &V) -> bool {
        self.map.contains_value(value)
    }

    // Removes the first matching entry only.
    fn remove(&mut self, value: &V) -> bool {
        let found = self
            .map
            .store
            .iter()
            .find(|(_, _, v)| *v == value)
            .map(|(h, _, _)| h);
        match found {
            Some(h) => self.map.store.remove(h).is_some(),
            None => false,
        }
    }

    fn projects_to(_strategy: &C, _key: &K, value: &V, element: &V) -> bool {
        value == element
    }

    fn element_hash(_key_hash: u64, value: &V) -> u64
    where
        V: Hash,
    {
        item_hash(value)
    }
}

impl<'m, K, V, C, S> AddElements<K, V, C, S> for ValueCollection<'m, K, V, C, S>
where
    V: PartialEq,
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    fn add(&mut self, _value: V) -> Result<bool, MapError> {
        Err(MapError::Unsupported("a value cannot be added without a key"))
    }
}

impl<'m, K, V, C, S> ClonedElements<K, V, C, S> for ValueCollection<'m, K, V, C, S>
where
    V: PartialEq + Clone,
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    fn element_at(_key: &K, value: &V) -> V {
        value.clone()
    }
}

impl<'m, K, V: fmt::Debug, C, S> fmt::Debug for ValueCollection<'m, K, V, C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.map.store.iter().map(|(_, _, v)| v))
            .finish()
    }
}
