//! ComparatorMap: a map whose key equality and hashing come from an
//! `EqualityStrategy` instead of the key type's own `Eq`/`Hash`.
//!
//! Keys are wrapped in comparator objects on the way in: stored keys become
//! `HashCachingObject`s (hash computed once, mistyped values rejected at
//! insertion), probes become `LazyObject`s (type checked only when the
//! strategy runs). Storage is delegated to `HandleHashMap`, keyed by the
//! stored wrappers.

use crate::collection_comparer::{self, entry_hash, item_hash};
use crate::comparator_object::{ComparatorObject, HashCachingObject, LazyObject, Probe};
use crate::cursor::Cursor;
use crate::entry_set::EntrySet;
use crate::error::MapError;
use crate::handle_hash_map::{self, Handle, HandleHashMap, InsertError};
use crate::key_set::KeySet;
use crate::strategy::EqualityStrategy;
use crate::value_collection::ValueCollection;
use core::any::Any;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use std::collections::hash_map::RandomState;
use std::rc::Rc;

/// Backing store type used by `ComparatorMap`.
pub type Store<K, V, C, S> = HandleHashMap<HashCachingObject<K, C>, V, S>;

pub struct ComparatorMap<K, V, C, S = RandomState> {
    pub(crate) strategy: Rc<C>,
    pub(crate) store: Store<K, V, C, S>,
}

impl<K, V, C> ComparatorMap<K, V, C>
where
    C: EqualityStrategy<K>,
{
    pub fn new(strategy: C) -> Self {
        Self::with_hasher(strategy, RandomState::new())
    }

    /// Back the map with a strategy instance that other maps may share.
    /// Stored keys of maps sharing an instance compare equal to each other.
    pub fn with_shared_strategy(strategy: Rc<C>) -> Self {
        Self::with_shared_strategy_and_hasher(strategy, RandomState::new())
    }
}

impl<K, V, C, S> ComparatorMap<K, V, C, S>
where
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    pub fn with_hasher(strategy: C, hasher: S) -> Self {
        Self::with_shared_strategy_and_hasher(Rc::new(strategy), hasher)
    }

    pub fn with_shared_strategy_and_hasher(strategy: Rc<C>, hasher: S) -> Self {
        Self {
            strategy,
            store: HandleHashMap::with_hasher(hasher),
        }
    }

    /// Build the map on a store produced by `factory`. The store must be new;
    /// one that already holds entries is rejected.
    pub fn with_store<F>(strategy: C, factory: F) -> Result<Self, MapError>
    where
        F: FnOnce() -> Store<K, V, C, S>,
    {
        let store = factory();
        if !store.is_empty() {
            return Err(MapError::StoreNotEmpty);
        }
        Ok(Self {
            strategy: Rc::new(strategy),
            store,
        })
    }

    pub fn strategy(&self) -> &Rc<C> {
        &self.strategy
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    fn wrap(&self, key: K) -> HashCachingObject<K, C> {
        HashCachingObject::new(Rc::clone(&self.strategy), key)
    }

    // Every stored key shares this map's strategy instance, so a typed key
    // is compared through the strategy directly.
    fn find_key(&self, key: &K) -> Option<Handle> {
        let raw = EqualityStrategy::hash(&*self.strategy, key);
        let hash = self.store.hash_raw(raw);
        self.store.find_with(hash, |stored| {
            stored.hash_value() == raw && self.strategy.equals(stored.object(), key)
        })
    }

    // An empty map has no bucket to probe, so the strategy never runs and a
    // mistyped probe cannot fail.
    fn locate(&self, key: Probe<'_, K>) -> Result<Option<Handle>, MapError>
    where
        K: 'static,
    {
        let probe = LazyObject::new(&self.strategy, key)?;
        if self.store.is_empty() {
            return Ok(None);
        }
        let hash = self.store.hash_raw(probe.try_hash()?);
        Ok(self.store.find_with(hash, |stored| probe.equivalent(stored)))
    }

    /// Insert or replace. On replace the originally stored key is kept and
    /// the previous value is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let stored = self.wrap(key);
        self.store.upsert(stored, value).1
    }

    /// Insert a key of arbitrary runtime type. A value that is not a `K` is
    /// rejected before the map is touched.
    pub fn put_any(&mut self, key: Box<dyn Any>, value: V) -> Result<Option<V>, MapError>
    where
        K: 'static,
    {
        let stored = HashCachingObject::from_any(Rc::clone(&self.strategy), key)?;
        Ok(self.store.upsert(stored, value).1)
    }

    /// Insert only if no equal key is present.
    pub fn try_insert(&mut self, key: K, value: V) -> Result<&mut V, InsertError> {
        let stored = self.wrap(key);
        let h = self.store.insert(stored, value)?;
        Ok(self.handle_value_mut(h))
    }

    /// Like `try_insert`, building the value only when the key is absent.
    pub fn insert_with<F>(&mut self, key: K, default: F) -> Result<&mut V, InsertError>
    where
        F: FnOnce() -> V,
    {
        let stored = self.wrap(key);
        let h = self.store.insert_with(stored, default)?;
        Ok(self.handle_value_mut(h))
    }

    // Handles returned by a successful insert always resolve.
    fn handle_value_mut(&mut self, h: Handle) -> &mut V {
        match self.store.handle_value_mut(h) {
            Some(v) => v,
            None => unreachable!("fresh handle must resolve"),
        }
    }

    pub fn put_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        for (k, v) in entries {
            self.put(k, v);
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let h = self.find_key(key)?;
        self.store.handle_value(h)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let h = self.find_key(key)?;
        self.store.handle_value_mut(h)
    }

    /// The stored key equal to `key`, with its value.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        let h = self.find_key(key)?;
        let stored = self.store.handle_key(h)?;
        let value = self.store.handle_value(h)?;
        Some((stored.object(), value))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_key(key).is_some()
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let h = self.find_key(key)?;
        let (stored, value) = self.store.remove(h)?;
        Some((stored.into_object(), value))
    }

    /// Lookup with a key of unknown type. See `Probe` for failure modes.
    pub fn try_get<'q>(&self, key: impl Into<Probe<'q, K>>) -> Result<Option<&V>, MapError>
    where
        K: 'static,
    {
        Ok(self
            .locate(key.into())?
            .and_then(|h| self.store.handle_value(h)))
    }

    pub fn try_contains_key<'q>(&self, key: impl Into<Probe<'q, K>>) -> Result<bool, MapError>
    where
        K: 'static,
    {
        Ok(self.locate(key.into())?.is_some())
    }

    pub fn try_remove<'q>(
        &mut self,
        key: impl Into<Probe<'q, K>>,
    ) -> Result<Option<V>, MapError>
    where
        K: 'static,
    {
        Ok(match self.locate(key.into())? {
            Some(h) => self.store.remove(h).map(|(_, v)| v),
            None => None,
        })
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }

    pub fn iter(&self) -> Iter<'_, K, V, C, S> {
        Iter {
            inner: self.store.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, C, S> {
        IterMut {
            inner: self.store.iter_mut(),
        }
    }

    pub fn keys(&self) -> Keys<'_, K, V, C, S> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V, C, S> {
        Values { inner: self.iter() }
    }

    /// Walk the entries with the ability to replace values and remove the
    /// current entry.
    pub fn cursor(&mut self) -> Cursor<'_, K, V, C, S> {
        Cursor::new(self)
    }

    /// Keep only entries for which `keep` returns true. Returns whether
    /// anything was removed.
    pub fn retain<F>(&mut self, mut keep: F) -> bool
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut changed = false;
        let mut cursor = self.cursor();
        while cursor.advance() {
            let kept = match cursor.entry_mut() {
                Some((k, v)) => keep(k, v),
                None => true,
            };
            if !kept {
                cursor.remove();
                changed = true;
            }
        }
        changed
    }

    /// Live view of the entries as `(K, V)` pairs.
    pub fn entry_set(&mut self) -> EntrySet<'_, K, V, C, S> {
        EntrySet::new(self)
    }

    /// Live view of the keys.
    pub fn key_set(&mut self) -> KeySet<'_, K, V, C, S> {
        KeySet::new(self)
    }

    /// Live view of the values.
    pub fn values_mut(&mut self) -> ValueCollection<'_, K, V, C, S> {
        ValueCollection::new(self)
    }

    /// Stored wrappers with their values; the wrapper carries the cached
    /// strategy hash.
    pub(crate) fn stored(&self) -> impl Iterator<Item = (&HashCachingObject<K, C>, &V)> + '_ {
        self.store.iter().map(|(_, k, v)| (k, v))
    }

    /// Sum over entries of `strategy_hash(key) ^ value_hash(value)`. Equal
    /// maps produce equal content hashes regardless of strategy instance or
    /// hasher.
    pub fn content_hash(&self) -> u64
    where
        V: Hash,
    {
        collection_comparer::hash_code(
            self.stored()
                .map(|(k, v)| entry_hash(k.hash_value(), item_hash(v))),
        )
    }
}

impl<K, V, C> Default for ComparatorMap<K, V, C>
where
    C: EqualityStrategy<K> + Default,
{
    fn default() -> Self {
        Self::new(C::default())
    }
}

impl<K, V, C, S> Extend<(K, V)> for ComparatorMap<K, V, C, S>
where
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.put_all(iter);
    }
}

// Maps are equal when each holds every entry of the other. Checking both
// directions keeps `==` symmetric even if two strategy instances of the
// same type disagree; equal hashes additionally need the instances to hash
// alike.
impl<K, V, C, S, S2> PartialEq<ComparatorMap<K, V, C, S2>> for ComparatorMap<K, V, C, S>
where
    V: PartialEq,
    C: EqualityStrategy<K>,
    S: BuildHasher,
    S2: BuildHasher,
{
    fn eq(&self, other: &ComparatorMap<K, V, C, S2>) -> bool {
        if core::ptr::eq(self as *const _ as *const (), other as *const _ as *const ()) {
            return true;
        }
        collection_comparer::equals(self.len(), other.iter(), |(k, v)| {
            self.get(k) == Some(v)
        }) && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K, V, C, S> Eq for ComparatorMap<K, V, C, S>
where
    V: Eq,
    C: EqualityStrategy<K>,
    S: BuildHasher,
{
}

impl<K, V, C, S> fmt::Debug for ComparatorMap<K, V, C, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.store.iter().map(|(_, k, v)| (k.object(), v)))
            .finish()
    }
}

/// Iterator over `(&K, &V)`.
pub struct Iter<'a, K, V, C, S> {
    inner: handle_hash_map::Iter<'a, HashCachingObject<K, C>, V, S>,
}

impl<'a, K, V, C, S> Iterator for Iter<'a, K, V, C, S> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, k, v)| (k.object(), v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V, C, S> ExactSizeIterator for Iter<'a, K, V, C, S> {}

/// Iterator over `(&K, &mut V)`.
pub struct IterMut<'a, K, V, C, S> {
    inner: handle_hash_map::IterMut<'a, HashCachingObject<K, C>, V, S>,
}

impl<'a, K, V, C, S> Iterator for IterMut<'a, K, V, C, S> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, k, v)| (k.object(), v))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V, C, S> ExactSizeIterator for IterMut<'a, K, V, C, S> {}

pub struct Keys<'a, K, V, C, S> {
    inner: Iter<'a, K, V, C, S>,
}

impl<'a, K, V, C, S> Iterator for Keys<'a, K, V, C, S> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, _)| k)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V, C, S> ExactSizeIterator for Keys<'a, K, V, C, S> {}

pub struct Values<'a, K, V, C, S> {
    inner: Iter<'a, K, V, C, S>,
}

impl<'a, K, V, C, S> Iterator for Values<'a, K, V, C, S> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, v)| v)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, K, V, C, S> ExactSizeIterator for Values<'a, K, V, C, S> {}
