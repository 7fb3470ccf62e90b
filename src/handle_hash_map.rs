//! HandleHashMap: structural storage with stable handles, hash-indexed
//! lookups by caller-supplied predicates, and a debug reentrancy check.
//!
//! This is the "native-equality" table behind `ComparatorMap`: it keys on
//! `K: Eq + Hash` for inserts, but lookups take a precomputed hash plus a
//! predicate so probe wrappers never need to build an owned key.

use crate::reentrancy::ReentrancyCheck;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_table;
use hashbrown::HashTable;
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Handle(DefaultKey);

impl Handle {
    pub(crate) fn new(k: DefaultKey) -> Self {
        Handle(k)
    }
    pub(crate) fn raw_handle(&self) -> DefaultKey {
        self.0
    }
}

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

pub struct HandleHashMap<K, V, S = RandomState> {
    hasher: S,
    index: HashTable<DefaultKey>,
    slots: SlotMap<DefaultKey, Entry<K, V>>,
    reentrancy: ReentrancyCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    DuplicateKey,
}

/// Iterator over immutable entries in `HandleHashMap`.
pub struct Iter<'a, K, V, S> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<K, V>>,
    remaining: usize,
    pub(crate) _pd: core::marker::PhantomData<&'a S>,
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S> {
    type Item = (Handle, &'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (k, e) = self.it.next()?;
        self.remaining -= 1;
        Some((Handle::new(k), &e.key, &e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, S> ExactSizeIterator for Iter<'a, K, V, S> {}

/// Iterator over mutable entries in `HandleHashMap`.
pub struct IterMut<'a, K, V, S> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<K, V>>,
    remaining: usize,
    pub(crate) _pd: core::marker::PhantomData<&'a S>,
}

impl<'a, K, V, S> Iterator for IterMut<'a, K, V, S> {
    type Item = (Handle, &'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let (k, e) = self.it.next()?;
        self.remaining -= 1;
        Some((Handle::new(k), &e.key, &mut e.value))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, S> ExactSizeIterator for IterMut<'a, K, V, S> {}

// Accessors that never hash or compare keys.
impl<K, V, S> HandleHashMap<K, V, S> {
    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub(crate) fn handle_key(&self, h: Handle) -> Option<&K> {
        self.slots.get(h.raw_handle()).map(|e| &e.key)
    }

    pub(crate) fn handle_value(&self, h: Handle) -> Option<&V> {
        self.slots.get(h.raw_handle()).map(|e| &e.value)
    }

    pub(crate) fn handle_value_mut(&mut self, h: Handle) -> Option<&mut V> {
        self.slots.get_mut(h.raw_handle()).map(|e| &mut e.value)
    }

    pub(crate) fn handle_entry_mut(&mut self, h: Handle) -> Option<(&K, &mut V)> {
        self.slots
            .get_mut(h.raw_handle())
            .map(|e| (&e.key, &mut e.value))
    }

    /// Handles of all live entries, in iteration order.
    pub(crate) fn handles(&self) -> Vec<Handle> {
        self.slots.keys().map(Handle::new).collect()
    }

    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter();
        self.index.clear();
        self.slots.clear();
    }

    pub fn remove(&mut self, handle: Handle) -> Option<(K, V)> {
        let _g = self.reentrancy.enter();
        let k = handle.raw_handle();

        let entry = self.slots.remove(k)?;

        // Unlink from index via occupied entry removal
        let unlinked = self.index.find_entry(entry.hash, |&kk| kk == k);
        debug_assert!(unlinked.is_ok(), "live slot missing from index");
        if let Ok(o) = unlinked {
            let _ = o.remove();
        }

        Some((entry.key, entry.value))
    }

    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            it: self.slots.iter(),
            remaining: self.slots.len(),
            _pd: core::marker::PhantomData,
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V, S> {
        let remaining = self.slots.len();
        IterMut {
            it: self.slots.iter_mut(),
            remaining,
            _pd: core::marker::PhantomData,
        }
    }
}

impl<K, V, S> HandleHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            index: HashTable::new(),
            hasher,
            slots: SlotMap::with_key(),
            reentrancy: ReentrancyCheck::new(),
        }
    }

    fn make_hash(&self, key: &K) -> u64 {
        self.hasher.hash_one(key)
    }

    /// Index hash for a key whose `Hash` impl feeds exactly `raw` as a `u64`.
    #[inline]
    pub fn hash_raw(&self, raw: u64) -> u64 {
        self.hasher.hash_one(raw)
    }

    /// Find the entry in the bucket for `hash` whose key satisfies `eq`.
    /// `eq` runs only against keys stored under the same hash.
    pub fn find_with<F>(&self, hash: u64, mut eq: F) -> Option<Handle>
    where
        F: FnMut(&K) -> bool,
    {
        let _g = self.reentrancy.enter();
        self.index
            .find(hash, |&k| self.slots.get(k).map(|e| eq(&e.key)).unwrap_or(false))
            .map(|&k| Handle::new(k))
    }

    pub fn insert(&mut self, key: K, value: V) -> Result<Handle, InsertError> {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        let entry = Entry { key, value, hash };
        match self.index.entry(
            hash,
            |&kk| {
                self.slots
                    .get(kk)
                    .map(|e| e.key == entry.key)
                    .unwrap_or(false)
            },
            |&kk| self.slots.get(kk).map(|e| e.hash).unwrap_or(0),
        ) {
            hash_table::Entry::Occupied(_) => Err(InsertError::DuplicateKey),
            hash_table::Entry::Vacant(v) => {
                let k = self.slots.insert(entry);
                let _ = v.insert(k);
                Ok(Handle::new(k))
            }
        }
    }

    pub fn insert_with<F>(&mut self, key: K, default: F) -> Result<Handle, InsertError>
    where
        F: FnOnce() -> V,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        match self.index.entry(
            hash,
            |&kk| self.slots.get(kk).map(|e| e.key == key).unwrap_or(false),
            |&kk| self.slots.get(kk).map(|e| e.hash).unwrap_or(0),
        ) {
            hash_table::Entry::Occupied(_) => Err(InsertError::DuplicateKey),
            hash_table::Entry::Vacant(v) => {
                let value = default();
                let entry = Entry { key, value, hash };
                let k = self.slots.insert(entry);
                let _ = v.insert(k);
                Ok(Handle::new(k))
            }
        }
    }

    /// Insert or replace. On replace the stored key is kept, `key` is
    /// dropped, and the previous value is returned.
    pub fn upsert(&mut self, key: K, value: V) -> (Handle, Option<V>) {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        match self.index.entry(
            hash,
            |&kk| self.slots.get(kk).map(|e| e.key == key).unwrap_or(false),
            |&kk| self.slots.get(kk).map(|e| e.hash).unwrap_or(0),
        ) {
            hash_table::Entry::Occupied(o) => {
                let k = *o.get();
                let previous = self
                    .slots
                    .get_mut(k)
                    .map(|e| core::mem::replace(&mut e.value, value));
                (Handle::new(k), previous)
            }
            hash_table::Entry::Vacant(v) => {
                let k = self.slots.insert(Entry { key, value, hash });
                let _ = v.insert(k);
                (Handle::new(k), None)
            }
        }
    }
}
