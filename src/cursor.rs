//! Cursor: a removal-capable walk over a `ComparatorMap`.
//!
//! The cursor holds the map mutably and snapshots the handles of the live
//! entries on creation. Since nothing else can touch the map while the
//! cursor exists, the snapshot stays valid except for entries the cursor
//! itself removed, and those it never revisits.

use crate::comparator_map::ComparatorMap;
use crate::handle_hash_map::Handle;
use std::vec;

pub struct Cursor<'m, K, V, C, S> {
    map: &'m mut ComparatorMap<K, V, C, S>,
    pending: vec::IntoIter<Handle>,
    current: Option<Handle>,
}

impl<'m, K, V, C, S> Cursor<'m, K, V, C, S> {
    pub(crate) fn new(map: &'m mut ComparatorMap<K, V, C, S>) -> Self {
        let pending = map.store.handles().into_iter();
        Self {
            map,
            pending,
            current: None,
        }
    }

    /// Move to the next entry. Returns false once the walk is exhausted.
    pub fn advance(&mut self) -> bool {
        self.current = self.pending.next();
        self.current.is_some()
    }

    /// Entries not yet visited.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn key(&self) -> Option<&K> {
        let h = self.current?;
        self.map.store.handle_key(h).map(|k| k.object())
    }

    pub fn value(&self) -> Option<&V> {
        let h = self.current?;
        self.map.store.handle_value(h)
    }

    pub fn value_mut(&mut self) -> Option<&mut V> {
        let h = self.current?;
        self.map.store.handle_value_mut(h)
    }

    pub fn entry(&self) -> Option<(&K, &V)> {
        Some((self.key()?, self.value()?))
    }

    pub fn entry_mut(&mut self) -> Option<(&K, &mut V)> {
        let h = self.current?;
        self.map
            .store
            .handle_entry_mut(h)
            .map(|(k, v)| (k.object(), v))
    }

    /// Replace the current value, returning the old one. `None` if the
    /// cursor is not on an entry.
    pub fn set_value(&mut self, value: V) -> Option<V> {
        self.value_mut().map(|slot| core::mem::replace(slot, value))
    }

    /// Remove the current entry. A second call without an intervening
    /// `advance` returns `None`.
    pub fn remove(&mut self) -> Option<(K, V)> {
        let h = self.current.take()?;
        let (stored, value) = self.map.store.remove(h)?;
        Some((stored.into_object(), value))
    }

    pub fn strategy(&self) -> &C {
        &self.map.strategy
    }
}
